use async_trait::async_trait;

use crate::error::PipError;
use crate::styles::StyleSheetSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Element inside a surface that content is rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub id: String,
}

/// Capability to create detached always-on-top surfaces.
#[async_trait]
pub trait WindowingPlatform: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Style sheets of the main document, in document order.
    fn stylesheets(&self) -> Vec<StyleSheetSnapshot>;

    async fn request_window(&self, size: WindowSize) -> Result<Box<dyn Surface>, PipError>;
}

/// One detached surface handed out by the platform.
pub trait Surface: Send + Sync {
    /// Add an inline `<style>` element to the surface head.
    fn append_style(&self, css: &str);

    /// Add a `<link rel="stylesheet">` element to the surface head.
    fn append_stylesheet_link(&self, kind: &str, href: &str);

    fn create_mount_point(&self, id: &str) -> Result<MountPoint, PipError>;

    /// Run `handler` once when the surface is dismissed, by the user or by [`Surface::close`].
    fn on_page_hide(&self, handler: Box<dyn FnOnce() + Send>);

    fn close(&self);
}
