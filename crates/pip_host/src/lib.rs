//! pip_host - Detached picture-in-picture surface
//!
//! The host asks a [`WindowingPlatform`] for a small always-on-top surface,
//! mirrors the document styles into it and exposes a mount point the
//! assistant renders into.

pub mod error;
pub mod host;
pub mod platform;
pub mod styles;

pub use error::PipError;
pub use host::{PipHost, PipSupport, MOUNT_POINT_ID, PIP_WINDOW_SIZE, UNSUPPORTED_NOTICE};
pub use platform::{MountPoint, Surface, WindowSize, WindowingPlatform};
pub use styles::{mirror_stylesheets, StyleSheetSnapshot};
