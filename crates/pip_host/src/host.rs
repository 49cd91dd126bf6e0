use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::PipError;
use crate::platform::{MountPoint, Surface, WindowSize, WindowingPlatform};
use crate::styles::mirror_stylesheets;

pub const PIP_WINDOW_SIZE: WindowSize = WindowSize {
    width: 600,
    height: 600,
};

pub const MOUNT_POINT_ID: &str = "pip-content";

/// Notice shown in place of the toggle when the platform has no PiP support.
pub const UNSUPPORTED_NOTICE: (&str, &str) = (
    "Document Picture-in-Picture is not supported in your browser.",
    "Please use Chrome 116 or later.",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipSupport {
    Supported,
    Unsupported,
}

impl PipSupport {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported)
    }

    pub fn notice(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Supported => None,
            Self::Unsupported => Some(UNSUPPORTED_NOTICE),
        }
    }
}

struct OpenSurface {
    surface: Arc<dyn Surface>,
    mount_point: MountPoint,
    session: u64,
}

#[derive(Default)]
struct HostState {
    open: Option<OpenSurface>,
    sessions: u64,
}

/// Owns at most one picture-in-picture surface.
pub struct PipHost<P: WindowingPlatform> {
    platform: P,
    support: PipSupport,
    state: Arc<Mutex<HostState>>,
}

impl<P: WindowingPlatform> PipHost<P> {
    /// Feature detection happens once, here.
    pub fn new(platform: P) -> Self {
        let support = if platform.is_supported() {
            PipSupport::Supported
        } else {
            tracing::error!("Document Picture-in-Picture API is not supported on this platform");
            PipSupport::Unsupported
        };

        Self {
            platform,
            support,
            state: Arc::new(Mutex::new(HostState::default())),
        }
    }

    pub fn support(&self) -> PipSupport {
        self.support
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().open.is_some()
    }

    pub fn mount_point(&self) -> Option<MountPoint> {
        self.state
            .lock()
            .open
            .as_ref()
            .map(|open| open.mount_point.clone())
    }

    /// Open the surface. Does nothing if one is already open.
    pub async fn open(&self) -> Result<(), PipError> {
        if !self.support.is_supported() {
            return Err(PipError::Unsupported);
        }
        if self.is_active() {
            return Ok(());
        }

        let surface: Arc<dyn Surface> = match self.platform.request_window(PIP_WINDOW_SIZE).await {
            Ok(surface) => Arc::from(surface),
            Err(e) => {
                tracing::error!(error = %e, "Error opening PiP window");
                return Err(e);
            }
        };

        let linked = mirror_stylesheets(&self.platform.stylesheets(), surface.as_ref());

        let mount_point = match surface.create_mount_point(MOUNT_POINT_ID) {
            Ok(mount_point) => mount_point,
            Err(e) => {
                tracing::error!(error = %e, "Error opening PiP window");
                surface.close();
                return Err(e);
            }
        };

        let session = {
            let mut state = self.state.lock();
            if state.open.is_some() {
                // Another open finished first.
                drop(state);
                surface.close();
                return Ok(());
            }
            state.sessions += 1;
            let session = state.sessions;
            state.open = Some(OpenSurface {
                surface: Arc::clone(&surface),
                mount_point,
                session,
            });
            session
        };

        let weak = Arc::downgrade(&self.state);
        surface.on_page_hide(Box::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut state = state.lock();
                if state.open.as_ref().is_some_and(|open| open.session == session) {
                    state.open = None;
                    tracing::debug!(session, "PiP window dismissed");
                }
            }
        }));

        tracing::info!(
            session,
            linked_stylesheets = linked,
            width = PIP_WINDOW_SIZE.width,
            height = PIP_WINDOW_SIZE.height,
            "PiP window opened"
        );
        Ok(())
    }

    /// Close the surface. Does nothing when closed.
    pub fn close(&self) {
        let open = self.state.lock().open.take();
        if let Some(open) = open {
            open.surface.close();
            tracing::info!(session = open.session, "PiP window closed");
        }
    }

    /// Open when closed, close when open. Returns whether a surface is open afterwards.
    pub async fn toggle(&self) -> Result<bool, PipError> {
        if self.is_active() {
            self.close();
            Ok(false)
        } else {
            self.open().await?;
            Ok(self.is_active())
        }
    }
}

impl<P: WindowingPlatform> Drop for PipHost<P> {
    fn drop(&mut self) {
        self.close();
    }
}
