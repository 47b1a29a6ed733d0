use std::{io, path::PathBuf};

/// An error returned by `ezdraw`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ezdraw is not initialized; call ezdraw::init() first")]
    NotInitialized,
    #[error("failed to start the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("failed to present to window surface: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
    #[error("window was closed")]
    WindowClosed,
    #[error("drawing context stack is empty")]
    ContextStackEmpty,
    #[error("image '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },
    #[error("malformed font{}: {reason}", path.as_ref().map(|p| format!(" '{}'", p.display())).unwrap_or_default())]
    Font {
        path: Option<PathBuf>,
        reason: &'static str,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("no font is set and no default font is available")]
    NoFont,
    #[error("invalid buffer size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
