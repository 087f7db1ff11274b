use thiserror::Error;
use waclip_core::CoreError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("failed to open {target}: {message}")]
    Launch { target: String, message: String },
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("poll cycle panicked: {0}")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
