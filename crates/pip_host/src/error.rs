use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipError {
    #[error("Document Picture-in-Picture is not supported")]
    Unsupported,

    #[error("Failed to open picture-in-picture window: {0}")]
    RequestFailed(String),

    #[error("Failed to prepare picture-in-picture window: {0}")]
    Surface(String),
}
