use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with an error status; `message` is its `error` field.
    #[error("{message}")]
    Relay { status: u16, message: String },

    /// The stream carried an error chunk or could not be decoded.
    #[error("{0}")]
    Stream(String),
}
