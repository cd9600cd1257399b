use thiserror::Error;

/// Result type alias for duet-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types shared by every duet crate
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Answer service errors (HTTP status, malformed payloads)
    #[error("provider error: {0}")]
    Provider(String),

    /// Messaging network or wallet errors
    #[error("messaging error: {0}")]
    Messaging(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// An outbound call exceeded its deadline
    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(format!("TOML parse error: {}", err))
    }
}
