use thiserror::Error;

/// Main error type for recmetrics
#[derive(Error, Debug)]
pub enum RecmetricsError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ratings file parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Caller contract violations (e.g. n = 0, k = 0)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Recommender model errors during fit or predict
    #[error("Model error: {0}")]
    Model(String),
}

/// Convenient Result type using RecmetricsError
pub type Result<T> = std::result::Result<T, RecmetricsError>;
