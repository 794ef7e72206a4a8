use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Why a single fetch of the feed did not produce a document.
///
/// Every variant takes the same failure path in the refresh cycle; the
/// distinction only matters for logging.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Malformed feed document: {0}")]
    Decode(String),

    #[error("Request timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("Fetch task failed: {0}")]
    Task(String),
}
