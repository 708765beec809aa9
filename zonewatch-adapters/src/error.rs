//! Error types for adapters.

use thiserror::Error;
use zonewatch_types::ZoneKey;

/// Errors that can occur when fetching or adapting zone data.
///
/// The refresh loop treats every variant the same way: the affected zone is
/// shown as unavailable until a later fetch succeeds.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to decode the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A required field is absent from the payload.
    #[error("Malformed payload: missing {0}")]
    Malformed(&'static str),

    /// The server does not know this zone.
    #[error("Unknown zone '{0}'")]
    NotFound(ZoneKey),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The fetch task panicked or was cancelled before answering.
    #[error("Fetch aborted: {0}")]
    Aborted(String),

    /// Local I/O error (file-backed sources).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
