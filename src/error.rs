//! Error types for data fetching and record decoding.

use thiserror::Error;

use crate::source::Resource;

/// Errors from a single poll cycle.
///
/// All of these are transient: the poller logs them, keeps the previous
/// snapshot and tries again on the next interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Failed to read a local payload.
    #[error("Read error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// A single malformed entry inside an otherwise valid collection.
///
/// The entry is dropped and the rest of the collection is still published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource} record #{index} rejected: {reason}")]
pub struct InvalidRecord {
    pub resource: Resource,
    pub index: usize,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_display() {
        let err = InvalidRecord {
            resource: Resource::Threats,
            index: 3,
            reason: "unknown severity: Severe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "threats record #3 rejected: unknown severity: Severe"
        );
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Parse(_)));
    }
}
