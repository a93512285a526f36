//! Error types for the sync engine.

use desec_codec::CodecError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Every attempt of a request failed.
    #[error("too many API retries: {method} {url} failed {attempts} times, last: {last_error}")]
    RetriesExhausted {
        /// Request method.
        method: String,
        /// Request URL.
        url: String,
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Status or transport error of the last attempt.
        last_error: String,
    },

    /// Only GET and PATCH are issued against the API.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Response body could not be interpreted.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Record data could not be decoded or a change could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The zone rejected a decoded record.
    #[error("zone error: {0}")]
    Zone(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Sync was cancelled.
    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// Returns true if running the whole operation again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::RetriesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desec_sync_protocol::RecordType;

    #[test]
    fn retryable_errors() {
        let exhausted = SyncError::RetriesExhausted {
            method: "GET".into(),
            url: "https://desec.io/api/v1/domains/example.com/rrsets/".into(),
            attempts: 6,
            last_error: "status 503".into(),
        };
        assert!(exhausted.is_retryable());
        assert!(!SyncError::UnsupportedMethod("POST".into()).is_retryable());
        assert!(!SyncError::Cancelled.is_retryable());
        assert!(!SyncError::Codec(CodecError::EmptyGroup(RecordType::A)).is_retryable());
    }

    #[test]
    fn error_display() {
        let err = SyncError::Cancelled;
        assert_eq!(err.to_string(), "sync cancelled");

        let err = SyncError::RetriesExhausted {
            method: "PATCH".into(),
            url: "https://desec.io/api/v1/domains/example.com/rrsets/".into(),
            attempts: 6,
            last_error: "status 429".into(),
        };
        assert!(err.to_string().starts_with("too many API retries"));
        assert!(err.to_string().contains("6 times"));
        assert!(err.to_string().contains("status 429"));
    }
}
