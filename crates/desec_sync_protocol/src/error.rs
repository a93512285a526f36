//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while interpreting wire values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Record type outside the supported set.
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),

    /// Change kind other than create, update or delete.
    #[error("unknown change kind: {0}")]
    UnknownChangeKind(String),
}
