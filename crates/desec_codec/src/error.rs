//! Error types for the codec crate.

use desec_sync_protocol::{ChangeKind, RecordType};
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A record value does not match the grammar of its type.
    #[error("cannot decode {record_type} value {data:?}: {reason}")]
    Decode {
        /// Type being decoded.
        record_type: RecordType,
        /// The offending value.
        data: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// Decoding was asked for a group without entries.
    #[error("empty {0} record group")]
    EmptyGroup(RecordType),

    /// Change kind other than create, update or delete.
    #[error("unsupported change type: {kind}")]
    UnsupportedChange {
        /// The kind as found in the plan.
        kind: String,
    },

    /// A change lacks the rrset its kind requires.
    #[error("{kind} change without {missing} record")]
    IncompleteChange {
        /// Change kind.
        kind: ChangeKind,
        /// Which side is missing (`existing` or `new`).
        missing: &'static str,
    },
}

impl CodecError {
    /// Create a decode error.
    pub fn decode(
        record_type: RecordType,
        data: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            record_type,
            data: data.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CodecError::decode(RecordType::Mx, "10", "expected 2 fields, found 1");
        assert_eq!(
            err.to_string(),
            "cannot decode MX value \"10\": expected 2 fields, found 1"
        );

        let err = CodecError::UnsupportedChange {
            kind: "rename".into(),
        };
        assert_eq!(err.to_string(), "unsupported change type: rename");

        let err = CodecError::IncompleteChange {
            kind: ChangeKind::Delete,
            missing: "existing",
        };
        assert_eq!(err.to_string(), "delete change without existing record");
    }
}
