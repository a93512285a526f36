//! Change encoder.
//!
//! Turns plan changes into entries of the bulk rrset PATCH body.

use crate::error::{CodecError, CodecResult};
use crate::value::TypedRecordData;
use desec_sync_protocol::{ChangeKind, ChangeRequest, RecordSet, UpdateRecord};

/// TTL sent with every deletion.
///
/// The API rejects rrsets whose TTL is below the account minimum, and that
/// check also applies to the empty rrset a deletion sends. Records with a
/// short TTL (dynamic DNS entries) could otherwise never be deleted.
pub const DELETE_TTL: u32 = 3600;

/// Encode one change into an update entry.
///
/// # Errors
///
/// Returns an error if the change kind is not `create`, `update` or
/// `delete`, or if the change lacks the rrset its kind needs.
pub fn encode(change: &ChangeRequest) -> CodecResult<UpdateRecord> {
    let kind = change
        .change_kind()
        .map_err(|_| CodecError::UnsupportedChange {
            kind: change.kind.clone(),
        })?;

    match kind {
        ChangeKind::Delete => {
            let existing = change
                .existing
                .as_ref()
                .ok_or(CodecError::IncompleteChange {
                    kind,
                    missing: "existing",
                })?;
            Ok(UpdateRecord {
                subname: existing.name.clone(),
                rtype: existing.rtype.clone(),
                ttl: DELETE_TTL,
                records: Vec::new(),
            })
        }
        ChangeKind::Create | ChangeKind::Update => {
            let new = change.new.as_ref().ok_or(CodecError::IncompleteChange {
                kind,
                missing: "new",
            })?;
            Ok(UpdateRecord {
                subname: new.name.clone(),
                rtype: new.rtype.clone(),
                ttl: new.ttl,
                records: new.values.clone(),
            })
        }
    }
}

/// Encode every change, stopping at the first failure.
pub fn encode_all(changes: &[ChangeRequest]) -> CodecResult<Vec<UpdateRecord>> {
    changes.iter().map(encode).collect()
}

/// Build the host-side rrset for decoded record data.
pub fn to_record_set(name: impl Into<String>, data: &TypedRecordData) -> RecordSet {
    RecordSet::new(name, data.record_type.as_str(), data.ttl, data.rdata())
}
