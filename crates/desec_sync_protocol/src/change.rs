//! Changes handed over by the host framework.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of change between desired and observed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Rrset is new.
    Create,
    /// Rrset exists with different TTL or values.
    Update,
    /// Rrset exists but is no longer desired.
    Delete,
}

impl ChangeKind {
    /// Returns the kind as it appears in a plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        }
    }
}

impl FromStr for ChangeKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ChangeKind::Create),
            "update" => Ok(ChangeKind::Update),
            "delete" => Ok(ChangeKind::Delete),
            other => Err(ProtocolError::UnknownChangeKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An rrset as known to the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Name relative to the zone apex.
    pub name: String,
    /// Record type mnemonic.
    #[serde(rename = "type")]
    pub rtype: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Record values in presentation format.
    pub values: Vec<String>,
}

impl RecordSet {
    /// Creates a new record set.
    pub fn new(
        name: impl Into<String>,
        rtype: impl Into<String>,
        ttl: u32,
        values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rtype: rtype.into(),
            ttl,
            values,
        }
    }
}

/// One diff entry of a plan.
///
/// The kind is kept as received so that plans carrying kinds this provider
/// does not understand can still be loaded and rejected when encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Change kind (`create`, `update` or `delete`).
    pub kind: String,
    /// Observed rrset, present for updates and deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<RecordSet>,
    /// Desired rrset, present for creates and updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<RecordSet>,
}

impl ChangeRequest {
    /// Creates a change that adds a new rrset.
    pub fn create(new: RecordSet) -> Self {
        Self {
            kind: ChangeKind::Create.as_str().into(),
            existing: None,
            new: Some(new),
        }
    }

    /// Creates a change that replaces an existing rrset.
    pub fn update(existing: RecordSet, new: RecordSet) -> Self {
        Self {
            kind: ChangeKind::Update.as_str().into(),
            existing: Some(existing),
            new: Some(new),
        }
    }

    /// Creates a change that removes an existing rrset.
    pub fn delete(existing: RecordSet) -> Self {
        Self {
            kind: ChangeKind::Delete.as_str().into(),
            existing: Some(existing),
            new: None,
        }
    }

    /// Parses the change kind.
    pub fn change_kind(&self) -> ProtocolResult<ChangeKind> {
        self.kind.parse()
    }
}

/// The diff between desired and observed state of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Zone name, with or without the trailing dot.
    pub zone: String,
    /// Changes to apply.
    pub changes: Vec<ChangeRequest>,
}

impl Plan {
    /// Creates a new plan.
    pub fn new(zone: impl Into<String>, changes: Vec<ChangeRequest>) -> Self {
        Self {
            zone: zone.into(),
            changes,
        }
    }

    /// Returns the zone name as used in API paths (no trailing dot).
    pub fn domain(&self) -> &str {
        self.zone.trim_end_matches('.')
    }

    /// Returns true if the plan has no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
