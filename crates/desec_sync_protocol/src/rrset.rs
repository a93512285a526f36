//! Rrset shapes exchanged with the API.

use serde::{Deserialize, Serialize};

/// An rrset as returned by the read endpoint.
///
/// One `RawRecord` carries every value of a `(subname, type)` pair under a
/// single TTL. Fields the API adds (`name`, `created`, `touched`, ...) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Name relative to the zone apex (empty for the apex).
    pub subname: String,
    /// Record type mnemonic, possibly outside the supported set.
    #[serde(rename = "type")]
    pub rtype: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Record values in presentation format.
    pub records: Vec<String>,
}

impl RawRecord {
    /// Creates a new raw record.
    pub fn new(
        subname: impl Into<String>,
        rtype: impl Into<String>,
        ttl: u32,
        records: Vec<String>,
    ) -> Self {
        Self {
            subname: subname.into(),
            rtype: rtype.into(),
            ttl,
            records,
        }
    }

    /// Explodes the rrset into one entry per value.
    pub fn flatten(&self) -> impl Iterator<Item = FlatRecord> + '_ {
        self.records.iter().map(move |data| FlatRecord {
            rtype: self.rtype.clone(),
            name: self.subname.clone(),
            ttl: self.ttl,
            data: data.clone(),
        })
    }
}

/// A single record value with its owner name, type and TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    /// Record type mnemonic.
    pub rtype: String,
    /// Name relative to the zone apex.
    pub name: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// One value in presentation format.
    pub data: String,
}

impl FlatRecord {
    /// Creates a new flat record.
    pub fn new(
        rtype: impl Into<String>,
        name: impl Into<String>,
        ttl: u32,
        data: impl Into<String>,
    ) -> Self {
        Self {
            rtype: rtype.into(),
            name: name.into(),
            ttl,
            data: data.into(),
        }
    }
}

/// Flattens a page sequence of rrsets, preserving order.
pub fn flatten(records: &[RawRecord]) -> Vec<FlatRecord> {
    records.iter().flat_map(RawRecord::flatten).collect()
}

/// An rrset as sent to the write endpoint.
///
/// An empty `records` list deletes the `(subname, type)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Name relative to the zone apex.
    pub subname: String,
    /// Record type mnemonic.
    #[serde(rename = "type")]
    pub rtype: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Record values in presentation format.
    pub records: Vec<String>,
}

impl UpdateRecord {
    /// Returns true if this entry deletes its rrset.
    pub fn is_deletion(&self) -> bool {
        self.records.is_empty()
    }
}
