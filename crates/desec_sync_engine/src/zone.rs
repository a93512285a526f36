//! Zone sinks receiving populated records.

use crate::error::{SyncError, SyncResult};
use desec_codec::{to_record_set, TypedRecordData};
use desec_sync_protocol::{RecordSet, RecordType};
use std::collections::BTreeMap;

/// Receives decoded rrsets while a zone is populated.
///
/// This is the seam to the host framework's zone model: the provider calls
/// `add_record` once per `(name, type)` pair found at the API.
pub trait ZoneSink {
    /// Zone name, usually with a trailing dot.
    fn name(&self) -> &str;

    /// Adds one decoded rrset under `name` (relative to the apex).
    fn add_record(&mut self, name: &str, data: TypedRecordData) -> SyncResult<()>;

    /// Number of rrsets currently held.
    fn record_count(&self) -> usize;
}

/// An in-memory zone.
#[derive(Debug, Clone, Default)]
pub struct MemoryZone {
    name: String,
    records: BTreeMap<(String, RecordType), TypedRecordData>,
}

impl MemoryZone {
    /// Creates an empty zone.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: BTreeMap::new(),
        }
    }

    /// Looks up the rrset for `(name, record_type)`.
    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&TypedRecordData> {
        self.records.get(&(name.to_string(), record_type))
    }

    /// Iterates over all rrsets, ordered by name then type.
    pub fn records(&self) -> impl Iterator<Item = (&str, &TypedRecordData)> {
        self.records
            .iter()
            .map(|((name, _), data)| (name.as_str(), data))
    }

    /// Returns every rrset in host form.
    pub fn to_record_sets(&self) -> Vec<RecordSet> {
        self.records()
            .map(|(name, data)| to_record_set(name, data))
            .collect()
    }

    /// Returns true if the zone holds no rrsets.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ZoneSink for MemoryZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_record(&mut self, name: &str, data: TypedRecordData) -> SyncResult<()> {
        let key = (name.to_string(), data.record_type);
        if self.records.contains_key(&key) {
            return Err(SyncError::Zone(format!(
                "duplicate {} rrset for {:?} in {}",
                data.record_type, name, self.name
            )));
        }
        self.records.insert(key, data);
        Ok(())
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}
