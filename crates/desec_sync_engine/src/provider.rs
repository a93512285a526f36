//! Zone sync driver.
//!
//! `DesecProvider` reads a zone from the API into a [`ZoneSink`] and writes
//! a [`Plan`] back as one bulk rrset update.

use crate::api::DesecApi;
use crate::cancel::CancelHandle;
use crate::config::ProviderConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpTransport, Sleeper};
use crate::reqwest_client::ReqwestClient;
use crate::transport::HttpClient;
use crate::zone::ZoneSink;
use desec_codec::{decode, encode_all, TypedRecordData};
use desec_sync_protocol::{flatten, FlatRecord, Plan, RawRecord, RecordType};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// Statistics about provider operations.
#[derive(Debug, Clone, Default)]
pub struct ProviderStats {
    /// Completed populates.
    pub populates: u64,
    /// Rrsets handed to zones.
    pub records_populated: u64,
    /// Completed applies.
    pub applies: u64,
    /// Changes written.
    pub changes_applied: u64,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Result of a populate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateReport {
    /// Rrsets added to the zone.
    pub records: usize,
    /// Rrset values skipped because their type is not supported.
    pub skipped: usize,
    /// Whether this provider had populated the zone before.
    pub exists: bool,
    /// Duration of the populate.
    pub duration: Duration,
}

/// Result of an apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries sent in the bulk update.
    pub changes: usize,
    /// How many of them were deletions.
    pub deletions: usize,
    /// Duration of the apply.
    pub duration: Duration,
}

/// Rrset groups keyed by `(name, type)`, in sorted order.
pub type RecordGroups = BTreeMap<(String, RecordType), Vec<FlatRecord>>;

/// Provider synchronizing zones with the deSEC API.
pub struct DesecProvider<C: HttpClient> {
    id: String,
    api: DesecApi<C>,
    known_zones: RwLock<HashSet<String>>,
    stats: RwLock<ProviderStats>,
}

impl DesecProvider<ReqwestClient> {
    /// Creates a provider talking HTTP through `reqwest`.
    pub fn connect(config: ProviderConfig) -> SyncResult<Self> {
        let client = ReqwestClient::new(config.timeout)?;
        Self::new(config, client)
    }
}

impl<C: HttpClient> DesecProvider<C> {
    /// Geo-aware records are not supported.
    pub const SUPPORTS_GEO: bool = false;
    /// NS records at the zone apex are managed.
    pub const SUPPORTS_ROOT_NS: bool = true;

    /// Creates a provider using `client` for HTTP.
    pub fn new(config: ProviderConfig, client: C) -> SyncResult<Self> {
        if config.token.is_empty() {
            return Err(SyncError::Configuration("API token is empty".into()));
        }
        if config.base_url.is_empty() {
            return Err(SyncError::Configuration("API base URL is empty".into()));
        }

        debug!(id = %config.id, base_url = %config.base_url, "creating desec provider");
        let transport = HttpTransport::new(client, config.retry.clone());

        Ok(Self {
            id: config.id,
            api: DesecApi::new(transport, config.base_url, config.token),
            known_zones: RwLock::new(HashSet::new()),
            stats: RwLock::new(ProviderStats::default()),
        })
    }

    /// Replaces the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.api = self.api.with_sleeper(sleeper);
        self
    }

    /// Returns the provider ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the API client.
    pub fn api(&self) -> &DesecApi<C> {
        &self.api
    }

    /// Gets the current stats.
    pub fn stats(&self) -> ProviderStats {
        self.stats.read().clone()
    }

    /// Returns true if `record_type` is managed by this provider.
    pub fn supports(record_type: &str) -> bool {
        RecordType::from_wire(record_type).is_some()
    }

    /// Loads every supported rrset of the zone from the API into `zone`.
    ///
    /// # Errors
    ///
    /// Fails if the API cannot be read, a record value cannot be decoded,
    /// or the zone rejects a record. Nothing is added to the zone unless
    /// every rrset decodes.
    pub fn populate<Z: ZoneSink>(&self, zone: &mut Z) -> SyncResult<PopulateReport> {
        self.populate_with_cancel(zone, &CancelHandle::new())
    }

    /// Like [`populate`](Self::populate), aborting with
    /// `SyncError::Cancelled` once `cancel` fires.
    ///
    /// The handle belongs to this call only; concurrent populates and
    /// applies on the same provider are unaffected by it.
    pub fn populate_with_cancel<Z: ZoneSink>(
        &self,
        zone: &mut Z,
        cancel: &CancelHandle,
    ) -> SyncResult<PopulateReport> {
        let span = info_span!("populate", provider = %self.id, zone = %zone.name());
        let _guard = span.enter();

        match self.populate_zone(zone, cancel) {
            Ok(report) => {
                let mut stats = self.stats.write();
                stats.populates += 1;
                stats.records_populated += report.records as u64;
                stats.last_error = None;
                Ok(report)
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn populate_zone<Z: ZoneSink>(
        &self,
        zone: &mut Z,
        cancel: &CancelHandle,
    ) -> SyncResult<PopulateReport> {
        let start = Instant::now();
        let domain = zone.name().trim_end_matches('.').to_string();
        debug!("populate: name={}", zone.name());

        let rrsets = self.api.get_rrsets(&domain, cancel)?;
        let (groups, skipped) = group_records(&rrsets);

        let mut decoded: Vec<(&str, TypedRecordData)> = Vec::with_capacity(groups.len());
        for ((name, record_type), records) in &groups {
            decoded.push((name.as_str(), decode(*record_type, records)?));
        }

        let before = zone.record_count();
        for (name, data) in decoded {
            zone.add_record(name, data)?;
        }
        let records = zone.record_count().saturating_sub(before);

        let exists = !self.known_zones.write().insert(domain);
        info!("populate: found {} records, exists={}", records, exists);

        Ok(PopulateReport {
            records,
            skipped,
            exists,
            duration: start.elapsed(),
        })
    }

    /// Writes every change of `plan` in a single bulk update.
    ///
    /// # Errors
    ///
    /// Fails without contacting the API if any change cannot be encoded, and
    /// fails if the update request fails after retries.
    pub fn apply(&self, plan: &Plan) -> SyncResult<ApplyReport> {
        self.apply_with_cancel(plan, &CancelHandle::new())
    }

    /// Like [`apply`](Self::apply), aborting with `SyncError::Cancelled`
    /// once `cancel` fires. A cancelled apply may still have been written
    /// if the request was already answered.
    pub fn apply_with_cancel(&self, plan: &Plan, cancel: &CancelHandle) -> SyncResult<ApplyReport> {
        let span = info_span!("apply", provider = %self.id, zone = %plan.zone);
        let _guard = span.enter();

        let start = Instant::now();
        let result = encode_all(&plan.changes)
            .map_err(SyncError::from)
            .and_then(|updates| {
                self.api.update_rrsets(plan.domain(), &updates, cancel)?;
                Ok(updates)
            });

        match result {
            Ok(updates) => {
                let report = ApplyReport {
                    changes: updates.len(),
                    deletions: updates.iter().filter(|u| u.is_deletion()).count(),
                    duration: start.elapsed(),
                };
                info!(
                    changes = report.changes,
                    deletions = report.deletions,
                    "apply: wrote rrsets"
                );
                let mut stats = self.stats.write();
                stats.applies += 1;
                stats.changes_applied += report.changes as u64;
                stats.last_error = None;
                Ok(report)
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn handle_error(&self, error: &SyncError) {
        self.stats.write().last_error = Some(error.to_string());
    }
}

/// Flattens rrsets and groups the values of supported types by
/// `(name, type)`. Returns the groups and the number of skipped values.
pub fn group_records(rrsets: &[RawRecord]) -> (RecordGroups, usize) {
    let mut groups = RecordGroups::new();
    let mut skipped = 0;

    for record in flatten(rrsets) {
        let Some(record_type) = RecordType::from_wire(&record.rtype) else {
            debug!(name = %record.name, rtype = %record.rtype, "skipping unsupported record type");
            skipped += 1;
            continue;
        };
        groups
            .entry((record.name.clone(), record_type))
            .or_default()
            .push(record);
    }

    (groups, skipped)
}
