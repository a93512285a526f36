//! # deSEC Sync Engine
//!
//! Zone synchronization against the deSEC DNS API.
//!
//! This crate provides:
//! - An HTTP transport retrying with exponential backoff
//! - Cursor pagination over the rrset listing
//! - The rrset endpoints (`DesecApi`)
//! - A provider that populates zones and applies plans (`DesecProvider`)
//! - A blocking `reqwest` client and a scripted mock client
//!
//! ## Architecture
//!
//! Reads and writes go through the same transport:
//! 1. `populate` pages through `GET /v1/domains/{zone}/rrsets/`, groups the
//!    values by name and type, decodes them and hands them to a `ZoneSink`
//! 2. `apply` encodes every change of a plan and sends them in one
//!    `PATCH /v1/domains/{zone}/rrsets/`
//!
//! ## Key Invariants
//!
//! - Only GET and PATCH are issued
//! - Failed attempts are retried with doubling backoff, 429 included
//! - A plan is written in exactly one request or not at all
//! - Any undecodable record aborts the populate
//!
//! ## Usage
//!
//! ```no_run
//! use desec_sync_engine::{DesecProvider, MemoryZone, ProviderConfig};
//!
//! let provider = DesecProvider::connect(ProviderConfig::new("desec", "my-token"))?;
//! let mut zone = MemoryZone::new("example.com.");
//! let report = provider.populate(&mut zone)?;
//! println!("{} rrsets", report.records);
//! # Ok::<(), desec_sync_engine::SyncError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod cancel;
mod config;
mod error;
mod http;
mod pagination;
mod provider;
mod reqwest_client;
mod transport;
mod zone;

pub use api::DesecApi;
pub use cancel::CancelHandle;
pub use config::{ProviderConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{SyncError, SyncResult};
pub use http::{HttpTransport, Sleeper, ThreadSleeper};
pub use pagination::{fetch_all, parse_link_header};
pub use provider::{
    group_records, ApplyReport, DesecProvider, PopulateReport, ProviderStats, RecordGroups,
};
pub use reqwest_client::ReqwestClient;
pub use transport::{HttpClient, HttpRequest, HttpResponse, Method, MockHttpClient};
pub use zone::{MemoryZone, ZoneSink};
