//! # deSEC Sync Protocol
//!
//! Wire types for the deSEC rrset API.
//!
//! This crate provides:
//! - `RawRecord` as returned by `GET /v1/domains/{zone}/rrsets/`
//! - `FlatRecord`, one entry per record value
//! - `UpdateRecord` as sent by `PATCH /v1/domains/{zone}/rrsets/`
//! - `RecordType` for the supported record types
//! - `ChangeRequest` and `Plan` handed over by the host framework
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod change;
mod error;
mod record_type;
mod rrset;

pub use change::{ChangeKind, ChangeRequest, Plan, RecordSet};
pub use error::{ProtocolError, ProtocolResult};
pub use record_type::RecordType;
pub use rrset::{flatten, FlatRecord, RawRecord, UpdateRecord};
