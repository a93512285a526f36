//! Record types managed through the rrset API.

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A DNS record type the provider reads and writes.
///
/// Types returned by the API that are not listed here (SOA, OPENPGPKEY, ...)
/// are skipped when a zone is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address.
    A,
    /// IPv6 address.
    Aaaa,
    /// Certification authority authorization.
    Caa,
    /// Canonical name.
    Cname,
    /// Delegation signer.
    Ds,
    /// Mail exchange.
    Mx,
    /// Name server.
    Ns,
    /// Pointer.
    Ptr,
    /// Service locator.
    Srv,
    /// TLS association.
    Tlsa,
    /// Text.
    Txt,
}

impl RecordType {
    /// Every supported record type, in alphabetical order.
    pub const SUPPORTED: [RecordType; 11] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Ds,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Ptr,
        RecordType::Srv,
        RecordType::Tlsa,
        RecordType::Txt,
    ];

    /// Returns the mnemonic used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Ds => "DS",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Tlsa => "TLSA",
            RecordType::Txt => "TXT",
        }
    }

    /// Looks up a wire mnemonic, returning `None` for unsupported types.
    pub fn from_wire(mnemonic: &str) -> Option<Self> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|t| t.as_str() == mnemonic)
    }

    /// Returns true if the type holds exactly one value per rrset.
    pub fn is_single_value(&self) -> bool {
        matches!(self, RecordType::Cname | RecordType::Ptr)
    }
}

impl FromStr for RecordType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| ProtocolError::UnknownRecordType(s.to_string()))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
