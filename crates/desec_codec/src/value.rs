//! Typed record data.
//!
//! `TypedRecordData` is the per-type shape a decoded rrset is handed over in.
//! Composite fields stay strings exactly as split from the wire value; the
//! host framework is responsible for any further interpretation.

use desec_sync_protocol::RecordType;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One MX value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxValue {
    /// Preference (lower is preferred).
    pub preference: String,
    /// Mail exchange host.
    pub exchange: String,
}

/// One SRV value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvValue {
    /// Priority.
    pub priority: String,
    /// Relative weight among equal priorities.
    pub weight: String,
    /// Service port.
    pub port: String,
    /// Target host.
    pub target: String,
}

/// One DS value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsValue {
    /// Key tag of the referenced DNSKEY.
    pub key_tag: String,
    /// DNSKEY algorithm number.
    pub algorithm: String,
    /// Digest algorithm number.
    pub digest_type: String,
    /// Hex digest.
    pub digest: String,
}

/// One CAA value, quote characters removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaValue {
    /// Flags octet.
    pub flags: String,
    /// Property tag (`issue`, `issuewild`, `iodef`, ...).
    pub tag: String,
    /// Property value.
    pub value: String,
}

/// One TLSA value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsaValue {
    /// Certificate usage field.
    pub certificate_usage: String,
    /// Selector field.
    pub selector: String,
    /// Matching type field.
    pub matching_type: String,
    /// Certificate association data (hex).
    pub certificate_association_data: String,
}

/// The value part of an rrset, by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    /// Exactly one value (CNAME, PTR).
    Single(String),
    /// Plain value list (A, AAAA, NS, TXT).
    Multi(Vec<String>),
    /// MX values.
    Mx(Vec<MxValue>),
    /// SRV values.
    Srv(Vec<SrvValue>),
    /// DS values.
    Ds(Vec<DsValue>),
    /// CAA values.
    Caa(Vec<CaaValue>),
    /// TLSA values.
    Tlsa(Vec<TlsaValue>),
}

impl RecordValue {
    /// Returns the number of values.
    pub fn len(&self) -> usize {
        match self {
            RecordValue::Single(_) => 1,
            RecordValue::Multi(v) => v.len(),
            RecordValue::Mx(v) => v.len(),
            RecordValue::Srv(v) => v.len(),
            RecordValue::Ds(v) => v.len(),
            RecordValue::Caa(v) => v.len(),
            RecordValue::Tlsa(v) => v.len(),
        }
    }

    /// Returns true if there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders every value back into presentation format.
    ///
    /// CAA values are rendered without quotes since decoding removed them.
    pub fn rdata(&self) -> Vec<String> {
        match self {
            RecordValue::Single(v) => vec![v.clone()],
            RecordValue::Multi(v) => v.clone(),
            RecordValue::Mx(v) => v
                .iter()
                .map(|mx| format!("{} {}", mx.preference, mx.exchange))
                .collect(),
            RecordValue::Srv(v) => v
                .iter()
                .map(|srv| format!("{} {} {} {}", srv.priority, srv.weight, srv.port, srv.target))
                .collect(),
            RecordValue::Ds(v) => v
                .iter()
                .map(|ds| format!("{} {} {} {}", ds.key_tag, ds.algorithm, ds.digest_type, ds.digest))
                .collect(),
            RecordValue::Caa(v) => v
                .iter()
                .map(|caa| format!("{} {} {}", caa.flags, caa.tag, caa.value))
                .collect(),
            RecordValue::Tlsa(v) => v
                .iter()
                .map(|tlsa| {
                    format!(
                        "{} {} {} {}",
                        tlsa.certificate_usage,
                        tlsa.selector,
                        tlsa.matching_type,
                        tlsa.certificate_association_data
                    )
                })
                .collect(),
        }
    }
}

/// A decoded rrset: TTL, type and typed values.
///
/// Serializes to the record-data shape hosts expect:
/// `{"ttl": .., "type": .., "value": ..}` for single-value types and
/// `{"ttl": .., "type": .., "values": [..]}` for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRecordData {
    /// TTL in seconds.
    pub ttl: u32,
    /// Record type.
    pub record_type: RecordType,
    /// Typed values.
    pub value: RecordValue,
}

impl TypedRecordData {
    /// Creates new typed record data.
    pub fn new(ttl: u32, record_type: RecordType, value: RecordValue) -> Self {
        Self {
            ttl,
            record_type,
            value,
        }
    }

    /// Renders the values back into presentation format.
    pub fn rdata(&self) -> Vec<String> {
        self.value.rdata()
    }
}

impl Serialize for TypedRecordData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("ttl", &self.ttl)?;
        map.serialize_entry("type", &self.record_type)?;
        match &self.value {
            RecordValue::Single(v) => map.serialize_entry("value", v)?,
            RecordValue::Multi(v) => map.serialize_entry("values", v)?,
            RecordValue::Mx(v) => map.serialize_entry("values", v)?,
            RecordValue::Srv(v) => map.serialize_entry("values", v)?,
            RecordValue::Ds(v) => map.serialize_entry("values", v)?,
            RecordValue::Caa(v) => map.serialize_entry("values", v)?,
            RecordValue::Tlsa(v) => map.serialize_entry("values", v)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_value_shape() {
        let data = TypedRecordData::new(
            300,
            RecordType::Cname,
            RecordValue::Single("target.example.com.".into()),
        );
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"ttl": 300, "type": "CNAME", "value": "target.example.com."})
        );
    }

    #[test]
    fn composite_shape() {
        let data = TypedRecordData::new(
            3600,
            RecordType::Mx,
            RecordValue::Mx(vec![MxValue {
                preference: "10".into(),
                exchange: "mail.example.com.".into(),
            }]),
        );
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({
                "ttl": 3600,
                "type": "MX",
                "values": [{"preference": "10", "exchange": "mail.example.com."}]
            })
        );
    }

    #[test]
    fn rdata_rendering() {
        let srv = RecordValue::Srv(vec![SrvValue {
            priority: "10".into(),
            weight: "5".into(),
            port: "443".into(),
            target: "target.example.com.".into(),
        }]);
        assert_eq!(srv.rdata(), vec!["10 5 443 target.example.com."]);

        let caa = RecordValue::Caa(vec![CaaValue {
            flags: "0".into(),
            tag: "issue".into(),
            value: "letsencrypt.org".into(),
        }]);
        assert_eq!(caa.rdata(), vec!["0 issue letsencrypt.org"]);
        assert_eq!(caa.len(), 1);
    }

    #[test]
    fn lengths() {
        assert_eq!(RecordValue::Single("a.".into()).len(), 1);
        assert!(RecordValue::Multi(vec![]).is_empty());
        assert_eq!(
            RecordValue::Multi(vec!["192.0.2.1".into(), "192.0.2.2".into()]).len(),
            2
        );
    }
}
