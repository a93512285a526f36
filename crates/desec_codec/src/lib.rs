//! # deSEC Codec
//!
//! Translation between the deSEC rrset API and typed record data.
//!
//! The API stores every rrset as a flat list of presentation-format
//! strings. Hosts work with per-type structures instead: value lists for
//! A/AAAA/NS/TXT, a single value for CNAME/PTR, and composite values for
//! MX, SRV, DS, CAA and TLSA.
//!
//! ## Decoding rules
//!
//! - TXT values have every `;` escaped as `\;`
//! - CAA fields lose their surrounding quote characters
//! - Composite values must have exactly the field count of their type
//!
//! ## Encoding rules
//!
//! - Deletions are sent with an empty value list and a TTL of 3600
//! - Creates and updates carry the desired rrset verbatim
//!
//! ## Usage
//!
//! ```
//! use desec_codec::{decode, RecordValue};
//! use desec_sync_protocol::{FlatRecord, RecordType};
//!
//! let records = vec![FlatRecord::new("MX", "", 300, "10 mail.example.com.")];
//! let data = decode(RecordType::Mx, &records).unwrap();
//! assert_eq!(data.ttl, 300);
//! assert!(matches!(data.value, RecordValue::Mx(_)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{decode, escape_txt};
pub use encoder::{encode, encode_all, to_record_set, DELETE_TTL};
pub use error::{CodecError, CodecResult};
pub use value::{CaaValue, DsValue, MxValue, RecordValue, SrvValue, TlsaValue, TypedRecordData};

#[cfg(test)]
mod tests {
    use super::*;
    use desec_sync_protocol::{flatten, ChangeRequest, RawRecord, RecordType};
    use proptest::prelude::*;

    /// Decode a single raw rrset, then encode it back as a create.
    fn round_trip(raw: &RawRecord) -> desec_sync_protocol::UpdateRecord {
        let flat = flatten(std::slice::from_ref(raw));
        let record_type = RecordType::from_wire(&raw.rtype).unwrap();
        let data = decode(record_type, &flat).unwrap();
        encode(&ChangeRequest::create(to_record_set(&raw.subname, &data))).unwrap()
    }

    fn raw(subname: &str, rtype: &str, ttl: u32, values: &[&str]) -> RawRecord {
        RawRecord::new(subname, rtype, ttl, values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn round_trip_preserves_rrsets() {
        let cases = [
            raw("www", "A", 300, &["192.0.2.1", "192.0.2.2"]),
            raw("www", "AAAA", 300, &["2001:db8::1"]),
            raw("", "NS", 3600, &["ns1.desec.io.", "ns2.desec.org."]),
            raw("alias", "CNAME", 60, &["www.example.com."]),
            raw("1.2.0.192.in-addr.arpa", "PTR", 60, &["host.example.com."]),
            raw("", "MX", 3600, &["10 mx1.example.com.", "20 mx2.example.com."]),
            raw("_sip._tcp", "SRV", 3600, &["10 5 5060 sip.example.com."]),
            raw("sub", "DS", 3600, &["12345 13 2 49FD46E6C4B45C55D4AC"]),
            raw("_443._tcp", "TLSA", 3600, &["3 1 1 d2abde240d7cd3ee"]),
            raw("", "TXT", 300, &["\"hello world\""]),
        ];
        for case in &cases {
            let update = round_trip(case);
            assert_eq!(update.subname, case.subname, "{}", case.rtype);
            assert_eq!(update.rtype, case.rtype);
            assert_eq!(update.ttl, case.ttl);
            assert_eq!(update.records, case.records, "{}", case.rtype);
        }
    }

    #[test]
    fn round_trip_txt_gains_escapes() {
        let update = round_trip(&raw("", "TXT", 300, &["\"v=spf1; include:_spf.example.com\""]));
        assert_eq!(update.records, vec!["\"v=spf1\\; include:_spf.example.com\""]);
    }

    #[test]
    fn round_trip_caa_loses_quotes() {
        let update = round_trip(&raw("", "CAA", 3600, &["0 issue \"letsencrypt.org\""]));
        assert_eq!(update.records, vec!["0 issue letsencrypt.org"]);
    }

    #[test]
    fn single_value_keeps_first_entry() {
        let update = round_trip(&raw("alias", "CNAME", 60, &["a.example.", "b.example."]));
        assert_eq!(update.records, vec!["a.example."]);
    }

    proptest! {
        #[test]
        fn txt_escapes_every_semicolon(s in "[a-z0-9 =:;]{0,40}") {
            let escaped = escape_txt(&s);
            prop_assert_eq!(escaped.matches("\\;").count(), s.matches(';').count());
            prop_assert_eq!(escaped.replace("\\;", ";"), s);
        }

        #[test]
        fn mx_round_trip(pref in 0u16..=65535, host in "[a-z]{1,12}\\.example\\.com\\.") {
            let data = format!("{} {}", pref, host);
            let update = round_trip(&raw("", "MX", 300, &[data.as_str()]));
            prop_assert_eq!(update.records, vec![data]);
        }

        #[test]
        fn srv_round_trip(
            priority in 0u16..100,
            weight in 0u16..100,
            port in 1u16..=65535,
            target in "[a-z]{1,12}\\.example\\.",
        ) {
            let data = format!("{} {} {} {}", priority, weight, port, target);
            let update = round_trip(&raw("_svc._tcp", "SRV", 600, &[data.as_str()]));
            prop_assert_eq!(update.records, vec![data]);
        }

        #[test]
        fn short_mx_never_panics(s in "[0-9a-z.]{0,20}") {
            let records = vec![desec_sync_protocol::FlatRecord::new("MX", "", 300, s)];
            prop_assert!(decode(RecordType::Mx, &records).is_err());
        }
    }
}
