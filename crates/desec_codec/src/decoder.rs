//! Rrset decoder.
//!
//! Turns a group of flat records sharing `(name, type)` into typed record
//! data. Composite types are parsed by a strict positional grammar: values
//! are split on single spaces and must yield exactly the number of fields
//! the type defines, none of them empty.

use crate::error::{CodecError, CodecResult};
use crate::value::{CaaValue, DsValue, MxValue, RecordValue, SrvValue, TlsaValue, TypedRecordData};
use desec_sync_protocol::{FlatRecord, RecordType};

/// Decode a group of flat records into typed record data.
///
/// The TTL is taken from the first entry; the others are assumed to agree.
///
/// # Errors
///
/// Returns an error if the group is empty or a value does not match the
/// grammar of `record_type`.
pub fn decode(record_type: RecordType, records: &[FlatRecord]) -> CodecResult<TypedRecordData> {
    let first = records
        .first()
        .ok_or(CodecError::EmptyGroup(record_type))?;

    let value = match record_type {
        RecordType::A | RecordType::Aaaa | RecordType::Ns => decode_multiple(records),
        RecordType::Cname | RecordType::Ptr => RecordValue::Single(first.data.clone()),
        RecordType::Txt => decode_txt(records),
        RecordType::Mx => RecordValue::Mx(decode_each(record_type, records, parse_mx)?),
        RecordType::Srv => RecordValue::Srv(decode_each(record_type, records, parse_srv)?),
        RecordType::Ds => RecordValue::Ds(decode_each(record_type, records, parse_ds)?),
        RecordType::Caa => RecordValue::Caa(decode_each(record_type, records, parse_caa)?),
        RecordType::Tlsa => RecordValue::Tlsa(decode_each(record_type, records, parse_tlsa)?),
    };

    Ok(TypedRecordData::new(first.ttl, record_type, value))
}

/// Escape every semicolon in a TXT value.
pub fn escape_txt(data: &str) -> String {
    data.replace(';', "\\;")
}

fn decode_multiple(records: &[FlatRecord]) -> RecordValue {
    RecordValue::Multi(records.iter().map(|r| r.data.clone()).collect())
}

fn decode_txt(records: &[FlatRecord]) -> RecordValue {
    RecordValue::Multi(records.iter().map(|r| escape_txt(&r.data)).collect())
}

fn decode_each<T>(
    record_type: RecordType,
    records: &[FlatRecord],
    parse: fn(RecordType, &str) -> CodecResult<T>,
) -> CodecResult<Vec<T>> {
    records.iter().map(|r| parse(record_type, &r.data)).collect()
}

/// Split `data` into exactly `N` non-empty space-separated fields.
fn fields<const N: usize>(record_type: RecordType, data: &str) -> CodecResult<[&str; N]> {
    let parts: Vec<&str> = data.split(' ').collect();
    if parts.len() != N {
        return Err(CodecError::decode(
            record_type,
            data,
            format!("expected {} fields, found {}", N, parts.len()),
        ));
    }
    if let Some(pos) = parts.iter().position(|p| p.is_empty()) {
        return Err(CodecError::decode(
            record_type,
            data,
            format!("field {} is empty", pos + 1),
        ));
    }
    parts
        .try_into()
        .map_err(|_| CodecError::decode(record_type, data, "field count mismatch"))
}

fn parse_mx(record_type: RecordType, data: &str) -> CodecResult<MxValue> {
    let [preference, exchange] = fields::<2>(record_type, data)?;
    Ok(MxValue {
        preference: preference.to_string(),
        exchange: exchange.to_string(),
    })
}

fn parse_srv(record_type: RecordType, data: &str) -> CodecResult<SrvValue> {
    let [priority, weight, port, target] = fields::<4>(record_type, data)?;
    Ok(SrvValue {
        priority: priority.to_string(),
        weight: weight.to_string(),
        port: port.to_string(),
        target: target.to_string(),
    })
}

fn parse_ds(record_type: RecordType, data: &str) -> CodecResult<DsValue> {
    let [key_tag, algorithm, digest_type, digest] = fields::<4>(record_type, data)?;
    Ok(DsValue {
        key_tag: key_tag.to_string(),
        algorithm: algorithm.to_string(),
        digest_type: digest_type.to_string(),
        digest: digest.to_string(),
    })
}

fn parse_tlsa(record_type: RecordType, data: &str) -> CodecResult<TlsaValue> {
    let [certificate_usage, selector, matching_type, certificate_association_data] =
        fields::<4>(record_type, data)?;
    Ok(TlsaValue {
        certificate_usage: certificate_usage.to_string(),
        selector: selector.to_string(),
        matching_type: matching_type.to_string(),
        certificate_association_data: certificate_association_data.to_string(),
    })
}

/// CAA takes flags and tag as the first two fields and the remainder of
/// the line as the value, so quoted values containing spaces survive.
///
/// Taking only the third space-separated token instead would cut
/// `0 iodef "mailto:a b"` down to `"mailto:a`.
fn parse_caa(record_type: RecordType, data: &str) -> CodecResult<CaaValue> {
    let parts: Vec<&str> = data.splitn(3, ' ').collect();
    let [flags, tag, value]: [&str; 3] = parts.try_into().map_err(|p: Vec<&str>| {
        CodecError::decode(
            record_type,
            data,
            format!("expected 3 fields, found {}", p.len()),
        )
    })?;
    if flags.is_empty() || tag.is_empty() || value.is_empty() {
        return Err(CodecError::decode(record_type, data, "empty field"));
    }

    // flags and tag: leading quotes, then trailing quotes.
    // value: leading quotes, then quotes at both ends.
    Ok(CaaValue {
        flags: flags.trim_start_matches('"').trim_end_matches('"').to_string(),
        tag: tag.trim_start_matches('"').trim_end_matches('"').to_string(),
        value: value.trim_start_matches('"').trim_matches('"').to_string(),
    })
}
