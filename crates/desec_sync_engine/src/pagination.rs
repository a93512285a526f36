//! Cursor pagination over the rrset listing.
//!
//! The API splits large listings into pages and links each page to the next
//! with a `Link: <url>; rel="next"` header. The reader follows those links
//! until a page comes without one.

use crate::cancel::CancelHandle;
use crate::error::{SyncError, SyncResult};
use crate::http::HttpTransport;
use crate::transport::{HttpClient, HttpRequest};
use desec_sync_protocol::RawRecord;
use std::collections::HashMap;
use tracing::debug;

/// Fetch every page starting at `url` and concatenate them in page order.
///
/// `headers` are sent with every page request. A server that links a page
/// to itself keeps the reader looping until cancelled.
///
/// # Errors
///
/// Fails if any page request fails after retries, a page is not a JSON
/// array of rrsets, or `cancel` fires.
pub fn fetch_all<C: HttpClient>(
    transport: &HttpTransport<C>,
    url: &str,
    headers: &[(String, String)],
    cancel: &CancelHandle,
) -> SyncResult<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut next = Some(url.to_string());
    let mut pages = 0usize;

    while let Some(url) = next.take() {
        cancel.check()?;

        let mut request = HttpRequest::get(url.as_str());
        request.headers.extend_from_slice(headers);
        let response = transport.send(&request, 200, cancel)?;

        let page: Vec<RawRecord> = serde_json::from_slice(&response.body)
            .map_err(|e| SyncError::Protocol(format!("invalid rrset page from {}: {}", url, e)))?;
        pages += 1;
        debug!(url = %url, page = pages, rrsets = page.len(), "fetched rrset page");
        records.extend(page);

        next = response
            .header("link")
            .and_then(|link| parse_link_header(link).remove("next"));
    }

    Ok(records)
}

/// Parse a `Link` header into a map from relation type to target URL.
///
/// Accepts the RFC 8288 form `<url>; rel="next", <url>; rel="prev"`. A link
/// with several space-separated relations is registered under each of them;
/// when a relation repeats, the last link wins.
pub fn parse_link_header(value: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    let mut rest = value;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let target = &rest[open + 1..open + close];
        let after = &rest[open + close + 1..];
        let params_end = after.find('<').unwrap_or(after.len());

        for param in after[..params_end].split([';', ',']) {
            let Some((key, val)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("rel") {
                continue;
            }
            for rel in val.trim().trim_matches('"').split_whitespace() {
                links.insert(rel.to_ascii_lowercase(), target.to_string());
            }
        }

        rest = &after[params_end..];
    }

    links
}
