//! deSEC rrset endpoints.

use crate::cancel::CancelHandle;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpTransport, Sleeper};
use crate::pagination::fetch_all;
use crate::transport::{HttpClient, HttpRequest};
use desec_sync_protocol::{RawRecord, UpdateRecord};
use std::sync::Arc;
use tracing::debug;

/// Client for the rrset endpoints of one deSEC account.
pub struct DesecApi<C: HttpClient> {
    transport: HttpTransport<C>,
    base_url: String,
    token: String,
}

impl<C: HttpClient> DesecApi<C> {
    /// Creates a new API client.
    pub fn new(
        transport: HttpTransport<C>,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Replaces the sleeper used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.transport = self.transport.with_sleeper(sleeper);
        self
    }

    /// Returns the transport.
    pub fn transport(&self) -> &HttpTransport<C> {
        &self.transport
    }

    /// Returns the rrset collection URL of a domain.
    pub fn rrsets_url(&self, domain: &str) -> String {
        format!("{}/v1/domains/{}/rrsets/", self.base_url, domain)
    }

    fn authorization(&self) -> (String, String) {
        ("Authorization".to_string(), format!("Token {}", self.token))
    }

    /// Fetches every rrset of a domain, following pagination.
    pub fn get_rrsets(&self, domain: &str, cancel: &CancelHandle) -> SyncResult<Vec<RawRecord>> {
        let url = format!("{}?cursor=", self.rrsets_url(domain));
        fetch_all(&self.transport, &url, &[self.authorization()], cancel)
    }

    /// Writes a batch of rrsets in one bulk request.
    pub fn update_rrsets(
        &self,
        domain: &str,
        rrsets: &[UpdateRecord],
        cancel: &CancelHandle,
    ) -> SyncResult<()> {
        let body = serde_json::to_vec(rrsets)
            .map_err(|e| SyncError::Protocol(format!("failed to encode rrsets: {}", e)))?;
        let (name, value) = self.authorization();
        let request = HttpRequest::patch(self.rrsets_url(domain))
            .with_header(name, value)
            .with_header("Content-Type", "application/json")
            .with_body(body);

        debug!(domain, rrsets = rrsets.len(), "sending rrset update");
        self.transport.send(&request, 200, cancel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::transport::{HttpResponse, Method, MockHttpClient};

    fn api(client: MockHttpClient) -> DesecApi<MockHttpClient> {
        DesecApi::new(
            HttpTransport::new(client, RetryConfig::no_retry()),
            "https://desec.io/api",
            "secret",
        )
    }

    #[test]
    fn rrsets_url() {
        let api = api(MockHttpClient::new());
        assert_eq!(
            api.rrsets_url("example.com"),
            "https://desec.io/api/v1/domains/example.com/rrsets/"
        );
    }

    #[test]
    fn get_rrsets_starts_with_empty_cursor() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(200, "[]"));
        let api = api(client);

        api.get_rrsets("example.com", &CancelHandle::new()).unwrap();
        let requests = api.transport().client().requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url,
            "https://desec.io/api/v1/domains/example.com/rrsets/?cursor="
        );
        assert_eq!(requests[0].header("Authorization"), Some("Token secret"));
    }

    #[test]
    fn update_rrsets_sends_json_batch() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(200, "[]"));
        let api = api(client);

        let batch = vec![UpdateRecord {
            subname: "www".into(),
            rtype: "A".into(),
            ttl: 3600,
            records: vec![],
        }];
        api.update_rrsets("example.com", &batch, &CancelHandle::new()).unwrap();

        let requests = api.transport().client().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url, "https://desec.io/api/v1/domains/example.com/rrsets/");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), Some("Token secret"));
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!([{"subname": "www", "type": "A", "ttl": 3600, "records": []}])
        );
    }

    #[test]
    fn update_rrsets_failure() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(400, r#"[{"records": ["invalid"]}]"#));
        let api = api(client);
        let err = api
            .update_rrsets("example.com", &[], &CancelHandle::new())
            .unwrap_err();
        assert!(matches!(err, SyncError::RetriesExhausted { attempts: 1, .. }));
    }
}
