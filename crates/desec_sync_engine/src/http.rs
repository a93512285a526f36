//! Retrying HTTP transport.
//!
//! `HttpTransport` wraps an [`HttpClient`] and retries every request whose
//! status differs from the expected one, sleeping with exponential backoff
//! in between. Rate limiting (429) is treated like any other unexpected
//! status; `Retry-After` is not consulted.

use crate::cancel::CancelHandle;
use crate::config::RetryConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, Method};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Waits between retry attempts.
pub trait Sleeper: Send + Sync {
    /// Sleeps for `duration`, returning early with `SyncError::Cancelled`
    /// if `cancel` fires.
    fn sleep(&self, duration: Duration, cancel: &CancelHandle) -> SyncResult<()>;
}

/// Blocks the calling thread, waking up periodically to observe cancellation.
#[derive(Debug, Clone)]
pub struct ThreadSleeper {
    slice: Duration,
}

impl ThreadSleeper {
    /// Creates a sleeper that checks for cancellation every `slice`.
    pub fn new(slice: Duration) -> Self {
        Self { slice }
    }
}

impl Default for ThreadSleeper {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration, cancel: &CancelHandle) -> SyncResult<()> {
        let deadline = Instant::now() + duration;
        loop {
            cancel.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// HTTP transport with retry and exponential backoff.
///
/// The transport holds no cancellation state of its own; every call takes
/// the handle of the operation it belongs to.
pub struct HttpTransport<C: HttpClient> {
    client: C,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
    retries: AtomicU64,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new transport.
    pub fn new(client: C, retry: RetryConfig) -> Self {
        Self {
            client,
            retry,
            sleeper: Arc::new(ThreadSleeper::default()),
            retries: AtomicU64::new(0),
        }
    }

    /// Replaces the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Total number of retries performed by this transport.
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::SeqCst)
    }

    /// Sends a request, retrying until the response has `expected_status`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMethod` for anything but GET and PATCH, without
    ///   issuing a request
    /// - `RetriesExhausted` once every attempt has failed
    /// - `Cancelled` if `cancel` fires before an attempt or during a backoff
    pub fn send(
        &self,
        request: &HttpRequest,
        expected_status: u16,
        cancel: &CancelHandle,
    ) -> SyncResult<HttpResponse> {
        if request.method != Method::GET && request.method != Method::PATCH {
            return Err(SyncError::UnsupportedMethod(request.method.to_string()));
        }

        let max_attempts = self.retry.max_attempts();
        let mut attempts = 0u32;

        loop {
            cancel.check()?;
            attempts += 1;
            debug!(method = %request.method, url = %request.url, attempts, "sending request to api");

            let last_error = match self.client.execute(request) {
                Ok(response) if response.status == expected_status => return Ok(response),
                Ok(response) => {
                    warn!(
                        status = response.status,
                        expected = expected_status,
                        body = %response.text(),
                        "unexpected api response"
                    );
                    format!("status {}", response.status)
                }
                Err(message) => {
                    warn!(error = %message, url = %request.url, "api request failed");
                    message
                }
            };

            if attempts >= max_attempts {
                return Err(SyncError::RetriesExhausted {
                    method: request.method.to_string(),
                    url: request.url.clone(),
                    attempts,
                    last_error,
                });
            }

            let backoff = self.retry.backoff_for_retry(attempts - 1);
            warn!(
                last_error = %last_error,
                expected = expected_status,
                backoff_secs = backoff.as_secs_f64(),
                retries_left = max_attempts - attempts,
                "retrying api request"
            );
            self.sleeper.sleep(backoff, cancel)?;
            self.retries.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockHttpClient;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
        cancel_after: Option<usize>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration, cancel: &CancelHandle) -> SyncResult<()> {
            let mut slept = self.slept.lock();
            slept.push(duration);
            if self.cancel_after == Some(slept.len()) {
                cancel.cancel();
            }
            cancel.check()
        }
    }

    fn transport(
        client: MockHttpClient,
        retry: RetryConfig,
    ) -> (HttpTransport<MockHttpClient>, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let transport = HttpTransport::new(client, retry).with_sleeper(sleeper.clone());
        (transport, sleeper)
    }

    fn send_get(transport: &HttpTransport<MockHttpClient>) -> SyncResult<HttpResponse> {
        transport.send(&HttpRequest::get("https://x/"), 200, &CancelHandle::new())
    }

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    #[test]
    fn first_attempt_success() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(200, "[]"));
        let (transport, sleeper) = transport(client, RetryConfig::default());

        let response = send_get(&transport).unwrap();
        assert_eq!(response.text(), "[]");
        assert_eq!(transport.retries(), 0);
        assert!(sleeper.slept.lock().is_empty());
    }

    #[test]
    fn retries_with_doubling_backoff() {
        let client = MockHttpClient::new();
        for _ in 0..3 {
            client.push_response(HttpResponse::new(503, "unavailable"));
        }
        client.push_response(HttpResponse::new(200, "[]"));
        let (transport, sleeper) = transport(client, RetryConfig::default());

        let response = send_get(&transport).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.retries(), 3);
        assert_eq!(*sleeper.slept.lock(), secs(&[2, 4, 8]));
        assert_eq!(transport.client().request_count(), 4);
    }

    #[test]
    fn exhausted_retries_are_terminal() {
        let client = MockHttpClient::new();
        for _ in 0..7 {
            client.push_response(HttpResponse::new(500, "oops"));
        }
        let (transport, sleeper) = transport(client, RetryConfig::default());

        let err = send_get(&transport).unwrap_err();
        match err {
            SyncError::RetriesExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 6);
                assert_eq!(last_error, "status 500");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.retries(), 5);
        assert_eq!(*sleeper.slept.lock(), secs(&[2, 4, 8, 16, 32]));
        assert_eq!(transport.client().request_count(), 6);
    }

    #[test]
    fn rate_limit_uses_same_schedule() {
        let client = MockHttpClient::new();
        client.push_response(
            HttpResponse::new(429, r#"{"detail":"Request was throttled."}"#)
                .with_header("Retry-After", "60"),
        );
        client.push_response(HttpResponse::new(200, "[]"));
        let (transport, sleeper) = transport(client, RetryConfig::default());

        send_get(&transport).unwrap();
        assert_eq!(*sleeper.slept.lock(), secs(&[2]));
    }

    #[test]
    fn client_errors_are_retried() {
        let client = MockHttpClient::new();
        client.push_error("connection refused");
        client.push_response(HttpResponse::new(200, "[]"));
        let (transport, _) = transport(client, RetryConfig::default());

        assert!(send_get(&transport).is_ok());
        assert_eq!(transport.retries(), 1);
    }

    #[test]
    fn custom_expected_status() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(200, ""));
        client.push_response(HttpResponse::new(204, ""));
        let (transport, _) = transport(client, RetryConfig::default());

        let response = transport.send(&HttpRequest::patch("https://x/"), 204, &CancelHandle::new()).unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(transport.retries(), 1);
    }

    #[test]
    fn no_retry_fails_after_one_attempt() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(400, "bad"));
        let (transport, sleeper) = transport(client, RetryConfig::no_retry());

        let err = send_get(&transport).unwrap_err();
        assert!(matches!(err, SyncError::RetriesExhausted { attempts: 1, .. }));
        assert!(sleeper.slept.lock().is_empty());
    }

    #[test]
    fn unsupported_method_is_not_sent() {
        let (transport, sleeper) = transport(MockHttpClient::new(), RetryConfig::default());

        let request = HttpRequest::new(Method::POST, "https://x/");
        let err = transport.send(&request, 200, &CancelHandle::new()).unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedMethod(ref m) if m == "POST"));
        assert_eq!(transport.client().request_count(), 0);
        assert!(sleeper.slept.lock().is_empty());
    }

    #[test]
    fn cancel_during_backoff() {
        let client = MockHttpClient::new();
        for _ in 0..6 {
            client.push_response(HttpResponse::new(502, "bad gateway"));
        }
        let sleeper = Arc::new(RecordingSleeper {
            slept: Mutex::new(Vec::new()),
            cancel_after: Some(2),
        });
        let transport =
            HttpTransport::new(client, RetryConfig::default()).with_sleeper(sleeper.clone());

        let err = send_get(&transport).unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(transport.client().request_count(), 2);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let (transport, _) = transport(MockHttpClient::new(), RetryConfig::default());
        let cancel = CancelHandle::new();
        cancel.cancel();

        let err = transport.send(&HttpRequest::get("https://x/"), 200, &cancel).unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(transport.client().request_count(), 0);
    }

    #[test]
    fn cancel_is_per_call() {
        let client = MockHttpClient::new();
        client.push_response(HttpResponse::new(200, "[]"));
        let (transport, _) = transport(client, RetryConfig::default());

        let cancelled = CancelHandle::new();
        cancelled.cancel();
        assert!(transport.send(&HttpRequest::get("https://x/"), 200, &cancelled).is_err());
        assert!(send_get(&transport).is_ok());
        assert!(cancelled.is_cancelled());
    }

    #[test]
    fn thread_sleeper_observes_cancel() {
        let sleeper = ThreadSleeper::new(Duration::from_millis(1));
        let cancel = CancelHandle::new();
        assert!(sleeper.sleep(Duration::from_millis(2), &cancel).is_ok());

        cancel.cancel();
        let start = Instant::now();
        let result = sleeper.sleep(Duration::from_secs(10), &cancel);
        assert!(matches!(result, Err(SyncError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
