//! Cancellation of in-flight sync operations.

use crate::error::{SyncError, SyncResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag to abort one populate or apply from another thread.
///
/// A handle is passed to a single call. The transport checks it before
/// every attempt and while sleeping through a backoff; the pagination
/// reader checks it before every page. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates a new, non-cancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with `SyncError::Cancelled` if cancellation was requested.
    pub fn check(&self) -> SyncResult<()> {
        if self.is_cancelled() {
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = CancelHandle::new();
        let other = handle.clone();
        assert!(handle.check().is_ok());

        other.cancel();
        assert!(handle.is_cancelled());
        assert!(matches!(handle.check(), Err(SyncError::Cancelled)));

        assert!(!CancelHandle::new().is_cancelled());
    }
}
