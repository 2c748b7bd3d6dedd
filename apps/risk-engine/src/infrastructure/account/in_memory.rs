//! In-memory account snapshot for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{AccountSnapshot, AccountSnapshotPort, SnapshotError};

/// In-memory implementation of `AccountSnapshotPort`.
#[derive(Debug, Default)]
pub struct InMemoryAccountSnapshot {
    snapshot: RwLock<Option<AccountSnapshot>>,
    failures_remaining: AtomicU32,
    fetches: AtomicU32,
}

impl InMemoryAccountSnapshot {
    /// Create a provider serving `snapshot`.
    #[must_use]
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Replace the served snapshot.
    pub fn set(&self, snapshot: AccountSnapshot) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    /// Make the next `count` fetches fail as unavailable.
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of fetch calls so far.
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountSnapshotPort for InMemoryAccountSnapshot {
    async fn fetch_snapshot(&self) -> Result<AccountSnapshot, SnapshotError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SnapshotError::Unavailable("injected failure".to_string()));
        }
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| SnapshotError::Unavailable("no snapshot loaded".to_string()))
    }
}
