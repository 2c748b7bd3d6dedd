//! In-memory audit recorder for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{AuditError, AuditRecord, AuditRecorderPort};

/// In-memory implementation of `AuditRecorderPort` with failure injection.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryAuditRecorder {
    records: RwLock<Vec<AuditRecord>>,
    failures_remaining: AtomicU32,
    unavailable: AtomicBool,
}

impl InMemoryAuditRecorder {
    /// Create a new empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` writes.
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Fail every write until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Recorded entries, in write order.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> bool {
        if self.unavailable.load(Ordering::SeqCst) {
            return true;
        }
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl AuditRecorderPort for InMemoryAuditRecorder {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        if self.take_failure() {
            return Err(AuditError::WriteFailed("injected failure".to_string()));
        }
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if !records
            .iter()
            .any(|r| r.evaluation_id == record.evaluation_id)
        {
            records.push(record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::{OrderIntent, OrderSide, Verdict};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(id: &str) -> AuditRecord {
        AuditRecord::new(
            id,
            Utc::now(),
            OrderIntent::market("SPY", OrderSide::Sell, dec!(1), "trim"),
            Verdict::from_findings(Vec::new(), Vec::new()),
        )
    }

    #[tokio::test]
    async fn test_fail_next_then_recover() {
        let recorder = InMemoryAuditRecorder::new();
        recorder.fail_next(2);

        assert!(recorder.record(&record("a")).await.is_err());
        assert!(recorder.record(&record("a")).await.is_err());
        assert!(recorder.record(&record("a")).await.is_ok());
        assert_eq!(recorder.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_until_reset() {
        let recorder = InMemoryAuditRecorder::new();
        recorder.set_unavailable(true);
        assert!(recorder.record(&record("a")).await.is_err());
        recorder.set_unavailable(false);
        assert!(recorder.record(&record("a")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicates_dropped() {
        let recorder = InMemoryAuditRecorder::new();
        recorder.record(&record("a")).await.unwrap();
        recorder.record(&record("a")).await.unwrap();
        recorder.record(&record("b")).await.unwrap();
        assert_eq!(recorder.len(), 2);
    }
}
