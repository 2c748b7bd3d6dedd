//! Audit Recorder Port (Driven Port)
//!
//! Durable sink for every verdict the engine produces. A verdict that cannot
//! be recorded is never returned to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::risk_management::{OrderIntent, Verdict};

/// One audited evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique per evaluation; lets a sink drop duplicate writes from retries.
    pub evaluation_id: String,
    /// When the verdict was produced.
    pub recorded_at: DateTime<Utc>,
    /// The evaluated order.
    pub order: OrderIntent,
    /// The verdict.
    pub verdict: Verdict,
    /// Free-text rationale carried by the order.
    pub justification: String,
}

impl AuditRecord {
    /// Build a record for an evaluated order.
    #[must_use]
    pub fn new(
        evaluation_id: impl Into<String>,
        recorded_at: DateTime<Utc>,
        order: OrderIntent,
        verdict: Verdict,
    ) -> Self {
        let justification = order.justification.clone();
        Self {
            evaluation_id: evaluation_id.into(),
            recorded_at,
            order,
            verdict,
            justification,
        }
    }
}

/// Audit sink errors.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// The sink rejected or failed the write.
    #[error("Audit write failed: {0}")]
    WriteFailed(String),

    /// The record could not be serialized.
    #[error("Audit serialization failed: {0}")]
    Serialization(String),
}

impl AuditError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteFailed(_))
    }
}

/// Port for recording audit entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRecorderPort: Send + Sync {
    /// Durably record one evaluation.
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
