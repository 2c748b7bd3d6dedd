//! Account Snapshot Port (Driven Port)
//!
//! Source of the account state and open positions an order is evaluated
//! against. Fetched once per evaluation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::risk_management::{AccountState, Position};

/// Point-in-time account state plus open positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account balances.
    pub account: AccountState,
    /// Open positions.
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl AccountSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(account: AccountState, positions: Vec<Position>) -> Self {
        Self { account, positions }
    }
}

/// Snapshot provider errors.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// The provider could not be reached or did not answer.
    #[error("Snapshot provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with data that cannot be decoded.
    #[error("Malformed snapshot: {0}")]
    Malformed(String),
}

impl SnapshotError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Port for fetching account snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountSnapshotPort: Send + Sync {
    /// Fetch the current account state and positions.
    async fn fetch_snapshot(&self) -> Result<AccountSnapshot, SnapshotError>;
}
