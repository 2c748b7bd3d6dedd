//! Market Stats Port (Driven Port)
//!
//! Optional per-symbol statistics for the advisory rules. Absence and failure
//! both degrade to "no stats"; neither fails an evaluation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::risk_management::MarketStats;

/// Market stats provider errors.
#[derive(Debug, Clone, Error)]
pub enum MarketStatsError {
    /// The provider could not be reached.
    #[error("Market stats unavailable: {0}")]
    Unavailable(String),

    /// The provider returned undecodable data.
    #[error("Malformed market stats: {0}")]
    Malformed(String),
}

/// Port for per-symbol market statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketStatsPort: Send + Sync {
    /// Stats for `symbol`, or `None` when the provider has none.
    async fn fetch_stats(&self, symbol: &str) -> Result<Option<MarketStats>, MarketStatsError>;
}
