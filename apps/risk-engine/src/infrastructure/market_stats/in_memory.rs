//! In-memory market stats for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{MarketStatsError, MarketStatsPort};
use crate::domain::risk_management::MarketStats;

/// In-memory implementation of `MarketStatsPort`.
#[derive(Debug, Default)]
pub struct InMemoryMarketStats {
    stats: RwLock<HashMap<String, MarketStats>>,
    unavailable: AtomicBool,
}

impl InMemoryMarketStats {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set stats for a symbol.
    pub fn set(&self, symbol: &str, stats: MarketStats) {
        self.stats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.to_ascii_uppercase(), stats);
    }

    /// Fail every lookup until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketStatsPort for InMemoryMarketStats {
    async fn fetch_stats(&self, symbol: &str) -> Result<Option<MarketStats>, MarketStatsError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MarketStatsError::Unavailable("injected failure".to_string()));
        }
        Ok(self
            .stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&symbol.to_ascii_uppercase())
            .copied())
    }
}
