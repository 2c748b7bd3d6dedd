//! File-backed market stats.
//!
//! Reads a JSON object mapping symbol to `{volatility, avg_volume}` on every
//! lookup. Symbols are matched case-insensitively.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::{MarketStatsError, MarketStatsPort};
use crate::domain::risk_management::MarketStats;

/// Market stats read from a JSON file, or none when unconfigured.
#[derive(Debug, Clone, Default)]
pub struct FileMarketStats {
    path: Option<PathBuf>,
}

impl FileMarketStats {
    /// Create a provider for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A provider that never has stats.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl MarketStatsPort for FileMarketStats {
    async fn fetch_stats(&self, symbol: &str) -> Result<Option<MarketStats>, MarketStatsError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            MarketStatsError::Unavailable(format!("read {}: {e}", path.display()))
        })?;
        let table: HashMap<String, MarketStats> = serde_json::from_slice(&bytes)
            .map_err(|e| MarketStatsError::Malformed(format!("{}: {e}", path.display())))?;

        Ok(table
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(symbol))
            .map(|(_, stats)| stats))
    }
}
