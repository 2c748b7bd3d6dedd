//! Configuration for the account snapshot, market stats, and audit adapters.

use serde::{Deserialize, Serialize};

use super::retry::RetrySettings;

/// Account snapshot source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// JSON file holding the current account snapshot.
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    /// Retry settings for fetching the snapshot.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            retry: RetrySettings::default(),
        }
    }
}

/// Market stats source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketStatsConfig {
    /// JSON file mapping symbol to stats. Absent means no stats.
    #[serde(default)]
    pub path: Option<String>,
    /// Timeout for one lookup.
    #[serde(default = "default_market_stats_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for MarketStatsConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_ms: default_market_stats_timeout_ms(),
        }
    }
}

/// Audit sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// JSON Lines file receiving one record per evaluation.
    #[serde(default = "default_audit_path")]
    pub path: String,
    /// Retry settings for audit writes.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_audit_path(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/account_snapshot.json".to_string()
}

const fn default_market_stats_timeout_ms() -> u64 {
    500
}

fn default_audit_path() -> String {
    "data/audit.jsonl".to_string()
}
