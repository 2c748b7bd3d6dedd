//! File-backed account snapshot.
//!
//! Reads a JSON [`AccountSnapshot`] from disk on every fetch, so an external
//! process can refresh the file between evaluations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{AccountSnapshot, AccountSnapshotPort, SnapshotError};

/// Account snapshot read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileAccountSnapshot {
    path: PathBuf,
}

impl FileAccountSnapshot {
    /// Create a provider for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountSnapshotPort for FileAccountSnapshot {
    async fn fetch_snapshot(&self) -> Result<AccountSnapshot, SnapshotError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            SnapshotError::Unavailable(format!("read {}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            SnapshotError::Malformed(format!("{}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SNAPSHOT: &str = r#"{
        "account": {
            "net_liquidation": "100000",
            "total_cash": "40000",
            "buying_power": "40000",
            "margin_used": "0",
            "margin_enabled": false
        },
        "positions": [
            {
                "symbol": "AAPL",
                "quantity": "100",
                "market_value": "15000",
                "average_cost": "140",
                "unrealized_pnl": "1000",
                "sector": "Technology"
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_reads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("account.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let snapshot = FileAccountSnapshot::new(&path).fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.account.total_cash, dec!(40000));
        assert_eq!(snapshot.positions.len(), 1);
        assert_eq!(snapshot.positions[0].sector.as_deref(), Some("Technology"));
    }

    #[tokio::test]
    async fn test_rereads_on_every_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("account.json");
        std::fs::write(&path, SNAPSHOT).unwrap();
        let provider = FileAccountSnapshot::new(&path);
        assert_eq!(provider.fetch_snapshot().await.unwrap().positions.len(), 1);

        std::fs::write(&path, SNAPSHOT.replace("\"40000\"", "\"39000\"")).unwrap();
        let snapshot = provider.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.account.total_cash, dec!(39000));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileAccountSnapshot::new(dir.path().join("missing.json"))
            .fetch_snapshot()
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_bad_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("account.json");
        std::fs::write(&path, "{\"account\": 3}").unwrap();

        let err = FileAccountSnapshot::new(&path).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed(_)));
    }
}
