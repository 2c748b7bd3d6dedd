//! Application Ports (Driven)
//!
//! Ports define the interfaces the evaluation use case needs from the outside
//! world: the account snapshot source, market statistics, and the audit sink.

mod account_snapshot_port;
mod audit_recorder_port;
mod market_stats_port;

pub use account_snapshot_port::{AccountSnapshot, AccountSnapshotPort, SnapshotError};
pub use audit_recorder_port::{AuditError, AuditRecord, AuditRecorderPort};
pub use market_stats_port::{MarketStatsError, MarketStatsPort};

#[cfg(test)]
pub use account_snapshot_port::MockAccountSnapshotPort;
#[cfg(test)]
pub use audit_recorder_port::MockAuditRecorderPort;
#[cfg(test)]
pub use market_stats_port::MockMarketStatsPort;
