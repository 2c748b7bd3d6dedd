//! Market Stats Adapters
//!
//! Implementations of `MarketStatsPort`.

pub mod file;
pub mod in_memory;

pub use file::FileMarketStats;
pub use in_memory::InMemoryMarketStats;
