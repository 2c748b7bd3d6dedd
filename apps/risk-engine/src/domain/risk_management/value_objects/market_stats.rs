//! Externally supplied market statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trailing statistics for one symbol, consumed only by advisory rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Trailing realized volatility, annualized percent (e.g., 35 = 35%).
    pub volatility: Decimal,
    /// Average daily volume in shares.
    pub avg_volume: Decimal,
}

impl MarketStats {
    /// Create market statistics.
    #[must_use]
    pub const fn new(volatility: Decimal, avg_volume: Decimal) -> Self {
        Self {
            volatility,
            avg_volume,
        }
    }
}
