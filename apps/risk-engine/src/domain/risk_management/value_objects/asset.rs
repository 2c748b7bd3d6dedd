//! Asset class and option contract value objects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shares controlled by one listed option contract.
pub const CONTRACT_MULTIPLIER: Decimal = dec!(100);

/// Asset class of a position or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    /// Common stock or ETF.
    #[default]
    Equity,
    /// Listed option contract.
    Option,
}

impl AssetClass {
    /// Units of underlying exposure per unit of quantity.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::Equity => Decimal::ONE,
            Self::Option => CONTRACT_MULTIPLIER,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity => write!(f, "EQUITY"),
            Self::Option => write!(f, "OPTION"),
        }
    }
}

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Right to buy the underlying.
    Call,
    /// Right to sell the underlying.
    Put,
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Option contract terms shared by positions and order intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol (e.g., "AAPL").
    pub underlying: String,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub right: OptionRight,
    /// Delta, when the snapshot provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Decimal>,
}

impl OptionContract {
    /// Create contract terms without a delta.
    #[must_use]
    pub fn new(
        underlying: impl Into<String>,
        strike: Decimal,
        expiration: NaiveDate,
        right: OptionRight,
    ) -> Self {
        Self {
            underlying: underlying.into(),
            strike,
            expiration,
            right,
            delta: None,
        }
    }

    /// Attach a delta.
    #[must_use]
    pub const fn with_delta(mut self, delta: Decimal) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Same listed contract (underlying, strike, expiration and right).
    #[must_use]
    pub fn same_contract(&self, other: &Self) -> bool {
        self.underlying == other.underlying
            && self.strike == other.strike
            && self.expiration == other.expiration
            && self.right == other.right
    }
}
