//! Account snapshot value objects.
//!
//! Both types are read-only inputs refreshed on every evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::{AssetClass, OptionContract};

/// Account-level balances at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Total account equity (cash + market value of positions).
    pub net_liquidation: Decimal,
    /// Settled and unsettled cash.
    pub total_cash: Decimal,
    /// Broker-reported buying power.
    pub buying_power: Decimal,
    /// Margin currently borrowed.
    pub margin_used: Decimal,
    /// Whether the account is approved for margin.
    pub margin_enabled: bool,
    /// Losses realized on recently closed trades.
    #[serde(default)]
    pub recent_realized_loss: Decimal,
}

impl AccountState {
    /// Cash-only account with no margin in use.
    #[must_use]
    pub const fn cash_account(net_liquidation: Decimal, total_cash: Decimal) -> Self {
        Self {
            net_liquidation,
            total_cash,
            buying_power: total_cash,
            margin_used: Decimal::ZERO,
            margin_enabled: false,
            recent_realized_loss: Decimal::ZERO,
        }
    }
}

/// A held position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker (OCC symbol for options).
    pub symbol: String,
    /// Asset class.
    #[serde(default)]
    pub asset_class: AssetClass,
    /// Signed quantity (negative = short).
    pub quantity: Decimal,
    /// Current market value as reported by the broker.
    pub market_value: Decimal,
    /// Average cost per unit.
    pub average_cost: Decimal,
    /// Unrealized P&L.
    pub unrealized_pnl: Decimal,
    /// Realized P&L on this symbol.
    #[serde(default)]
    pub realized_pnl: Decimal,
    /// Sector tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Contract terms for options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<OptionContract>,
}

impl Position {
    /// Create an equity position. Average cost is derived from value and P&L.
    #[must_use]
    pub fn equity(
        symbol: impl Into<String>,
        quantity: Decimal,
        market_value: Decimal,
        unrealized_pnl: Decimal,
    ) -> Self {
        let average_cost = if quantity.is_zero() {
            Decimal::ZERO
        } else {
            ((market_value - unrealized_pnl) / quantity).abs()
        };
        Self {
            symbol: symbol.into(),
            asset_class: AssetClass::Equity,
            quantity,
            market_value,
            average_cost,
            unrealized_pnl,
            realized_pnl: Decimal::ZERO,
            sector: None,
            option: None,
        }
    }

    /// Create an option position.
    #[must_use]
    pub fn option(
        symbol: impl Into<String>,
        contract: OptionContract,
        quantity: Decimal,
        market_value: Decimal,
    ) -> Self {
        let average_cost = if quantity.is_zero() {
            Decimal::ZERO
        } else {
            (market_value / (quantity * AssetClass::Option.multiplier())).abs()
        };
        Self {
            symbol: symbol.into(),
            asset_class: AssetClass::Option,
            quantity,
            market_value,
            average_cost,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            sector: None,
            option: Some(contract),
        }
    }

    /// Attach a sector tag.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set realized P&L.
    #[must_use]
    pub const fn with_realized_pnl(mut self, realized_pnl: Decimal) -> Self {
        self.realized_pnl = realized_pnl;
        self
    }

    /// Units of underlying per unit of quantity.
    #[must_use]
    pub const fn multiplier(&self) -> Decimal {
        self.asset_class.multiplier()
    }

    /// Market value signed by direction (short positions are negative).
    #[must_use]
    pub fn signed_value(&self) -> Decimal {
        if self.quantity.is_sign_negative() {
            -self.market_value.abs()
        } else {
            self.market_value.abs()
        }
    }

    /// Absolute market value.
    #[must_use]
    pub fn gross_value(&self) -> Decimal {
        self.market_value.abs()
    }

    /// Cost basis implied by market value and unrealized P&L.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        (self.market_value - self.unrealized_pnl).abs()
    }

    /// Mark price per unit, if the position is non-empty.
    #[must_use]
    pub fn mark_price(&self) -> Option<Decimal> {
        let units = self.quantity.abs().checked_mul(self.multiplier())?;
        if units.is_zero() {
            return None;
        }
        self.market_value.abs().checked_div(units)
    }

    /// True for a long position.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}
