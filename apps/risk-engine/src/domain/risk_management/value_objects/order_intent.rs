//! Order intent value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::asset::{AssetClass, OptionContract};
use crate::domain::risk_management::errors::RiskError;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

impl OrderSide {
    /// +1 for buys, -1 for sells.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Buy => Decimal::ONE,
            Self::Sell => Decimal::NEGATIVE_ONE,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Market order.
    #[default]
    Market,
    /// Limit order.
    Limit,
    /// Stop order.
    Stop,
    /// Stop-limit order.
    StopLimit,
}

impl OrderKind {
    /// Whether a limit price must be supplied.
    #[must_use]
    pub const fn requires_limit_price(self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    /// Whether a stop price must be supplied.
    #[must_use]
    pub const fn requires_stop_price(self) -> bool {
        matches!(self, Self::Stop | Self::StopLimit)
    }
}

/// A proposed order awaiting a risk verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Ticker (OCC symbol for options).
    pub symbol: String,
    /// Side.
    pub side: OrderSide,
    /// Quantity in shares or contracts (always positive).
    pub quantity: Decimal,
    /// Order kind.
    #[serde(default)]
    pub kind: OrderKind,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Stop trigger price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Asset class.
    #[serde(default)]
    pub asset_class: AssetClass,
    /// Contract terms, required for options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<OptionContract>,
    /// Protective stop-loss price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<Decimal>,
    /// Take-profit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    /// Last or expected price used to value market orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<Decimal>,
    /// Sector tag for a symbol not yet held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Human-supplied reason for the trade.
    pub justification: String,
}

impl OrderIntent {
    /// Market order for equity shares.
    #[must_use]
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Market,
            limit_price: None,
            stop_price: None,
            asset_class: AssetClass::Equity,
            option: None,
            stop_loss_price: None,
            take_profit_price: None,
            reference_price: None,
            sector: None,
            justification: justification.into(),
        }
    }

    /// Limit order for equity shares.
    #[must_use]
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        limit_price: Decimal,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            kind: OrderKind::Limit,
            limit_price: Some(limit_price),
            ..Self::market(symbol, side, quantity, justification)
        }
    }

    /// Turn this order into an option order.
    #[must_use]
    pub fn with_option(mut self, contract: OptionContract) -> Self {
        self.asset_class = AssetClass::Option;
        self.option = Some(contract);
        self
    }

    /// Attach a stop-loss.
    #[must_use]
    pub const fn with_stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss_price = Some(price);
        self
    }

    /// Attach a take-profit.
    #[must_use]
    pub const fn with_take_profit(mut self, price: Decimal) -> Self {
        self.take_profit_price = Some(price);
        self
    }

    /// Attach a reference price.
    #[must_use]
    pub const fn with_reference_price(mut self, price: Decimal) -> Self {
        self.reference_price = Some(price);
        self
    }

    /// Attach a sector tag.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::InvalidOrder` naming the first offending field.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.symbol.trim().is_empty() {
            return Err(RiskError::invalid_order("symbol", "must not be empty"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(RiskError::invalid_order(
                "quantity",
                format!("must be positive, got {}", self.quantity),
            ));
        }
        if self.justification.trim().is_empty() {
            return Err(RiskError::invalid_order(
                "justification",
                "must not be empty",
            ));
        }

        if self.kind.requires_limit_price() && self.limit_price.is_none() {
            return Err(RiskError::invalid_order(
                "limit_price",
                format!("required for {:?} orders", self.kind),
            ));
        }
        if self.kind.requires_stop_price() && self.stop_price.is_none() {
            return Err(RiskError::invalid_order(
                "stop_price",
                format!("required for {:?} orders", self.kind),
            ));
        }

        let prices = [
            ("limit_price", self.limit_price),
            ("stop_price", self.stop_price),
            ("stop_loss_price", self.stop_loss_price),
            ("take_profit_price", self.take_profit_price),
            ("reference_price", self.reference_price),
        ];
        for (field, price) in prices {
            if let Some(price) = price.filter(|p| *p <= Decimal::ZERO) {
                return Err(RiskError::invalid_order(
                    field,
                    format!("must be positive, got {price}"),
                ));
            }
        }

        if self.asset_class == AssetClass::Option {
            let Some(contract) = &self.option else {
                return Err(RiskError::invalid_order(
                    "option",
                    "contract terms required for OPTION orders",
                ));
            };
            if contract.underlying.trim().is_empty() {
                return Err(RiskError::invalid_order(
                    "option.underlying",
                    "must not be empty",
                ));
            }
            if contract.strike <= Decimal::ZERO {
                return Err(RiskError::invalid_order(
                    "option.strike",
                    format!("must be positive, got {}", contract.strike),
                ));
            }
            if !self.quantity.fract().is_zero() {
                return Err(RiskError::invalid_order(
                    "quantity",
                    "option quantity must be whole contracts",
                ));
            }
        }

        Ok(())
    }

    /// Price used to value the order, in order of preference: limit, stop, reference.
    #[must_use]
    pub fn explicit_price(&self) -> Option<Decimal> {
        self.limit_price.or(self.stop_price).or(self.reference_price)
    }

    /// Whether this is a buy of equity shares.
    #[must_use]
    pub fn is_equity_buy(&self) -> bool {
        self.side == OrderSide::Buy && self.asset_class == AssetClass::Equity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    use crate::domain::risk_management::value_objects::asset::OptionRight;

    fn valid() -> OrderIntent {
        OrderIntent::limit("AAPL", OrderSide::Buy, dec!(100), dec!(150), "breakout")
            .with_stop_loss(dec!(145))
    }

    fn field_of(order: &OrderIntent) -> String {
        match order.validate() {
            Err(RiskError::InvalidOrder { field, .. }) => field,
            other => panic!("expected InvalidOrder, got {other:?}"),
        }
    }

    #[test]
    fn valid_order_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test_case(Decimal::ZERO ; "zero")]
    #[test_case(dec!(-5) ; "negative")]
    fn non_positive_quantity_rejected(quantity: Decimal) {
        let order = OrderIntent { quantity, ..valid() };
        assert_eq!(field_of(&order), "quantity");
    }

    #[test_case("" ; "empty")]
    #[test_case("   \t" ; "whitespace")]
    fn blank_justification_rejected(justification: &str) {
        let order = OrderIntent {
            justification: justification.to_string(),
            ..valid()
        };
        assert_eq!(field_of(&order), "justification");
    }

    #[test]
    fn blank_symbol_rejected() {
        let order = OrderIntent {
            symbol: " ".to_string(),
            ..valid()
        };
        assert_eq!(field_of(&order), "symbol");
    }

    #[test]
    fn limit_order_without_price_rejected() {
        let order = OrderIntent {
            limit_price: None,
            ..valid()
        };
        assert_eq!(field_of(&order), "limit_price");
    }

    #[test]
    fn stop_limit_requires_stop_price() {
        let order = OrderIntent {
            kind: OrderKind::StopLimit,
            ..valid()
        };
        assert_eq!(field_of(&order), "stop_price");
    }

    #[test]
    fn non_positive_stop_loss_rejected() {
        let order = valid().with_stop_loss(Decimal::ZERO);
        assert_eq!(field_of(&order), "stop_loss_price");
    }

    #[test]
    fn option_without_contract_rejected() {
        let order = OrderIntent {
            asset_class: AssetClass::Option,
            ..valid()
        };
        assert_eq!(field_of(&order), "option");
    }

    #[test]
    fn fractional_contracts_rejected() {
        let contract = OptionContract::new(
            "AAPL",
            dec!(150),
            NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
            OptionRight::Call,
        );
        let order = OrderIntent::limit("AAPL261218C00150000", OrderSide::Sell, dec!(1.5), dec!(3), "income")
            .with_option(contract);
        assert_eq!(field_of(&order), "quantity");
    }

    #[test]
    fn explicit_price_prefers_limit_then_stop_then_reference() {
        let mut order = OrderIntent::market("AAPL", OrderSide::Buy, dec!(1), "test")
            .with_reference_price(dec!(10));
        assert_eq!(order.explicit_price(), Some(dec!(10)));
        order.stop_price = Some(dec!(11));
        assert_eq!(order.explicit_price(), Some(dec!(11)));
        order.limit_price = Some(dec!(12));
        assert_eq!(order.explicit_price(), Some(dec!(12)));
    }

    #[test]
    fn side_sign_and_opposite() {
        assert_eq!(OrderSide::Buy.sign(), Decimal::ONE);
        assert_eq!(OrderSide::Sell.sign(), Decimal::NEGATIVE_ONE);
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
    }

    #[test]
    fn deserializes_minimal_json() {
        let json = r#"{
            "symbol": "MSFT",
            "side": "BUY",
            "quantity": "10",
            "reference_price": "400",
            "justification": "earnings drift"
        }"#;
        let order: OrderIntent = serde_json::from_str(json).unwrap();
        assert_eq!(order.kind, OrderKind::Market);
        assert_eq!(order.asset_class, AssetClass::Equity);
        assert!(order.validate().is_ok());
    }
}
