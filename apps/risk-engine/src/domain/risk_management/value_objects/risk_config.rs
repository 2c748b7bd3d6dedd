//! Risk configuration value object.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::risk_management::errors::RiskError;

/// Which losses count toward a symbol's drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawdownBasis {
    /// Unrealized loss over cost basis.
    #[default]
    Unrealized,
    /// Unrealized plus realized loss on the symbol, over cost basis.
    UnrealizedAndRealized,
}

/// Process-wide risk limits. Built once at startup and never mutated.
///
/// All percentages are expressed out of 100 (20 = 20%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Maximum single-symbol exposure as % of net liquidation.
    pub max_single_position_pct: Decimal,
    /// Maximum total gross exposure as % of net liquidation.
    pub max_total_position_pct: Decimal,
    /// Drawdown at which adding to a position is blocked.
    pub max_drawdown_pct: Decimal,
    /// Maximum aggregate option market value as % of net liquidation.
    pub max_option_exposure_pct: Decimal,
    /// Whether orders may borrow on margin.
    pub allow_margin: bool,
    /// Whether equity buys must carry a stop-loss.
    pub require_stop_loss: bool,
    /// Share of bond value that counts as put collateral.
    pub bond_collateral_pct: Decimal,
    /// Sector concentration warning threshold.
    pub warn_sector_concentration_pct: Decimal,
    /// Annualized volatility warning threshold, in percent.
    pub warn_volatility_threshold: Decimal,
    /// Average daily volume below which liquidity is flagged.
    pub warn_volume_floor: Decimal,
    /// Symbols whose holdings count as bond collateral.
    pub collateral_bond_symbols: Vec<String>,
    /// Drawdown computation basis.
    pub drawdown_basis: DrawdownBasis,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_single_position_pct: dec!(20),
            max_total_position_pct: dec!(85),
            max_drawdown_pct: dec!(10),
            max_option_exposure_pct: dec!(10),
            allow_margin: false,
            require_stop_loss: true,
            bond_collateral_pct: dec!(95),
            warn_sector_concentration_pct: dec!(30),
            warn_volatility_threshold: dec!(50),
            warn_volume_floor: dec!(100000),
            collateral_bond_symbols: vec!["SGOV".to_string(), "BIL".to_string(), "SHV".to_string()],
            drawdown_basis: DrawdownBasis::Unrealized,
        }
    }
}

impl RiskConfig {
    /// Validate ranges, returning the config on success.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Configuration` naming the first out-of-range field.
    pub fn validated(self) -> Result<Self, RiskError> {
        self.validate()?;
        Ok(self)
    }

    /// Validate ranges.
    ///
    /// # Errors
    ///
    /// Returns `RiskError::Configuration` naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), RiskError> {
        let hundred = dec!(100);
        let total_cap = if self.allow_margin { dec!(400) } else { hundred };

        let bounded = [
            ("max_single_position_pct", self.max_single_position_pct, hundred),
            ("max_total_position_pct", self.max_total_position_pct, total_cap),
            ("max_drawdown_pct", self.max_drawdown_pct, hundred),
            ("max_option_exposure_pct", self.max_option_exposure_pct, hundred),
            (
                "warn_sector_concentration_pct",
                self.warn_sector_concentration_pct,
                hundred,
            ),
        ];
        for (field, value, cap) in bounded {
            if value <= Decimal::ZERO || value > cap {
                return Err(RiskError::configuration(
                    field,
                    format!("must be in (0, {cap}], got {value}"),
                ));
            }
        }

        if self.bond_collateral_pct < Decimal::ZERO || self.bond_collateral_pct > hundred {
            return Err(RiskError::configuration(
                "bond_collateral_pct",
                format!("must be in [0, 100], got {}", self.bond_collateral_pct),
            ));
        }
        if self.warn_volatility_threshold <= Decimal::ZERO {
            return Err(RiskError::configuration(
                "warn_volatility_threshold",
                format!("must be positive, got {}", self.warn_volatility_threshold),
            ));
        }
        if self.warn_volume_floor < Decimal::ZERO {
            return Err(RiskError::configuration(
                "warn_volume_floor",
                format!("must be non-negative, got {}", self.warn_volume_floor),
            ));
        }
        if self
            .collateral_bond_symbols
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(RiskError::configuration(
                "collateral_bond_symbols",
                "symbols must not be empty",
            ));
        }

        Ok(())
    }

    /// Whether a symbol counts as bond collateral.
    #[must_use]
    pub fn is_collateral_bond(&self, symbol: &str) -> bool {
        self.collateral_bond_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn field_of(config: &RiskConfig) -> String {
        match config.validate() {
            Err(RiskError::Configuration { field, .. }) => field,
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = RiskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_single_position_pct, dec!(20));
        assert_eq!(config.max_total_position_pct, dec!(85));
        assert!(!config.allow_margin);
        assert!(config.require_stop_loss);
        assert_eq!(config.drawdown_basis, DrawdownBasis::Unrealized);
    }

    #[test_case(Decimal::ZERO ; "zero")]
    #[test_case(dec!(-1) ; "negative")]
    #[test_case(dec!(100.01) ; "above hundred")]
    fn single_position_pct_out_of_range(value: Decimal) {
        let config = RiskConfig {
            max_single_position_pct: value,
            ..RiskConfig::default()
        };
        assert_eq!(field_of(&config), "max_single_position_pct");
    }

    #[test]
    fn total_above_hundred_requires_margin() {
        let mut config = RiskConfig {
            max_total_position_pct: dec!(150),
            ..RiskConfig::default()
        };
        assert_eq!(field_of(&config), "max_total_position_pct");
        config.allow_margin = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bond_pct_zero_is_allowed() {
        let config = RiskConfig {
            bond_collateral_pct: Decimal::ZERO,
            ..RiskConfig::default()
        };
        assert!(config.validated().is_ok());
    }

    #[test]
    fn negative_volume_floor_rejected() {
        let config = RiskConfig {
            warn_volume_floor: dec!(-1),
            ..RiskConfig::default()
        };
        assert_eq!(field_of(&config), "warn_volume_floor");
    }

    #[test]
    fn bond_symbols_match_case_insensitively() {
        let config = RiskConfig::default();
        assert!(config.is_collateral_bond("sgov"));
        assert!(!config.is_collateral_bond("SPY"));
    }
}
