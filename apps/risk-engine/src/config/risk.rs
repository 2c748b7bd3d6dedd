//! Risk limit settings and their conversion into the domain `RiskConfig`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use super::observability::default_true;
use crate::domain::risk_management::{DrawdownBasis, RiskConfig};

/// Risk limits as written in YAML. Percentages are out of 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    /// Single-symbol exposure limit (% of net liquidation).
    #[serde(default = "default_max_single_position_pct")]
    pub max_single_position_pct: f64,
    /// Total gross exposure limit (% of net liquidation).
    #[serde(default = "default_max_total_position_pct")]
    pub max_total_position_pct: f64,
    /// Drawdown at which adding is blocked.
    #[serde(default = "default_max_drawdown_pct")]
    pub max_drawdown_pct: f64,
    /// Aggregate option exposure limit.
    #[serde(default = "default_max_option_exposure_pct")]
    pub max_option_exposure_pct: f64,
    /// Permit margin borrowing.
    #[serde(default)]
    pub allow_margin: bool,
    /// Require a stop-loss on equity buys.
    #[serde(default = "default_true")]
    pub require_stop_loss: bool,
    /// Share of bond holdings counted as put collateral.
    #[serde(default = "default_bond_collateral_pct")]
    pub bond_collateral_pct: f64,
    /// Sector concentration warning threshold.
    #[serde(default = "default_warn_sector_concentration_pct")]
    pub warn_sector_concentration_pct: f64,
    /// Volatility warning threshold.
    #[serde(default = "default_warn_volatility_threshold")]
    pub warn_volatility_threshold: f64,
    /// Average daily volume floor.
    #[serde(default = "default_warn_volume_floor")]
    pub warn_volume_floor: f64,
    /// Symbols treated as bond collateral.
    #[serde(default = "default_collateral_bond_symbols")]
    pub collateral_bond_symbols: Vec<String>,
    /// Drawdown basis.
    #[serde(default)]
    pub drawdown_basis: DrawdownBasis,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            max_single_position_pct: default_max_single_position_pct(),
            max_total_position_pct: default_max_total_position_pct(),
            max_drawdown_pct: default_max_drawdown_pct(),
            max_option_exposure_pct: default_max_option_exposure_pct(),
            allow_margin: false,
            require_stop_loss: true,
            bond_collateral_pct: default_bond_collateral_pct(),
            warn_sector_concentration_pct: default_warn_sector_concentration_pct(),
            warn_volatility_threshold: default_warn_volatility_threshold(),
            warn_volume_floor: default_warn_volume_floor(),
            collateral_bond_symbols: default_collateral_bond_symbols(),
            drawdown_basis: DrawdownBasis::default(),
        }
    }
}

impl RiskConfig {
    /// Build validated limits from settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for non-finite values or
    /// out-of-range limits.
    pub fn from_settings(settings: &RiskSettings) -> Result<Self, ConfigError> {
        let config = Self {
            max_single_position_pct: to_decimal(
                "max_single_position_pct",
                settings.max_single_position_pct,
            )?,
            max_total_position_pct: to_decimal(
                "max_total_position_pct",
                settings.max_total_position_pct,
            )?,
            max_drawdown_pct: to_decimal("max_drawdown_pct", settings.max_drawdown_pct)?,
            max_option_exposure_pct: to_decimal(
                "max_option_exposure_pct",
                settings.max_option_exposure_pct,
            )?,
            allow_margin: settings.allow_margin,
            require_stop_loss: settings.require_stop_loss,
            bond_collateral_pct: to_decimal("bond_collateral_pct", settings.bond_collateral_pct)?,
            warn_sector_concentration_pct: to_decimal(
                "warn_sector_concentration_pct",
                settings.warn_sector_concentration_pct,
            )?,
            warn_volatility_threshold: to_decimal(
                "warn_volatility_threshold",
                settings.warn_volatility_threshold,
            )?,
            warn_volume_floor: to_decimal("warn_volume_floor", settings.warn_volume_floor)?,
            collateral_bond_symbols: settings.collateral_bond_symbols.clone(),
            drawdown_basis: settings.drawdown_basis,
        };

        config
            .validated()
            .map_err(|e| ConfigError::ValidationError(format!("risk: {e}")))
    }
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, ConfigError> {
    Decimal::try_from(value).map_err(|_| {
        ConfigError::ValidationError(format!("risk.{field} is not a finite number: {value}"))
    })
}

const fn default_max_single_position_pct() -> f64 {
    20.0
}

const fn default_max_total_position_pct() -> f64 {
    85.0
}

const fn default_max_drawdown_pct() -> f64 {
    10.0
}

const fn default_max_option_exposure_pct() -> f64 {
    10.0
}

const fn default_bond_collateral_pct() -> f64 {
    95.0
}

const fn default_warn_sector_concentration_pct() -> f64 {
    30.0
}

const fn default_warn_volatility_threshold() -> f64 {
    50.0
}

const fn default_warn_volume_floor() -> f64 {
    100_000.0
}

fn default_collateral_bond_symbols() -> Vec<String> {
    ["SGOV", "BIL", "SHV"].iter().map(|s| (*s).to_string()).collect()
}
