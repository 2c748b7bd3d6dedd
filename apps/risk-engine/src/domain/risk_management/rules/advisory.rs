//! Advisory (WARN-only) rules.
//!
//! These depend on optional inputs and are skipped, never failed, when the
//! inputs are missing.

use super::RiskRule;
use crate::domain::risk_management::value_objects::{Finding, RuleContext, RuleId};

/// Warns when post-trade sector exposure exceeds the threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectorConcentrationRule;

impl RiskRule for SectorConcentrationRule {
    fn id(&self) -> RuleId {
        RuleId::SectorConcentration
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.sector_exposure_pct().is_some()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let exposure = ctx.sector_exposure_pct()?;
        let threshold = ctx.config().warn_sector_concentration_pct;
        if exposure <= threshold {
            return None;
        }
        Some(
            Finding::warn(
                self.id(),
                format!(
                    "Sector {} would be {:.2}% of net liquidation (threshold {}%)",
                    ctx.sector().unwrap_or_default(),
                    exposure,
                    threshold
                ),
            )
            .with_value("sector_pct", exposure)
            .with_value("threshold_pct", threshold),
        )
    }
}

/// Warns on high trailing volatility.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityRule;

impl RiskRule for VolatilityRule {
    fn id(&self) -> RuleId {
        RuleId::Volatility
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.market_stats().is_some()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let volatility = ctx.market_stats()?.volatility;
        let threshold = ctx.config().warn_volatility_threshold;
        if volatility <= threshold {
            return None;
        }
        Some(
            Finding::warn(
                self.id(),
                format!(
                    "{} trailing volatility {}% exceeds {}%",
                    ctx.order().symbol,
                    volatility,
                    threshold
                ),
            )
            .with_value("volatility", volatility)
            .with_value("threshold", threshold),
        )
    }
}

/// Warns on thin average daily volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiquidityRule;

impl RiskRule for LiquidityRule {
    fn id(&self) -> RuleId {
        RuleId::Liquidity
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.market_stats().is_some()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let avg_volume = ctx.market_stats()?.avg_volume;
        let floor = ctx.config().warn_volume_floor;
        if avg_volume >= floor {
            return None;
        }
        Some(
            Finding::warn(
                self.id(),
                format!(
                    "{} average daily volume {} is below {}",
                    ctx.order().symbol,
                    avg_volume,
                    floor
                ),
            )
            .with_value("avg_volume", avg_volume)
            .with_value("floor", floor),
        )
    }
}
