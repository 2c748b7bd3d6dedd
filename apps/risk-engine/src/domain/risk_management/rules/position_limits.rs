//! Post-trade exposure caps.
//!
//! Both limits are inclusive: a projection equal to the limit passes.
//! The side does not matter: a sell that leaves the position above the limit
//! still blocks.

use super::RiskRule;
use crate::domain::risk_management::value_objects::{Finding, RuleContext, RuleId};

/// Caps projected single-symbol exposure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePositionLimitRule;

impl RiskRule for SinglePositionLimitRule {
    fn id(&self) -> RuleId {
        RuleId::SinglePositionLimit
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let projected = ctx.projected_symbol_pct();
        let limit = ctx.config().max_single_position_pct;
        if projected <= limit {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "{} position would be {:.2}% of net liquidation, limit {}%",
                    ctx.order().symbol,
                    projected,
                    limit
                ),
            )
            .with_value("projected_pct", projected)
            .with_value("limit_pct", limit)
            .with_value("projected_value", ctx.projected_symbol_value())
            .with_value("net_liquidation", ctx.account().net_liquidation),
        )
    }
}

/// Caps projected gross exposure across all positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalPositionLimitRule;

impl RiskRule for TotalPositionLimitRule {
    fn id(&self) -> RuleId {
        RuleId::TotalPositionLimit
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let projected = ctx.projected_total_pct();
        let limit = ctx.config().max_total_position_pct;
        if projected <= limit {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "Total exposure would be {:.2}% of net liquidation, limit {}%",
                    projected, limit
                ),
            )
            .with_value("projected_pct", projected)
            .with_value("limit_pct", limit)
            .with_value("projected_value", ctx.projected_total_value()),
        )
    }
}
