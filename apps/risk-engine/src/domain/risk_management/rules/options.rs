//! Option exposure and short option coverage.
//!
//! Coverage rules only count *opening* contracts: selling against an existing
//! long in the same contract closes it and needs no cover.

use rust_decimal::Decimal;

use super::RiskRule;
use crate::domain::risk_management::value_objects::{
    CONTRACT_MULTIPLIER, Finding, OptionContract, OptionRight, OrderSide, RuleContext, RuleId,
};

/// Caps aggregate option market value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionExposureLimitRule;

impl RiskRule for OptionExposureLimitRule {
    fn id(&self) -> RuleId {
        RuleId::OptionExposureLimit
    }

    fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        ctx.option_exposure_pct().is_some()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let projected = ctx.option_exposure_pct()?;
        let limit = ctx.config().max_option_exposure_pct;
        if projected <= limit {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "Option exposure would be {:.2}% of net liquidation, limit {}%",
                    projected, limit
                ),
            )
            .with_value("projected_pct", projected)
            .with_value("limit_pct", limit),
        )
    }
}

/// Opening short option of the given right, if the order is one.
fn short_open<'c>(ctx: &'c RuleContext<'_>, right: OptionRight) -> Option<&'c OptionContract> {
    let contract = ctx.order_option()?;
    let opens_short = ctx.order().side == OrderSide::Sell
        && contract.right == right
        && ctx.opening_contracts() > Decimal::ZERO;
    opens_short.then_some(contract)
}

/// Blocks short calls not covered by underlying shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct NakedCallBanRule;

impl RiskRule for NakedCallBanRule {
    fn id(&self) -> RuleId {
        RuleId::NakedCallBan
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let contract = short_open(ctx, OptionRight::Call)?;
        let required = ctx.opening_contracts() * CONTRACT_MULTIPLIER;
        let held = ctx.underlying_shares_held();
        if held >= required {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "Naked call: selling {} contracts needs {} {} shares, {} held",
                    ctx.opening_contracts(),
                    required,
                    contract.underlying,
                    held
                ),
            )
            .with_value("opening_contracts", ctx.opening_contracts())
            .with_value("required_shares", required)
            .with_value("shares_held", held),
        )
    }
}

/// Blocks short puts not secured by cash plus discounted bonds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NakedPutMarginRule;

impl RiskRule for NakedPutMarginRule {
    fn id(&self) -> RuleId {
        RuleId::NakedPutMargin
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        short_open(ctx, OptionRight::Put)?;
        let required = ctx.opening_strike_value();
        let available = ctx.collateral_available();
        if available >= required {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "Insufficient collateral for short put: ${:.2} available, ${:.2} required",
                    available, required
                ),
            )
            .with_value("required_collateral", required)
            .with_value("available_collateral", available)
            .with_value("cash", ctx.account().total_cash)
            .with_value("bond_value", ctx.bond_value()),
        )
    }
}
