//! Cash sufficiency.

use super::RiskRule;
use crate::domain::risk_management::value_objects::{Finding, RuleContext, RuleId};
use rust_decimal::Decimal;

/// Blocks orders that would drive cash negative when borrowing is not permitted.
///
/// A cash check only; it does not simulate the broker's margin model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarginRule;

impl RiskRule for NoMarginRule {
    fn id(&self) -> RuleId {
        RuleId::NoMargin
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        if ctx.margin_permitted() || ctx.post_trade_cash() >= Decimal::ZERO {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "Order requires borrowing: post-trade cash would be ${:.2}",
                    ctx.post_trade_cash()
                ),
            )
            .with_value("cash", ctx.account().total_cash)
            .with_value("order_notional", ctx.order_notional())
            .with_value("post_trade_cash", ctx.post_trade_cash()),
        )
    }
}
