//! Stop-loss requirement.

use super::RiskRule;
use crate::domain::risk_management::value_objects::{Finding, RuleContext, RuleId};

/// Blocks equity buys that carry no stop-loss when one is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopLossRequiredRule;

impl RiskRule for StopLossRequiredRule {
    fn id(&self) -> RuleId {
        RuleId::StopLossRequired
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let order = ctx.order();
        if !ctx.config().require_stop_loss
            || !order.is_equity_buy()
            || order.stop_loss_price.is_some()
        {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!("Stop-loss is required for BUY orders on {}", order.symbol),
            )
            .with_value("quantity", order.quantity)
            .with_value("order_notional", ctx.order_notional()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::rules::test_support::Fixture;
    use crate::domain::risk_management::value_objects::{OrderIntent, OrderSide};
    use rust_decimal_macros::dec;

    fn bare_buy() -> OrderIntent {
        OrderIntent::limit("AAPL", OrderSide::Buy, dec!(10), dec!(150), "test")
    }

    #[test]
    fn buy_without_stop_blocks() {
        let fixture = Fixture::new(bare_buy());
        let finding = StopLossRequiredRule.evaluate(&fixture.context()).unwrap();
        assert_eq!(finding.rule_id, RuleId::StopLossRequired);
    }

    #[test]
    fn buy_with_stop_passes() {
        let fixture = Fixture::new(bare_buy().with_stop_loss(dec!(140)));
        assert!(StopLossRequiredRule.evaluate(&fixture.context()).is_none());
    }

    #[test]
    fn sell_needs_no_stop() {
        let order = OrderIntent::limit("AAPL", OrderSide::Sell, dec!(10), dec!(150), "exit");
        let fixture = Fixture::new(order);
        assert!(StopLossRequiredRule.evaluate(&fixture.context()).is_none());
    }

    #[test]
    fn disabled_by_config() {
        let mut fixture = Fixture::new(bare_buy());
        fixture.config.require_stop_loss = false;
        assert!(StopLossRequiredRule.evaluate(&fixture.context()).is_none());
    }
}
