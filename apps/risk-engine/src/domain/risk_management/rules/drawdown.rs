//! Drawdown limit.

use super::RiskRule;
use crate::domain::risk_management::value_objects::{Finding, RuleContext, RuleId};

/// Blocks adding to a position whose drawdown has reached the limit.
///
/// Orders that reduce or close the position always pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawdownLimitRule;

impl RiskRule for DrawdownLimitRule {
    fn id(&self) -> RuleId {
        RuleId::DrawdownLimit
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding> {
        let drawdown = ctx.drawdown_pct()?;
        let limit = ctx.config().max_drawdown_pct;
        if drawdown < limit || ctx.reduces_existing() {
            return None;
        }
        Some(
            Finding::block(
                self.id(),
                format!(
                    "{} is down {:.2}% from cost basis (limit {}%); only reducing orders allowed",
                    ctx.order().symbol,
                    drawdown,
                    limit
                ),
            )
            .with_value("drawdown_pct", drawdown)
            .with_value("limit_pct", limit)
            .with_value("existing_quantity", ctx.existing_quantity()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_management::rules::test_support::Fixture;
    use crate::domain::risk_management::value_objects::{OrderIntent, OrderSide, Position};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn losing_position(unrealized: Decimal) -> Position {
        // cost basis 10,000
        Position::equity("AAPL", dec!(100), dec!(10000) + unrealized, unrealized)
    }

    fn add_to(side: OrderSide, qty: Decimal) -> OrderIntent {
        OrderIntent::limit("AAPL", side, qty, dec!(90), "average").with_stop_loss(dec!(80))
    }

    #[test_case(dec!(-999), false ; "below limit")]
    #[test_case(dec!(-1000), true ; "at limit blocks")]
    #[test_case(dec!(-2500), true ; "beyond limit")]
    fn adding_to_loser(unrealized: Decimal, blocked: bool) {
        let fixture =
            Fixture::new(add_to(OrderSide::Buy, dec!(10))).with_position(losing_position(unrealized));
        assert_eq!(
            DrawdownLimitRule.evaluate(&fixture.context()).is_some(),
            blocked
        );
    }

    #[test_case(dec!(10) ; "partial close")]
    #[test_case(dec!(100) ; "full close")]
    fn reducing_always_passes(qty: Decimal) {
        let fixture = Fixture::new(add_to(OrderSide::Sell, qty))
            .with_position(losing_position(dec!(-3000)));
        assert!(DrawdownLimitRule.evaluate(&fixture.context()).is_none());
    }

    #[test]
    fn oversell_is_not_a_close() {
        let fixture = Fixture::new(add_to(OrderSide::Sell, dec!(101)))
            .with_position(losing_position(dec!(-3000)));
        assert!(DrawdownLimitRule.evaluate(&fixture.context()).is_some());
    }

    #[test]
    fn no_existing_position_passes() {
        let fixture = Fixture::new(add_to(OrderSide::Buy, dec!(10)));
        assert!(DrawdownLimitRule.evaluate(&fixture.context()).is_none());
    }
}
