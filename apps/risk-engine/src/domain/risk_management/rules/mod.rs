//! Pre-trade risk rules.
//!
//! Each rule is an independent check over a [`RuleContext`] producing at most
//! one [`Finding`]. The [`RuleSet`] fixes registration order, which is also
//! the order findings appear in a verdict.

mod advisory;
mod cash;
mod drawdown;
mod options;
mod position_limits;
mod stop_loss;

pub use advisory::{LiquidityRule, SectorConcentrationRule, VolatilityRule};
pub use cash::NoMarginRule;
pub use drawdown::DrawdownLimitRule;
pub use options::{NakedCallBanRule, NakedPutMarginRule, OptionExposureLimitRule};
pub use position_limits::{SinglePositionLimitRule, TotalPositionLimitRule};
pub use stop_loss::StopLossRequiredRule;

use super::value_objects::{Finding, RuleContext, RuleId};

/// A single pre-trade check.
pub trait RiskRule: Send + Sync {
    /// Stable rule identifier.
    fn id(&self) -> RuleId;

    /// Whether the optional inputs this rule needs are present.
    ///
    /// Rules that do not apply are reported as skipped rather than passed.
    fn applies(&self, _ctx: &RuleContext<'_>) -> bool {
        true
    }

    /// Run the check.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Finding>;
}

/// Ordered, immutable collection of rules.
pub struct RuleSet {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RuleSet {
    /// Build a rule set from explicit rules, in registration order.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn RiskRule>>) -> Self {
        Self { rules }
    }

    /// The standard rule set.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(NoMarginRule),
            Box::new(StopLossRequiredRule),
            Box::new(SinglePositionLimitRule),
            Box::new(TotalPositionLimitRule),
            Box::new(DrawdownLimitRule),
            Box::new(OptionExposureLimitRule),
            Box::new(NakedCallBanRule),
            Box::new(NakedPutMarginRule),
            Box::new(SectorConcentrationRule),
            Box::new(VolatilityRule),
            Box::new(LiquidityRule),
        ])
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RiskRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Registered rule ids, in order.
    #[must_use]
    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
