//! Risk Evaluator
//!
//! Runs every registered rule against a snapshot and reduces the findings
//! into a verdict. Pure and synchronous: the same inputs always produce the
//! same verdict.

use std::sync::Arc;

use crate::domain::risk_management::errors::RiskError;
use crate::domain::risk_management::rules::RuleSet;
use crate::domain::risk_management::value_objects::{
    AccountState, MarketStats, OrderIntent, Position, RiskConfig, RuleContext, Verdict,
};

/// Risk Evaluator - applies the rule set under a fixed configuration.
#[derive(Debug)]
pub struct RiskEvaluator {
    config: Arc<RiskConfig>,
    rules: RuleSet,
}

impl RiskEvaluator {
    /// Create an evaluator with explicit rules.
    #[must_use]
    pub const fn new(config: Arc<RiskConfig>, rules: RuleSet) -> Self {
        Self { config, rules }
    }

    /// Create an evaluator with the standard rule set.
    #[must_use]
    pub fn standard(config: Arc<RiskConfig>) -> Self {
        Self::new(config, RuleSet::standard())
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Registered rules.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate an order against an account snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RiskError` when the order is malformed or the snapshot cannot
    /// support percentage computations. Rule violations are findings, not errors.
    pub fn evaluate(
        &self,
        order: &OrderIntent,
        account: &AccountState,
        positions: &[Position],
        market_stats: Option<MarketStats>,
    ) -> Result<Verdict, RiskError> {
        let ctx = RuleContext::builder(order)
            .account(account)
            .positions(positions)
            .config(&self.config)
            .market_stats(market_stats)
            .build()?;
        Ok(self.evaluate_context(&ctx))
    }

    /// Run every rule over a prepared context. No rule short-circuits another.
    #[must_use]
    pub fn evaluate_context(&self, ctx: &RuleContext<'_>) -> Verdict {
        let mut findings = Vec::new();
        let mut skipped = Vec::new();

        for rule in self.rules.iter() {
            if !rule.applies(ctx) {
                skipped.push(rule.id());
                continue;
            }
            if let Some(finding) = rule.evaluate(ctx) {
                findings.push(finding);
            }
        }

        Verdict::from_findings(findings, skipped)
    }
}
