//! Verdict value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::finding::{Finding, RuleId, Severity};

/// Overall evaluation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// No findings.
    Allow,
    /// Only warnings.
    Warn,
    /// At least one blocking finding.
    Block,
}

impl Outcome {
    /// Lower-case label, used for metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "ALLOW"),
            Self::Warn => write!(f, "WARN"),
            Self::Block => write!(f, "BLOCK"),
        }
    }
}

/// Immutable result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    outcome: Outcome,
    findings: Vec<Finding>,
    #[serde(default)]
    skipped: Vec<RuleId>,
}

impl Verdict {
    /// Reduce findings by severity precedence. Finding order is preserved.
    #[must_use]
    pub fn from_findings(findings: Vec<Finding>, skipped: Vec<RuleId>) -> Self {
        let outcome = match findings.iter().map(|f| f.severity).max() {
            Some(Severity::Block) => Outcome::Block,
            Some(Severity::Warn) => Outcome::Warn,
            None => Outcome::Allow,
        };
        Self {
            outcome,
            findings,
            skipped,
        }
    }

    /// Overall outcome.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Findings in rule registration order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Rules skipped for lack of optional inputs.
    #[must_use]
    pub fn skipped(&self) -> &[RuleId] {
        &self.skipped
    }

    /// Whether the order may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.outcome != Outcome::Block
    }

    /// Finding produced by a rule, if any.
    #[must_use]
    pub fn finding(&self, rule_id: RuleId) -> Option<&Finding> {
        self.findings.iter().find(|f| f.rule_id == rule_id)
    }

    /// Ids of blocking findings.
    #[must_use]
    pub fn blocking_rules(&self) -> Vec<RuleId> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Block)
            .map(|f| f.rule_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_findings_allow() {
        let verdict = Verdict::from_findings(Vec::new(), Vec::new());
        assert_eq!(verdict.outcome(), Outcome::Allow);
        assert!(verdict.is_allowed());
    }

    #[test]
    fn warnings_only_warn() {
        let verdict = Verdict::from_findings(
            vec![Finding::warn(RuleId::Volatility, "volatile")],
            Vec::new(),
        );
        assert_eq!(verdict.outcome(), Outcome::Warn);
        assert!(verdict.is_allowed());
    }

    #[test]
    fn any_block_blocks_and_order_is_kept() {
        let verdict = Verdict::from_findings(
            vec![
                Finding::warn(RuleId::SectorConcentration, "concentrated"),
                Finding::block(RuleId::NakedCallBan, "naked"),
                Finding::warn(RuleId::Liquidity, "thin"),
            ],
            vec![RuleId::OptionExposureLimit],
        );
        assert_eq!(verdict.outcome(), Outcome::Block);
        let ids: Vec<_> = verdict.findings().iter().map(|f| f.rule_id).collect();
        assert_eq!(
            ids,
            vec![
                RuleId::SectorConcentration,
                RuleId::NakedCallBan,
                RuleId::Liquidity
            ]
        );
        assert_eq!(verdict.blocking_rules(), vec![RuleId::NakedCallBan]);
        assert_eq!(verdict.skipped(), &[RuleId::OptionExposureLimit]);
    }

    #[test]
    fn serializes_outcome_upper_case() {
        let verdict = Verdict::from_findings(Vec::new(), Vec::new());
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["outcome"], "ALLOW");
    }
}
