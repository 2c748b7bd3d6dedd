//! Rule findings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Finding severity. Ordered so that `Block > Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Surfaced to the caller, does not prevent submission.
    Warn,
    /// Prevents submission.
    Block,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "WARN"),
            Self::Block => write!(f, "BLOCK"),
        }
    }
}

/// Stable rule identifiers, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    /// Post-trade cash must not go negative without margin.
    NoMargin,
    /// Equity buys must carry a stop-loss.
    StopLossRequired,
    /// Single-symbol exposure cap.
    SinglePositionLimit,
    /// Total gross exposure cap.
    TotalPositionLimit,
    /// No adding to a position past its drawdown limit.
    DrawdownLimit,
    /// Aggregate option exposure cap.
    OptionExposureLimit,
    /// Short calls must be covered by underlying shares.
    NakedCallBan,
    /// Short puts must be secured by cash or discounted bonds.
    NakedPutMargin,
    /// Sector concentration advisory.
    SectorConcentration,
    /// High volatility advisory.
    Volatility,
    /// Thin liquidity advisory.
    Liquidity,
}

impl RuleId {
    /// Kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMargin => "no-margin",
            Self::StopLossRequired => "stop-loss-required",
            Self::SinglePositionLimit => "single-position-limit",
            Self::TotalPositionLimit => "total-position-limit",
            Self::DrawdownLimit => "drawdown-limit",
            Self::OptionExposureLimit => "option-exposure-limit",
            Self::NakedCallBan => "naked-call-ban",
            Self::NakedPutMargin => "naked-put-margin",
            Self::SectorConcentration => "sector-concentration",
            Self::Volatility => "volatility",
            Self::Liquidity => "liquidity",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule that produced the finding.
    pub rule_id: RuleId,
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Values that triggered the finding, keyed by name.
    pub values: BTreeMap<String, Decimal>,
}

impl Finding {
    /// Create a new finding.
    #[must_use]
    pub fn new(rule_id: RuleId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            severity,
            message: message.into(),
            values: BTreeMap::new(),
        }
    }

    /// Create a blocking finding.
    #[must_use]
    pub fn block(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Block, message)
    }

    /// Create a warning finding.
    #[must_use]
    pub fn warn(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warn, message)
    }

    /// Record a triggering value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule_id, self.message)
    }
}
