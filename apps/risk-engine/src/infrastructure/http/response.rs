//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::use_cases::EvaluationResult;
use crate::domain::risk_management::{Finding, Outcome, RuleId};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Audited verdict for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateOrderResponse {
    /// Id of the audit record.
    pub evaluation_id: String,
    /// Overall outcome.
    pub outcome: Outcome,
    /// Whether the order may proceed (outcome is not BLOCK).
    pub allowed: bool,
    /// Findings in rule order.
    pub findings: Vec<Finding>,
    /// Rules skipped for missing inputs.
    pub skipped: Vec<RuleId>,
}

impl From<EvaluationResult> for EvaluateOrderResponse {
    fn from(result: EvaluationResult) -> Self {
        let verdict = result.verdict;
        Self {
            evaluation_id: result.evaluation_id,
            outcome: verdict.outcome(),
            allowed: verdict.is_allowed(),
            findings: verdict.findings().to_vec(),
            skipped: verdict.skipped().to_vec(),
        }
    }
}
