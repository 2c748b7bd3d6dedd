//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::risk_management::OrderIntent;

/// Request to evaluate one order intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateOrderRequest {
    /// Caller's correlation id, echoed in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// The order to evaluate.
    pub order: OrderIntent,
}
