//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod evaluate_order;

pub use evaluate_order::{EvaluateOrderUseCase, EvaluationPolicies, EvaluationResult};
