//! Risk Management Domain Services

mod risk_evaluator;

pub use risk_evaluator::RiskEvaluator;
