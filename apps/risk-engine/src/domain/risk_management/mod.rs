//! Risk Management Bounded Context
//!
//! Evaluates a proposed order against an account snapshot before it reaches the broker.
//!
//! # Key Concepts
//!
//! - **Risk Config**: Immutable limits and warning thresholds, validated at startup
//! - **Rule Context**: Post-trade projections derived from the snapshot and the order
//! - **Rules**: Independent checks, each producing at most one finding
//! - **Verdict**: Ordered findings reduced to ALLOW / WARN / BLOCK

pub mod errors;
pub mod rules;
pub mod services;
pub mod value_objects;

pub use errors::RiskError;
pub use rules::{RiskRule, RuleSet};
pub use services::RiskEvaluator;
pub use value_objects::{
    AccountState, AssetClass, DrawdownBasis, Finding, MarketStats, OptionContract, OptionRight,
    OrderIntent, OrderKind, OrderSide, Outcome, Position, RiskConfig, RuleContext,
    RuleContextBuilder, RuleId, Severity, Verdict,
};
