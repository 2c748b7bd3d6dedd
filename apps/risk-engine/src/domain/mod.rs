//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Rules**: Independent pre-trade checks producing findings
//! - **Domain Services**: Stateless business logic
//!
//! # Bounded Contexts
//!
//! - [`risk_management`]: Pre-trade rule evaluation and verdict aggregation

pub mod risk_management;
