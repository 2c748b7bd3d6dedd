// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Risk Engine - Rust Core Library
//!
//! Deterministic pre-trade risk gate. Given an order intent and a snapshot of
//! the account, it runs a fixed, ordered rule set and returns an audited
//! `ALLOW` / `WARN` / `BLOCK` verdict with machine-checkable findings.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic, no I/O
//!   - `risk_management`: order intents, account state, rule context,
//!     rules, verdict aggregation
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `AccountSnapshotPort`, `MarketStatsPort`, `AuditRecorderPort`
//!   - `use_cases`: `EvaluateOrder` (snapshot, stats, rules, audit)
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `account`, `market_stats`: JSON file and in-memory sources
//!   - `audit`: JSON Lines and in-memory sinks
//!   - `http`: axum REST API
//!
//! Cross-cutting: `config` (YAML), `resilience` (retry with timeouts),
//! `observability` (Prometheus), `telemetry` (tracing), `error` (wire errors).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Evaluation errors and their HTTP representation.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Retry with timeouts and backoff.
pub mod resilience;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::risk_management::{
    AccountState, Finding, OrderIntent, OrderKind, OrderSide, Outcome, Position, RiskConfig,
    RiskError, RiskEvaluator, RuleId, Severity, Verdict,
};

// Application re-exports
pub use application::ports::{
    AccountSnapshot, AccountSnapshotPort, AuditError, AuditRecord, AuditRecorderPort,
    MarketStatsPort,
};
pub use application::use_cases::{EvaluateOrderUseCase, EvaluationPolicies, EvaluationResult};

// Error re-exports
pub use error::{ErrorCode, EvaluationError};

// Infrastructure re-exports
pub use infrastructure::account::{FileAccountSnapshot, InMemoryAccountSnapshot};
pub use infrastructure::audit::{InMemoryAuditRecorder, JsonlAuditRecorder};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::market_stats::{FileMarketStats, InMemoryMarketStats};
