//! Tracing Setup
//!
//! Initializes the global `tracing` subscriber from [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `observability.logging.level`: default filter (e.g. `info`, `risk_engine=debug`)
//! - `observability.logging.format`: `json` (default) or `pretty`
//! - `RUST_LOG`: overrides the configured level when set
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_engine::telemetry::init_tracing;
//!
//! init_tracing(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Tracing initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` when the configured level does not parse.
pub fn build_env_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| TelemetryError::InvalidFilter {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the level is invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_env_filter(&config.level)?;

    let result = if config.format == "pretty" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init()
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}
