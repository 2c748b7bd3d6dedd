//! Configuration module for the risk engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the server, risk limits, and adapters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! // Build the domain limits
//! let limits = config.risk_config()?;
//! ```

mod observability;
mod retry;
mod risk;
mod server;
mod sources;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::risk_management::RiskConfig;

pub use observability::{LoggingConfig, ObservabilityConfig};
pub use retry::RetrySettings;
pub use risk::RiskSettings;
pub use server::ServerConfig;
pub use sources::{AuditConfig, MarketStatsConfig, SnapshotConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Risk limits.
    #[serde(default)]
    pub risk: RiskSettings,
    /// Account snapshot source.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Market stats source.
    #[serde(default)]
    pub market_stats: MarketStatsConfig,
    /// Audit sink.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Validated domain risk limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if a limit is out of range.
    pub fn risk_config(&self) -> Result<RiskConfig, ConfigError> {
        RiskConfig::from_settings(&self.risk)
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config.server.socket_addr()?;

    let metrics_port = config.observability.metrics_port;
    if metrics_port != 0 && metrics_port == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "http_port and metrics_port must be different".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if config.snapshot.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "snapshot.path must not be empty".to_string(),
        ));
    }
    if config.audit.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "audit.path must not be empty".to_string(),
        ));
    }
    if config.market_stats.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "market_stats.timeout_ms must be positive".to_string(),
        ));
    }

    for (name, retry) in [("snapshot", &config.snapshot.retry), ("audit", &config.audit.retry)] {
        retry
            .to_policy()
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("{name}.retry: {e}")))?;
    }

    config.risk_config()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.observability.metrics_port, 9090);
        assert_eq!(config.observability.logging.format, "json");
        assert_eq!(config.snapshot.retry.max_attempts, 3);
        assert!(config.market_stats.path.is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.risk_config().unwrap(), RiskConfig::default());
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "path: ${RISK_ENGINE_CONFIG_TEST_NONEXISTENT_VAR:-data/audit.jsonl}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "path: data/audit.jsonl");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "path: ${RISK_ENGINE_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "path: ");
    }

    #[test]
    fn test_validation_same_ports() {
        let yaml = r"
server:
  http_port: 9090
observability:
  metrics_port: 9090
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for duplicate ports");
        };
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_metrics_disabled_skips_port_check() {
        let yaml = r"
server:
  http_port: 9090
observability:
  metrics_port: 0
";
        assert!(load_config_from_string(yaml).is_ok());
    }

    #[test]
    fn test_validation_retry_attempts_capped() {
        let yaml = r"
snapshot:
  retry:
    max_attempts: 11
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for max_attempts above limit");
        };
        assert!(err.to_string().contains("snapshot.retry"));
    }

    #[test]
    fn test_validation_invalid_risk_limit() {
        let yaml = r"
risk:
  max_single_position_pct: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero position limit");
        };
        assert!(err.to_string().contains("max_single_position_pct"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
server:
  http_port: 8181
  bind_address: "127.0.0.1"

risk:
  max_single_position_pct: 15
  max_total_position_pct: 150
  allow_margin: true
  require_stop_loss: false
  collateral_bond_symbols: ["SGOV"]
  drawdown_basis: UNREALIZED_AND_REALIZED

snapshot:
  path: "/var/lib/risk/account.json"
  retry:
    max_attempts: 5
    attempt_timeout_ms: 750

market_stats:
  path: "/var/lib/risk/stats.json"
  timeout_ms: 250

audit:
  path: "/var/log/risk/audit.jsonl"

observability:
  metrics_port: 0
  logging:
    level: "debug"
    format: "pretty"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.snapshot.retry.max_attempts, 5);
        assert_eq!(config.snapshot.retry.attempt_timeout_ms, 750);
        assert_eq!(config.market_stats.path.as_deref(), Some("/var/lib/risk/stats.json"));
        assert_eq!(config.audit.retry.max_attempts, 3);
        assert_eq!(config.observability.logging.level, "debug");

        let risk = config.risk_config().unwrap();
        assert_eq!(risk.max_single_position_pct, dec!(15));
        assert_eq!(risk.max_total_position_pct, dec!(150));
        assert!(!risk.require_stop_loss);
        assert_eq!(risk.collateral_bond_symbols, vec!["SGOV".to_string()]);
        assert_eq!(
            risk.drawdown_basis,
            crate::domain::risk_management::DrawdownBasis::UnrealizedAndRealized
        );
    }

    #[test]
    fn test_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.yaml");
        let config = match load_config(Some(path)) {
            Ok(c) => c,
            Err(e) => panic!("example config should load: {e}"),
        };
        assert_eq!(config.risk_config().unwrap(), RiskConfig::default());
        assert!(config.market_stats.path.is_some());
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/risk-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
