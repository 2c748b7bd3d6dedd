//! Prometheus metrics for the risk engine.
//!
//! Counters and histograms are recorded through the `metrics` facade; when no
//! exporter is installed they are no-ops, so tests never need one.
//!
//! # Example
//!
//! ```ignore
//! use risk_engine::observability::{init_metrics, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config)?;
//!
//! record_evaluation("block", 0.004);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for evaluation latency (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // 100us to 5s; most of the time is snapshot fetch and audit write
            latency_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Evaluation Metrics
// ============================================================================

/// Record a completed (audited) evaluation.
///
/// # Arguments
///
/// * `outcome` - Verdict outcome (`"allow"`, `"warn"`, `"block"`)
/// * `latency_seconds` - End-to-end evaluation time including I/O
pub fn record_evaluation(outcome: &str, latency_seconds: f64) {
    counter!(
        "risk_evaluations_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!("risk_evaluation_duration_seconds").record(latency_seconds);
}

/// Record one finding emitted by a rule.
pub fn record_finding(rule_id: &str, severity: &str) {
    counter!(
        "risk_findings_total",
        "rule_id" => rule_id.to_string(),
        "severity" => severity.to_string()
    )
    .increment(1);
}

/// Record an evaluation that ended in an error instead of a verdict.
///
/// # Arguments
///
/// * `code` - Error reason (e.g., `"SNAPSHOT_UNAVAILABLE"`)
pub fn record_evaluation_error(code: &str) {
    counter!(
        "risk_evaluation_errors_total",
        "code" => code.to_string()
    )
    .increment(1);
}

// ============================================================================
// Resilience Metrics
// ============================================================================

/// Record a retry of an external call.
///
/// # Arguments
///
/// * `operation` - Retried operation (e.g., `"snapshot"`, `"audit"`)
pub fn record_retry_attempt(operation: &str) {
    counter!(
        "risk_retry_attempts_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}
