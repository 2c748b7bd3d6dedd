//! Observability module for metrics.
//!
//! Prometheus export plus the recording helpers used by the evaluation path.
//! Structured logging is set up in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_evaluation, record_evaluation_error,
    record_finding, record_retry_attempt,
};
