//! Risk Engine Binary
//!
//! Starts the pre-trade risk engine HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin risk-engine -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `RISK_ENGINE_CONFIG`: config file path when no argument is given (default: config.yaml)
//! - `RUST_LOG`: overrides `observability.logging.level`
//! - Any `${VAR}` referenced from the config file

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use risk_engine::application::use_cases::{EvaluateOrderUseCase, EvaluationPolicies};
use risk_engine::config::{Config, load_config};
use risk_engine::domain::risk_management::RiskEvaluator;
use risk_engine::infrastructure::account::FileAccountSnapshot;
use risk_engine::infrastructure::audit::JsonlAuditRecorder;
use risk_engine::infrastructure::http::{AppState, create_router};
use risk_engine::infrastructure::market_stats::FileMarketStats;
use risk_engine::observability::{MetricsConfig, init_metrics};
use risk_engine::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;

/// Concrete type alias for the evaluate order use case.
type ConcreteEvaluateOrderUseCase =
    EvaluateOrderUseCase<FileAccountSnapshot, FileMarketStats, JsonlAuditRecorder>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = config_path();
    let config = load_config(Some(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    init_tracing(&config.observability.logging).context("initializing tracing")?;

    tracing::info!("Starting Risk Engine");
    log_config(&config_path, &config);

    if config.observability.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        init_metrics(&MetricsConfig::with_addr(addr)).context("starting metrics exporter")?;
    }

    let use_case = create_use_case(&config)?;
    let state = AppState {
        evaluate_order: Arc::new(use_case),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/evaluate");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Risk engine stopped");
    Ok(())
}

/// Config path from the first argument, then `RISK_ENGINE_CONFIG`.
fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RISK_ENGINE_CONFIG").ok())
        .unwrap_or_else(|| "config.yaml".to_string())
}

/// Build the evaluator and adapters from configuration.
fn create_use_case(config: &Config) -> anyhow::Result<ConcreteEvaluateOrderUseCase> {
    let risk_config = Arc::new(config.risk_config()?);
    let evaluator = RiskEvaluator::standard(risk_config);
    tracing::info!(rules = ?evaluator.rules(), "Rule set registered");

    let snapshot = Arc::new(FileAccountSnapshot::new(&config.snapshot.path));
    let market_stats = Arc::new(
        config
            .market_stats
            .path
            .as_ref()
            .map_or_else(FileMarketStats::disabled, FileMarketStats::new),
    );
    let audit = Arc::new(JsonlAuditRecorder::new(&config.audit.path));

    let policies = EvaluationPolicies {
        snapshot: config.snapshot.retry.to_policy(),
        audit: config.audit.retry.to_policy(),
        market_stats_timeout: Duration::from_millis(config.market_stats.timeout_ms),
    };

    Ok(EvaluateOrderUseCase::new(
        evaluator,
        snapshot,
        market_stats,
        audit,
        policies,
    ))
}

/// Log the loaded configuration.
fn log_config(path: &str, config: &Config) {
    tracing::info!(
        config_path = path,
        http_port = config.server.http_port,
        metrics_port = config.observability.metrics_port,
        snapshot_path = %config.snapshot.path,
        market_stats_path = ?config.market_stats.path,
        audit_path = %config.audit.path,
        allow_margin = config.risk.allow_margin,
        require_stop_loss = config.risk.require_stop_loss,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
