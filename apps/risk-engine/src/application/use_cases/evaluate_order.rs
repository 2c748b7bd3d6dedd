//! Evaluate Order Use Case
//!
//! Orchestrates one pre-trade evaluation:
//!
//! 1. Validate the order intent (nothing is fetched or audited for a malformed order)
//! 2. Fetch the account snapshot (per-attempt timeout, bounded retry)
//! 3. Fetch market stats (timeout, degrades to none)
//! 4. Run the rule set
//! 5. Audit the verdict (per-attempt timeout, bounded retry, fail closed)

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{
    AccountSnapshot, AccountSnapshotPort, AuditError, AuditRecord, AuditRecorderPort,
    MarketStatsPort, SnapshotError,
};
use crate::domain::risk_management::{MarketStats, OrderIntent, RiskEvaluator, Verdict};
use crate::error::EvaluationError;
use crate::observability::{record_evaluation, record_evaluation_error, record_finding};
use crate::resilience::{RetryError, RetryPolicy, retry_with_timeout};

/// Timeouts and retry budgets for the evaluation's external calls.
#[derive(Debug, Clone)]
pub struct EvaluationPolicies {
    /// Policy for the account snapshot fetch.
    pub snapshot: RetryPolicy,
    /// Policy for the audit write.
    pub audit: RetryPolicy,
    /// Timeout for the market stats fetch. Never retried.
    pub market_stats_timeout: Duration,
}

impl Default for EvaluationPolicies {
    fn default() -> Self {
        Self {
            snapshot: RetryPolicy::default(),
            audit: RetryPolicy::default(),
            market_stats_timeout: Duration::from_millis(500),
        }
    }
}

/// Audited outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Id under which the verdict was audited.
    pub evaluation_id: String,
    /// The verdict.
    pub verdict: Verdict,
}

/// Use case for evaluating an order intent against the live account.
pub struct EvaluateOrderUseCase<S, M, A>
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    evaluator: RiskEvaluator,
    snapshot_port: Arc<S>,
    market_stats_port: Arc<M>,
    audit_port: Arc<A>,
    policies: EvaluationPolicies,
}

impl<S, M, A> EvaluateOrderUseCase<S, M, A>
where
    S: AccountSnapshotPort,
    M: MarketStatsPort,
    A: AuditRecorderPort,
{
    /// Create a new EvaluateOrderUseCase.
    pub const fn new(
        evaluator: RiskEvaluator,
        snapshot_port: Arc<S>,
        market_stats_port: Arc<M>,
        audit_port: Arc<A>,
        policies: EvaluationPolicies,
    ) -> Self {
        Self {
            evaluator,
            snapshot_port,
            market_stats_port,
            audit_port,
            policies,
        }
    }

    /// The evaluator in use.
    pub const fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// Execute the use case.
    ///
    /// Returns a verdict only once it has been durably audited.
    pub async fn execute(&self, order: OrderIntent) -> Result<EvaluationResult, EvaluationError> {
        let started = Instant::now();
        let evaluation_id = Uuid::new_v4().to_string();

        tracing::info!(
            evaluation_id = %evaluation_id,
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            "Evaluating order"
        );

        match self.run(&evaluation_id, order).await {
            Ok(verdict) => {
                let elapsed = started.elapsed().as_secs_f64();
                record_evaluation(verdict.outcome().as_str(), elapsed);
                for finding in verdict.findings() {
                    record_finding(finding.rule_id.as_str(), &finding.severity.to_string());
                }
                tracing::info!(
                    evaluation_id = %evaluation_id,
                    outcome = %verdict.outcome(),
                    findings = verdict.findings().len(),
                    skipped = verdict.skipped().len(),
                    elapsed_ms = (elapsed * 1000.0) as u64,
                    "Evaluation complete"
                );
                Ok(EvaluationResult {
                    evaluation_id,
                    verdict,
                })
            }
            Err(err) => {
                record_evaluation_error(err.code().reason());
                tracing::warn!(
                    evaluation_id = %evaluation_id,
                    code = %err.code(),
                    error = %err,
                    "Evaluation failed"
                );
                Err(err)
            }
        }
    }

    async fn run(&self, evaluation_id: &str, order: OrderIntent) -> Result<Verdict, EvaluationError> {
        order.validate()?;

        let snapshot = self.fetch_snapshot().await?;
        let market_stats = self.fetch_market_stats(&order.symbol).await;

        let verdict = self.evaluator.evaluate(
            &order,
            &snapshot.account,
            &snapshot.positions,
            market_stats,
        )?;

        let record = AuditRecord::new(evaluation_id, Utc::now(), order, verdict.clone());
        self.audit(&record).await?;

        Ok(verdict)
    }

    async fn fetch_snapshot(&self) -> Result<AccountSnapshot, EvaluationError> {
        retry_with_timeout(
            &self.policies.snapshot,
            "snapshot",
            || self.snapshot_port.fetch_snapshot(),
            SnapshotError::is_retryable,
        )
        .await
        .map_err(|err| EvaluationError::SnapshotUnavailable {
            attempts: err.attempts(),
            reason: describe(&err),
        })
    }

    async fn fetch_market_stats(&self, symbol: &str) -> Option<MarketStats> {
        let fetch = self.market_stats_port.fetch_stats(symbol);
        match tokio::time::timeout(self.policies.market_stats_timeout, fetch).await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                tracing::warn!(symbol, error = %e, "Market stats unavailable, advisory rules skipped");
                None
            }
            Err(_) => {
                tracing::warn!(
                    symbol,
                    timeout_ms = self.policies.market_stats_timeout.as_millis() as u64,
                    "Market stats timed out, advisory rules skipped"
                );
                None
            }
        }
    }

    async fn audit(&self, record: &AuditRecord) -> Result<(), EvaluationError> {
        retry_with_timeout(
            &self.policies.audit,
            "audit",
            || self.audit_port.record(record),
            AuditError::is_retryable,
        )
        .await
        .map_err(|err| {
            tracing::error!(
                evaluation_id = %record.evaluation_id,
                outcome = %record.verdict.outcome(),
                attempts = err.attempts(),
                error = %err,
                "Audit write failed, withholding verdict"
            );
            EvaluationError::AuditUnavailable {
                evaluation_id: record.evaluation_id.clone(),
                attempts: err.attempts(),
                reason: describe(&err),
            }
        })
    }
}

fn describe<E: std::fmt::Display>(err: &RetryError<E>) -> String {
    match err {
        RetryError::TimedOut { .. } => "timed out".to_string(),
        RetryError::Failed { last_error, .. } => last_error.to_string(),
    }
}
