//! Evaluation Scenario Tests
//!
//! Drives the public evaluation API end to end with in-memory adapters:
//! - Worked account scenarios (clean buy, missing stop, covered/naked calls, audit outage)
//! - Inclusive limit boundaries
//! - Completeness: removing one trigger removes exactly its finding
//! - Property tests for purity and absence of false positives under the limits

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::unreadable_literal)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use proptest::prelude::*;
use risk_engine::domain::risk_management::{MarketStats, OptionContract, OptionRight};
use risk_engine::resilience::RetryPolicy;
use risk_engine::{
    AccountSnapshot, AccountState, EvaluateOrderUseCase, EvaluationError, EvaluationPolicies,
    InMemoryAccountSnapshot, InMemoryAuditRecorder, InMemoryMarketStats, OrderIntent, OrderSide,
    Outcome, Position, RiskConfig, RiskEvaluator, RuleId, Severity, Verdict,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;

type InMemoryUseCase =
    EvaluateOrderUseCase<InMemoryAccountSnapshot, InMemoryMarketStats, InMemoryAuditRecorder>;

const CALL_SYMBOL: &str = "AAPL261218C00150000";

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(200),
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
        backoff_multiplier: 2.0,
        jitter_factor: 0.0,
    }
}

fn account() -> AccountState {
    AccountState::cash_account(dec!(100000), dec!(100000))
}

fn evaluator(config: RiskConfig) -> RiskEvaluator {
    RiskEvaluator::standard(Arc::new(config))
}

fn use_case(
    config: RiskConfig,
    positions: Vec<Position>,
    audit: Arc<InMemoryAuditRecorder>,
) -> InMemoryUseCase {
    let snapshot = InMemoryAccountSnapshot::new(AccountSnapshot::new(account(), positions));
    EvaluateOrderUseCase::new(
        evaluator(config),
        Arc::new(snapshot),
        Arc::new(InMemoryMarketStats::new()),
        audit,
        EvaluationPolicies {
            snapshot: fast_policy(),
            audit: fast_policy(),
            market_stats_timeout: Duration::from_millis(100),
        },
    )
}

fn evaluate(order: &OrderIntent, positions: &[Position], stats: Option<MarketStats>) -> Verdict {
    evaluator(RiskConfig::default())
        .evaluate(order, &account(), positions, stats)
        .expect("evaluation should succeed")
}

fn rule_ids(verdict: &Verdict) -> Vec<RuleId> {
    verdict.findings().iter().map(|f| f.rule_id).collect()
}

fn buy(quantity: Decimal, price: Decimal) -> OrderIntent {
    OrderIntent::limit("AAPL", OrderSide::Buy, quantity, price, "breakout above range")
}

fn sell_call(contracts: Decimal) -> OrderIntent {
    let contract = OptionContract::new(
        "AAPL",
        dec!(150),
        NaiveDate::from_ymd_opt(2026, 12, 18).unwrap(),
        OptionRight::Call,
    );
    OrderIntent::limit(CALL_SYMBOL, OrderSide::Sell, contracts, dec!(2), "covered income")
        .with_option(contract)
}

// ============================================
// Worked Scenarios
// ============================================

#[tokio::test]
async fn test_clean_buy_is_allowed_and_audited() {
    let audit = Arc::new(InMemoryAuditRecorder::new());
    let use_case = use_case(RiskConfig::default(), Vec::new(), Arc::clone(&audit));
    let order = buy(dec!(100), dec!(150)).with_stop_loss(dec!(145));

    let result = use_case.execute(order.clone()).await.unwrap();

    assert_eq!(result.verdict.outcome(), Outcome::Allow);
    assert!(result.verdict.finding(RuleId::SinglePositionLimit).is_none());
    assert!(result.verdict.blocking_rules().is_empty());

    let records = audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].evaluation_id, result.evaluation_id);
    assert_eq!(records[0].order, order);
    assert_eq!(records[0].verdict, result.verdict);
    assert_eq!(records[0].justification, "breakout above range");
}

#[tokio::test]
async fn test_missing_stop_loss_is_the_only_block() {
    // 30% of net liquidation sits exactly on a 30% limit, which passes
    let config = RiskConfig {
        max_single_position_pct: dec!(30),
        ..RiskConfig::default()
    };
    let audit = Arc::new(InMemoryAuditRecorder::new());
    let use_case = use_case(config, Vec::new(), Arc::clone(&audit));

    let result = use_case.execute(buy(dec!(200), dec!(150))).await.unwrap();

    assert_eq!(result.verdict.outcome(), Outcome::Block);
    assert_eq!(result.verdict.blocking_rules(), vec![RuleId::StopLossRequired]);
    assert_eq!(audit.len(), 1, "blocked orders are audited too");
}

#[test]
fn test_missing_stop_loss_with_default_limits_also_breaches_position_limit() {
    let verdict = evaluate(&buy(dec!(200), dec!(150)), &[], None);

    assert_eq!(
        verdict.blocking_rules(),
        vec![RuleId::StopLossRequired, RuleId::SinglePositionLimit]
    );
}

#[test]
fn test_naked_call_blocks_without_shares() {
    let verdict = evaluate(&sell_call(dec!(1)), &[], None);

    let finding = verdict.finding(RuleId::NakedCallBan).expect("naked call finding");
    assert_eq!(finding.severity, Severity::Block);
    assert_eq!(verdict.outcome(), Outcome::Block);
}

#[test]
fn test_covered_call_has_no_naked_call_finding() {
    let shares = Position::equity("AAPL", dec!(100), dec!(15000), dec!(0));
    let verdict = evaluate(&sell_call(dec!(1)), &[shares], None);

    assert!(verdict.finding(RuleId::NakedCallBan).is_none());
    assert_eq!(verdict.outcome(), Outcome::Allow);
}

#[test]
fn test_trimming_position_in_drawdown_still_breaches_position_limit() {
    // 400 shares bought at 125 now worth 40,000: 20% drawdown, 40% of the account
    let held = Position::equity("AAPL", dec!(400), dec!(40000), dec!(-10000));
    let order = OrderIntent::limit("AAPL", OrderSide::Sell, dec!(10), dec!(100), "trim");
    let verdict = evaluate(&order, &[held], None);

    assert!(verdict.finding(RuleId::DrawdownLimit).is_none());
    assert_eq!(verdict.blocking_rules(), vec![RuleId::SinglePositionLimit]);
}

#[tokio::test]
async fn test_audit_outage_returns_error_instead_of_verdict() {
    let audit = Arc::new(InMemoryAuditRecorder::new());
    audit.set_unavailable(true);
    let use_case = use_case(RiskConfig::default(), Vec::new(), Arc::clone(&audit));
    let order = buy(dec!(100), dec!(150)).with_stop_loss(dec!(145));

    let err = use_case.execute(order).await.unwrap_err();

    assert!(matches!(err, EvaluationError::AuditUnavailable { attempts: 2, .. }));
    assert!(audit.is_empty());
}

#[tokio::test]
async fn test_invalid_order_is_rejected_before_audit() {
    let audit = Arc::new(InMemoryAuditRecorder::new());
    let use_case = use_case(RiskConfig::default(), Vec::new(), Arc::clone(&audit));
    let order = OrderIntent::limit("AAPL", OrderSide::Buy, dec!(10), dec!(150), "  ");

    let err = use_case.execute(order).await.unwrap_err();

    assert!(matches!(err, EvaluationError::InvalidOrder { .. }));
    assert!(audit.is_empty());
}

// ============================================
// Limit Boundaries
// ============================================

#[test_case(dec!(100), dec!(200), false ; "exactly at limit passes")]
#[test_case(dec!(100), dec!(200.01), true ; "one cent above limit blocks")]
#[test_case(dec!(201), dec!(100), true ; "one share above limit blocks")]
#[test_case(dec!(1), dec!(150), false ; "small position passes")]
fn test_single_position_boundary(quantity: Decimal, price: Decimal, blocked: bool) {
    let order = buy(quantity, price).with_stop_loss(price - dec!(5));
    let verdict = evaluate(&order, &[], None);

    assert_eq!(verdict.finding(RuleId::SinglePositionLimit).is_some(), blocked);
}

#[test_case(dec!(15000), false ; "exactly at total limit passes")]
#[test_case(dec!(15001), true ; "one dollar above total limit blocks")]
fn test_total_position_boundary(order_value: Decimal, blocked: bool) {
    // 70,000 held across four names, 30,000 cash
    let positions: Vec<Position> = ["MSFT", "GOOG", "AMZN", "META"]
        .into_iter()
        .map(|symbol| Position::equity(symbol, dec!(100), dec!(17500), dec!(0)))
        .collect();
    let account = AccountState::cash_account(dec!(100000), dec!(30000));
    let order = OrderIntent::limit("AAPL", OrderSide::Buy, dec!(100), order_value / dec!(100), "x")
        .with_stop_loss(dec!(100));

    let verdict = evaluator(RiskConfig::default())
        .evaluate(&order, &account, &positions, None)
        .unwrap();

    assert_eq!(verdict.finding(RuleId::TotalPositionLimit).is_some(), blocked);
    assert!(verdict.finding(RuleId::SinglePositionLimit).is_none());
}

// ============================================
// Completeness
// ============================================

fn triggering_order() -> OrderIntent {
    // no stop-loss, 30% of net liquidation
    buy(dec!(200), dec!(150))
}

fn volatile_stats() -> MarketStats {
    MarketStats::new(dec!(80), dec!(5000000))
}

#[test]
fn test_all_triggers_reported_together() {
    let verdict = evaluate(&triggering_order(), &[], Some(volatile_stats()));

    assert_eq!(
        rule_ids(&verdict),
        vec![
            RuleId::StopLossRequired,
            RuleId::SinglePositionLimit,
            RuleId::Volatility
        ]
    );
}

#[test]
fn test_adding_stop_loss_removes_only_stop_loss_finding() {
    let order = triggering_order().with_stop_loss(dec!(140));
    let verdict = evaluate(&order, &[], Some(volatile_stats()));

    assert_eq!(
        rule_ids(&verdict),
        vec![RuleId::SinglePositionLimit, RuleId::Volatility]
    );
}

#[test]
fn test_shrinking_order_removes_only_position_finding() {
    let verdict = evaluate(&buy(dec!(100), dec!(150)), &[], Some(volatile_stats()));

    assert_eq!(
        rule_ids(&verdict),
        vec![RuleId::StopLossRequired, RuleId::Volatility]
    );
}

#[test]
fn test_calm_market_removes_only_volatility_finding() {
    let calm = MarketStats::new(dec!(20), dec!(5000000));
    let verdict = evaluate(&triggering_order(), &[], Some(calm));

    assert_eq!(
        rule_ids(&verdict),
        vec![RuleId::StopLossRequired, RuleId::SinglePositionLimit]
    );
}

#[test]
fn test_missing_stats_skip_advisory_rules_without_blocking() {
    let order = buy(dec!(10), dec!(150)).with_stop_loss(dec!(140));
    let verdict = evaluate(&order, &[], None);

    assert_eq!(verdict.outcome(), Outcome::Allow);
    assert!(verdict.skipped().contains(&RuleId::Volatility));
    assert!(verdict.skipped().contains(&RuleId::Liquidity));
}

// ============================================
// Properties
// ============================================

fn order_under_single_limit() -> impl Strategy<Value = OrderIntent> {
    // price in whole dollars, quantity capped so value stays within 20,000
    (1u32..=500u32)
        .prop_flat_map(|price| (Just(price), 1u32..=(20000 / price)))
        .prop_map(|(price, quantity)| {
            let price = Decimal::from(price);
            buy(Decimal::from(quantity), price).with_stop_loss(price / dec!(2))
        })
}

fn any_equity_order() -> impl Strategy<Value = OrderIntent> {
    (1u32..=2000u32, 1u32..=1000u32, any::<bool>(), any::<bool>()).prop_map(
        |(quantity, price, sell, with_stop)| {
            let side = if sell { OrderSide::Sell } else { OrderSide::Buy };
            let price = Decimal::from(price);
            let order =
                OrderIntent::limit("AAPL", side, Decimal::from(quantity), price, "property");
            if with_stop {
                order.with_stop_loss(price / dec!(2))
            } else {
                order
            }
        },
    )
}

proptest! {
    #[test]
    fn prop_no_position_limit_block_under_limit(order in order_under_single_limit()) {
        let verdict = evaluate(&order, &[], None);

        prop_assert!(verdict.finding(RuleId::SinglePositionLimit).is_none());
        prop_assert!(verdict.finding(RuleId::TotalPositionLimit).is_none());
        prop_assert_eq!(verdict.outcome(), Outcome::Allow);
    }

    #[test]
    fn prop_evaluation_is_idempotent(order in any_equity_order(), held in 1u32..500u32) {
        let positions = vec![Position::equity(
            "AAPL",
            Decimal::from(held),
            Decimal::from(held) * dec!(150),
            dec!(0),
        )];
        let stats = Some(MarketStats::new(dec!(40), dec!(250000)));

        let first = evaluate(&order, &positions, stats);
        let second = evaluate(&order, &positions, stats);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_equity_buy_without_stop_always_blocks(
        quantity in 1u32..=2000u32,
        price in 1u32..=1000u32,
    ) {
        let order = buy(Decimal::from(quantity), Decimal::from(price));
        let verdict = evaluate(&order, &[], None);

        prop_assert!(verdict.finding(RuleId::StopLossRequired).is_some());
        prop_assert_eq!(verdict.outcome(), Outcome::Block);
    }
}
