//! E2E integration tests for the statement pipeline.
//!
//! Drives the full flow: batch JSON → pipeline run → store upserts →
//! dashboard snapshot, over a mixed multi-strategy fixture.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use statement_pipeline::models::{
    AlertLevel, AlertType, BehaviorAlertType, DailyEquityRecord, OffsetFlag, PositionSnapshot,
    StrategyAccount, StrategyCode, TradeDirection, TradeFill,
};
use statement_pipeline::{
    Config, InMemoryDerivedStore, Pipeline, StatementBatch, build_snapshot, load_batch,
    persist_output,
};

// =============================================================================
// Fixture builders
// =============================================================================

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
}

fn equity_row(
    code: &str,
    day: u32,
    equity: Decimal,
    deposit_withdraw: Decimal,
    margin_used: Decimal,
) -> DailyEquityRecord {
    DailyEquityRecord {
        strategy_code: StrategyCode::new(code),
        trade_date: date(day),
        prev_balance: equity,
        deposit_withdraw,
        realized_pnl: Decimal::ZERO,
        commission: dec!(120),
        current_balance: equity,
        floating_pnl: Decimal::ZERO,
        equity,
        margin_used,
        available_funds: equity - margin_used,
        risk_degree: Decimal::ZERO,
        daily_return: None,
        cumulative_return: None,
        drawdown: None,
        max_drawdown: None,
    }
}

fn position_row(
    code: &str,
    day: u32,
    contract: &str,
    long_qty: i64,
    settlement: Decimal,
    prev_settlement: Decimal,
    floating_pnl: Decimal,
) -> PositionSnapshot {
    PositionSnapshot {
        strategy_code: StrategyCode::new(code),
        trade_date: date(day),
        contract: contract.to_string(),
        long_qty,
        long_price: prev_settlement,
        short_qty: 0,
        short_price: Decimal::ZERO,
        prev_settlement,
        settlement,
        floating_pnl,
        position_value: Decimal::from(long_qty) * settlement,
        margin: Decimal::from(long_qty) * settlement * dec!(0.1),
        exchange: "CZCE".to_string(),
        open_date: Some(date(1)),
    }
}

fn trade_row(code: &str, day: u32, contract: &str, amount: Decimal) -> TradeFill {
    TradeFill {
        strategy_code: StrategyCode::new(code),
        trade_date: date(day),
        contract: contract.to_string(),
        trade_id: format!("{code}-{day}"),
        trade_time: None,
        direction: TradeDirection::Buy,
        offset_flag: OffsetFlag::Open,
        price: dec!(5000),
        quantity: 2,
        amount,
        commission: dec!(10),
        realized_pnl: Decimal::ZERO,
        exchange: "CZCE".to_string(),
    }
}

/// Three healthy strategies, one fresh account, one with a averaging-down
/// habit on a falling contract.
fn fixture_batch() -> StatementBatch {
    let mut daily_equity = Vec::new();
    let mut positions = Vec::new();
    let mut trades = Vec::new();

    // "steady": grinds up, low margin
    for (i, equity) in [dec!(1_000_000), dec!(1_004_000), dec!(1_007_000), dec!(1_012_000)]
        .into_iter()
        .enumerate()
    {
        daily_equity.push(equity_row("steady", i as u32 + 1, equity, Decimal::ZERO, dec!(150_000)));
    }

    // "drawdown": peaked early, heavy margin, concentrated book
    for (i, equity) in [dec!(1_000_000), dec!(1_060_000), dec!(930_000), dec!(900_000)]
        .into_iter()
        .enumerate()
    {
        daily_equity.push(equity_row("drawdown", i as u32 + 1, equity, Decimal::ZERO, dec!(820_000)));
    }
    positions.push(position_row("drawdown", 4, "cu2602", 40, dec!(5000), dec!(5000), dec!(-30_000)));
    trades.push(trade_row("drawdown", 4, "cu2602", dec!(400_000)));

    // "averager": keeps buying mgq2601 as it falls
    let settlements = [dec!(5000), dec!(4900), dec!(4750)];
    let longs = [4, 7, 12];
    let pnls = [dec!(0), dec!(-14_000), dec!(-52_000)];
    for i in 0..3 {
        let equity = dec!(800_000) + pnls[i];
        daily_equity.push(equity_row("averager", i as u32 + 2, equity, Decimal::ZERO, dec!(200_000)));
        let prev = if i == 0 { dec!(5050) } else { settlements[i - 1] };
        positions.push(position_row(
            "averager",
            i as u32 + 2,
            "mgq2601",
            longs[i],
            settlements[i],
            prev,
            pnls[i],
        ));
    }

    // "fresh": a single day of history, unscorable
    daily_equity.push(equity_row("fresh", 4, dec!(500_000), Decimal::ZERO, dec!(50_000)));

    StatementBatch {
        accounts: vec![
            StrategyAccount::from_code("steady"),
            StrategyAccount::from_code("drawdown"),
            StrategyAccount::from_code("averager"),
            StrategyAccount::from_code("fresh"),
        ],
        daily_equity,
        positions,
        trades,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn full_run_scores_ranks_and_flags() {
    let pipeline = Pipeline::new(Config::default());
    let batch = fixture_batch();
    let output = pipeline.run(&batch).unwrap();

    assert_eq!(output.calc_date, date(4));
    assert!(output.failures.is_empty());

    // Three scorable strategies get ranks 1..=3; "fresh" stays unranked.
    let mut ranks: Vec<u32> = output.scores.iter().filter_map(|s| s.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);
    let fresh = output
        .scores
        .iter()
        .find(|s| s.strategy_code.as_str() == "fresh")
        .unwrap();
    assert!(fresh.rank.is_none() && fresh.total_score.is_none());

    // The steady grinder outranks the drawdown-heavy book.
    let rank_of = |code: &str| {
        output
            .scores
            .iter()
            .find(|s| s.strategy_code.as_str() == code)
            .unwrap()
            .rank
            .unwrap()
    };
    assert!(rank_of("steady") < rank_of("drawdown"));

    // Averaging down produced behavior alerts of both kinds.
    let averager_alerts: Vec<_> = output
        .behavior_alerts
        .iter()
        .filter(|a| a.strategy_code.as_str() == "averager")
        .collect();
    assert!(
        averager_alerts
            .iter()
            .any(|a| a.alert_type == BehaviorAlertType::FloatingLossAdd)
    );
    assert!(
        averager_alerts
            .iter()
            .any(|a| a.alert_type == BehaviorAlertType::CounterTrendAdd)
    );

    let averager_summary = output
        .behavior_summaries
        .iter()
        .find(|s| s.strategy_code.as_str() == "averager")
        .unwrap();
    assert!(averager_summary.behavior_risk_score > 0);
    assert_eq!(averager_summary.calc_date, date(4));
}

#[test]
fn threshold_alerts_fire_for_the_risky_book() {
    let pipeline = Pipeline::new(Config::default());
    let output = pipeline.run(&fixture_batch()).unwrap();

    // margin 820k / 900k equity > 0.8: danger
    let margin_alert = output
        .alerts
        .iter()
        .find(|a| {
            a.strategy_code.as_str() == "drawdown" && a.alert_type == AlertType::MarginRatio
        })
        .unwrap();
    assert_eq!(margin_alert.alert_level, AlertLevel::Danger);
    assert_eq!(margin_alert.trade_date, date(4));

    // Single-contract book: full concentration
    let conc_alert = output
        .alerts
        .iter()
        .find(|a| {
            a.strategy_code.as_str() == "drawdown" && a.alert_type == AlertType::Top1Concentration
        })
        .unwrap();
    assert_eq!(conc_alert.metric_value, dec!(1));

    // Peak 1.06M to 900k is a ~15% drawdown: warning band
    let dd_alert = output
        .alerts
        .iter()
        .find(|a| a.strategy_code.as_str() == "drawdown" && a.alert_type == AlertType::MaxDrawdown)
        .unwrap();
    assert_eq!(dd_alert.alert_level, AlertLevel::Warning);

    // The steady strategy stays silent.
    assert!(
        !output
            .alerts
            .iter()
            .any(|a| a.strategy_code.as_str() == "steady")
    );
}

#[tokio::test]
async fn rerun_leaves_store_byte_identical() {
    let pipeline = Pipeline::new(Config::default());
    let batch = fixture_batch();

    let store = InMemoryDerivedStore::new();
    let output = pipeline.run(&batch).unwrap();
    persist_output(&store, &output).await.unwrap();
    let first = store.fingerprint();

    let output = pipeline.run(&batch).unwrap();
    persist_output(&store, &output).await.unwrap();

    assert_eq!(store.fingerprint(), first);
}

#[tokio::test]
async fn store_holds_every_output_family() {
    let pipeline = Pipeline::new(Config::default());
    let batch = fixture_batch();
    let output = pipeline.run(&batch).unwrap();

    let store = InMemoryDerivedStore::new();
    persist_output(&store, &output).await.unwrap();

    assert_eq!(store.equity_records().len(), batch.daily_equity.len());
    assert_eq!(store.daily_metrics().len(), batch.daily_equity.len());
    assert_eq!(store.scores().len(), 4);
    assert!(!store.alerts().is_empty());
    assert!(!store.behavior_alerts().is_empty());
    assert_eq!(store.behavior_summaries().len(), 4);

    // Derived fields reached the store
    let stored_equity = store.equity_records();
    let steady_last = stored_equity
        .iter()
        .filter(|r| r.strategy_code.as_str() == "steady")
        .next_back()
        .unwrap();
    assert!(steady_last.daily_return.is_some());
    assert!(steady_last.cumulative_return.is_some());
    assert!(steady_last.max_drawdown.is_some());
}

#[test]
fn snapshot_projects_the_run() {
    let pipeline = Pipeline::new(Config::default());
    let batch = fixture_batch();
    let output = pipeline.run(&batch).unwrap();

    let snapshot = build_snapshot(&output, &batch, 5);

    assert_eq!(snapshot.meta.latest_date, date(4));
    assert_eq!(snapshot.meta.strategy_count, 4);
    assert_eq!(snapshot.scores.len(), 4);
    // Latest-day risk row exists for every strategy that had equity rows
    assert_eq!(snapshot.risk.len(), 4);
    // Recent alerts are attached to the averager's behavior entry
    let averager = snapshot
        .behavior
        .iter()
        .find(|b| b.summary.strategy_code.as_str() == "averager")
        .unwrap();
    assert!(!averager.recent_alerts.is_empty());
    assert!(averager.recent_alerts.len() <= 5);
}

#[test]
fn batch_roundtrips_through_json_file() {
    let batch = fixture_batch();
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_string_pretty(&batch).unwrap()).unwrap();

    let loaded = load_batch(file.path()).unwrap();
    let pipeline = Pipeline::new(Config::default());

    let from_memory = pipeline.run(&batch).unwrap();
    let from_file = pipeline.run(&loaded).unwrap();

    assert_eq!(from_memory.scores, from_file.scores);
    assert_eq!(from_memory.daily_metrics, from_file.daily_metrics);
    assert_eq!(from_memory.behavior_alerts, from_file.behavior_alerts);
}

#[test]
fn conflicting_duplicate_excludes_only_that_strategy() {
    let mut batch = fixture_batch();
    // Re-ingested day 3 for "averager" disagrees on equity
    batch
        .daily_equity
        .push(equity_row("averager", 3, dec!(777_777), Decimal::ZERO, dec!(200_000)));

    let pipeline = Pipeline::new(Config::default());
    let output = pipeline.run(&batch).unwrap();

    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].strategy_code.as_str(), "averager");

    // The rest of the cohort still ranks 1..=2
    let mut ranks: Vec<u32> = output.scores.iter().filter_map(|s| s.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2]);
    assert!(
        !output
            .scores
            .iter()
            .any(|s| s.strategy_code.as_str() == "averager")
    );
}
