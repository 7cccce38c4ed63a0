//! Read-only dashboard projection.
//!
//! Aggregates one run's results into a single document for the monitoring
//! dashboard: latest scores, latest per-strategy risk metrics, the full
//! derived equity series, the latest day's positions and per-strategy
//! behavior summaries with a bounded tail of recent alerts. This is a
//! projection of pipeline output, not part of the write contract.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ingest::StatementBatch;
use crate::models::{
    BehaviorAlert, BehaviorSummary, DailyEquityRecord, DailyRiskMetrics, PositionSnapshot,
    StrategyCode, StrategyScore,
};
use crate::pipeline::PipelineOutput;

/// A strategy's behavior block in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorEntry {
    /// Daily summary.
    pub summary: BehaviorSummary,
    /// Most recent alerts, newest first, bounded by configuration.
    pub recent_alerts: Vec<BehaviorAlert>,
}

/// Counts describing the snapshot itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Latest trade date covered.
    pub latest_date: NaiveDate,
    /// Strategies in the cohort.
    pub strategy_count: usize,
    /// Equity records carried.
    pub equity_records: usize,
    /// Position rows on the latest day.
    pub position_records: usize,
    /// Trade rows in the source batch.
    pub trade_records: usize,
}

/// The consumer-facing snapshot document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Cohort scores, ranked entries first.
    pub scores: Vec<StrategyScore>,
    /// Latest risk metrics per strategy.
    pub risk: Vec<DailyRiskMetrics>,
    /// Full derived equity series, strategy then date order.
    pub equity: Vec<DailyEquityRecord>,
    /// Position snapshots for the latest trade date.
    pub positions: Vec<PositionSnapshot>,
    /// Behavior summaries with recent alerts.
    pub behavior: Vec<BehaviorEntry>,
    /// Snapshot metadata.
    pub meta: SnapshotMeta,
}

/// Build the dashboard snapshot from a run's output and its input batch.
#[must_use]
pub fn build_snapshot(
    output: &PipelineOutput,
    batch: &StatementBatch,
    recent_alerts_limit: usize,
) -> DashboardSnapshot {
    let risk: Vec<DailyRiskMetrics> = {
        let mut latest: BTreeMap<&StrategyCode, &DailyRiskMetrics> = BTreeMap::new();
        for metrics in &output.daily_metrics {
            let entry = latest.entry(&metrics.strategy_code).or_insert(metrics);
            if metrics.trade_date > entry.trade_date {
                *entry = metrics;
            }
        }
        latest.into_values().cloned().collect()
    };

    let equity: Vec<DailyEquityRecord> = output
        .equity_series
        .values()
        .flat_map(|records| records.iter().cloned())
        .collect();

    let positions: Vec<PositionSnapshot> = batch
        .positions
        .iter()
        .filter(|p| p.trade_date == output.calc_date)
        .cloned()
        .collect();

    let mut alerts_by_strategy: BTreeMap<&StrategyCode, Vec<&BehaviorAlert>> = BTreeMap::new();
    for alert in &output.behavior_alerts {
        alerts_by_strategy
            .entry(&alert.strategy_code)
            .or_default()
            .push(alert);
    }

    let behavior: Vec<BehaviorEntry> = output
        .behavior_summaries
        .iter()
        .map(|summary| {
            let mut recent: Vec<&BehaviorAlert> = alerts_by_strategy
                .get(&summary.strategy_code)
                .map(|alerts| alerts.clone())
                .unwrap_or_default();
            // Newest first; worst first within a day
            recent.sort_by(|a, b| {
                b.trade_date
                    .cmp(&a.trade_date)
                    .then_with(|| b.severity.cmp(&a.severity))
            });
            BehaviorEntry {
                summary: summary.clone(),
                recent_alerts: recent
                    .into_iter()
                    .take(recent_alerts_limit)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    let meta = SnapshotMeta {
        latest_date: output.calc_date,
        strategy_count: output.scores.len(),
        equity_records: equity.len(),
        position_records: positions.len(),
        trade_records: batch.trades.len(),
    };

    DashboardSnapshot {
        scores: output.scores.clone(),
        risk,
        equity,
        positions,
        behavior,
        meta,
    }
}
