//! Persistence boundary for pipeline outputs.
//!
//! The pipeline writes through the [`DerivedStore`] port; every write is
//! an upsert keyed by the record's natural key, so reruns for the same
//! dates are idempotent. The real database adapter lives with the
//! downstream service; this crate ships the in-memory implementation used
//! by tests and the CLI.

pub mod in_memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Alert, BehaviorAlert, BehaviorSummary, DailyEquityRecord, DailyRiskMetrics, StrategyScore,
};
use crate::pipeline::PipelineOutput;

pub use in_memory::InMemoryDerivedStore;

/// Errors from the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected a write.
    #[error("store write failed: {0}")]
    WriteFailed(String),
}

/// Write port for everything the pipeline derives.
///
/// All writes are upserts by natural key; implementations must make a
/// rerun with identical input leave identical state.
#[async_trait]
pub trait DerivedStore: Send + Sync {
    /// Upsert derived equity records, keyed by (strategy, trade_date).
    async fn upsert_equity_series(&self, records: &[DailyEquityRecord]) -> Result<(), StoreError>;

    /// Upsert daily risk metrics, keyed by (strategy, trade_date).
    async fn upsert_daily_metrics(&self, metrics: &[DailyRiskMetrics]) -> Result<(), StoreError>;

    /// Upsert cohort scores, keyed by (strategy, calc_date).
    async fn upsert_scores(&self, scores: &[StrategyScore]) -> Result<(), StoreError>;

    /// Upsert threshold alerts, keyed by (strategy, trade_date, alert_type).
    async fn upsert_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError>;

    /// Upsert behavior alerts, keyed by
    /// (strategy, trade_date, contract, alert_type).
    async fn upsert_behavior_alerts(&self, alerts: &[BehaviorAlert]) -> Result<(), StoreError>;

    /// Upsert behavior summaries, keyed by (strategy, calc_date).
    async fn upsert_behavior_summaries(
        &self,
        summaries: &[BehaviorSummary],
    ) -> Result<(), StoreError>;
}

/// Persist a whole pipeline output through a store.
///
/// # Errors
///
/// Propagates the first failed write.
pub async fn persist_output<S: DerivedStore + ?Sized>(
    store: &S,
    output: &PipelineOutput,
) -> Result<(), StoreError> {
    for records in output.equity_series.values() {
        store.upsert_equity_series(records).await?;
    }
    store.upsert_daily_metrics(&output.daily_metrics).await?;
    store.upsert_scores(&output.scores).await?;
    store.upsert_alerts(&output.alerts).await?;
    store.upsert_behavior_alerts(&output.behavior_alerts).await?;
    store
        .upsert_behavior_summaries(&output.behavior_summaries)
        .await?;
    Ok(())
}
