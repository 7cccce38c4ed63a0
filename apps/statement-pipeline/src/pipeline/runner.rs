//! Pipeline orchestration.
//!
//! Per-strategy derivations are independent and run on a rayon parallel
//! iterator; the cohort-wide ranking step is the single synchronization
//! barrier, evaluated after every strategy's statistics are in. One
//! strategy's data defect never aborts the cohort: failed strategies are
//! collected and reported alongside the results.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{Level, info, span, warn};
use uuid::Uuid;

use super::{alerts, behavior, drawdown, normalizer, returns, risk_metrics, scoring};
use crate::config::Config;
use crate::error::PipelineError;
use crate::ingest::StatementBatch;
use crate::models::{
    Alert, BehaviorAlert, BehaviorSummary, DailyEquityRecord, DailyRiskMetrics, DateGap,
    PerformanceStats, StrategyCode, StrategyScore,
};

/// A strategy excluded from the run by a data-quality error.
#[derive(Debug, Clone)]
pub struct StrategyFailure {
    /// The excluded strategy.
    pub strategy_code: StrategyCode,
    /// What went wrong.
    pub reason: String,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Run identifier for log correlation.
    pub run_id: Uuid,
    /// The cohort's calculation date (latest equity date in the batch).
    pub calc_date: NaiveDate,
    /// Derived equity series per strategy.
    pub equity_series: BTreeMap<StrategyCode, Vec<DailyEquityRecord>>,
    /// Gaps detected during normalization, per strategy.
    pub gaps: BTreeMap<StrategyCode, Vec<DateGap>>,
    /// Daily risk metrics for every (strategy, day).
    pub daily_metrics: Vec<DailyRiskMetrics>,
    /// Cohort scores, ranked entries first.
    pub scores: Vec<StrategyScore>,
    /// Threshold alerts.
    pub alerts: Vec<Alert>,
    /// Behavior alerts.
    pub behavior_alerts: Vec<BehaviorAlert>,
    /// Daily behavior summaries.
    pub behavior_summaries: Vec<BehaviorSummary>,
    /// Strategies excluded by data-quality errors.
    pub failures: Vec<StrategyFailure>,
}

/// Per-strategy intermediate result, produced before the ranking barrier.
struct StrategyDerived {
    code: StrategyCode,
    records: Vec<DailyEquityRecord>,
    gaps: Vec<DateGap>,
    stats: Option<PerformanceStats>,
    daily_metrics: Vec<DailyRiskMetrics>,
    behavior_alerts: Vec<BehaviorAlert>,
}

/// The statement pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full pipeline over an immutable input batch.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Ingest`] when the batch holds no equity
    /// records; per-strategy data defects are reported in
    /// [`PipelineOutput::failures`], never as an `Err`.
    pub fn run(&self, batch: &StatementBatch) -> Result<PipelineOutput, PipelineError> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();

        let calc_date = batch
            .latest_date()
            .ok_or_else(|| PipelineError::Ingest("statement batch has no equity records".into()))?;

        let codes = batch.strategy_codes();
        info!(
            %run_id,
            %calc_date,
            strategies = codes.len(),
            "starting pipeline run"
        );

        let outcomes: Vec<Result<StrategyDerived, StrategyFailure>> =
            if codes.len() >= self.config.pipeline.min_parallel_strategies {
                codes
                    .par_iter()
                    .map(|code| self.process_strategy(code, batch))
                    .collect()
            } else {
                codes
                    .iter()
                    .map(|code| self.process_strategy(code, batch))
                    .collect()
            };

        let mut derived = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(d) => derived.push(d),
                Err(f) => failures.push(f),
            }
        }

        // Ranking is the synchronization barrier: it needs the whole
        // cohort's statistics at once.
        let cohort: Vec<(StrategyCode, Option<PerformanceStats>)> = derived
            .iter()
            .map(|d| (d.code.clone(), d.stats.clone()))
            .collect();
        let scores = scoring::rank_cohort(cohort, calc_date, &self.config.scoring);

        let mut output = PipelineOutput {
            run_id,
            calc_date,
            equity_series: BTreeMap::new(),
            gaps: BTreeMap::new(),
            daily_metrics: Vec::new(),
            scores,
            alerts: Vec::new(),
            behavior_alerts: Vec::new(),
            behavior_summaries: Vec::new(),
            failures,
        };

        for d in derived {
            let latest_metrics = d.daily_metrics.last();
            output.alerts.extend(alerts::evaluate(
                latest_metrics,
                d.stats.as_ref().map(|s| (&d.code, calc_date, s)),
                &self.config.alerts,
            ));

            output.behavior_summaries.push(behavior::summarize(
                &d.code,
                calc_date,
                &d.behavior_alerts,
                &self.config.behavior.score_weights,
            ));

            output.daily_metrics.extend(d.daily_metrics);
            output.behavior_alerts.extend(d.behavior_alerts);
            output.gaps.insert(d.code.clone(), d.gaps);
            output.equity_series.insert(d.code, d.records);
        }

        info!(
            %run_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            scored = output.scores.iter().filter(|s| s.rank.is_some()).count(),
            failed = output.failures.len(),
            alerts = output.alerts.len(),
            behavior_alerts = output.behavior_alerts.len(),
            "pipeline run complete"
        );

        Ok(output)
    }

    /// Run every per-strategy stage for one strategy.
    fn process_strategy(
        &self,
        code: &StrategyCode,
        batch: &StatementBatch,
    ) -> Result<StrategyDerived, StrategyFailure> {
        let _span = span!(Level::DEBUG, "strategy_pipeline", strategy = %code).entered();

        let series = normalizer::normalize(
            code,
            batch.equity_for(code),
            self.config.pipeline.gap_days,
        )
        .map_err(|e| {
            warn!(strategy = %code, error = %e, "strategy excluded from run");
            StrategyFailure {
                strategy_code: code.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut records = series.records;
        returns::compute_returns(&mut records);
        drawdown::compute_drawdowns(&mut records);

        let positions = batch.positions_for(code);
        let trades = batch.trades_for(code);

        let daily_metrics: Vec<DailyRiskMetrics> = records
            .iter()
            .map(|record| {
                let day_positions: Vec<_> = positions
                    .iter()
                    .filter(|p| p.trade_date == record.trade_date)
                    .collect();
                let day_trades: Vec<_> = trades
                    .iter()
                    .filter(|t| t.trade_date == record.trade_date)
                    .collect();
                risk_metrics::compute_daily_metrics(record, &day_positions, &day_trades)
            })
            .collect();

        let behavior_alerts = behavior::detect(code, &positions, &self.config.behavior);

        let stats = match scoring::compute_stats(code, &records, &self.config.pipeline) {
            Ok(stats) => Some(stats),
            Err(e) => {
                // Not enough history: the strategy stays in the output,
                // unscored and unranked.
                info!(strategy = %code, reason = %e, "strategy not scored");
                None
            }
        };

        Ok(StrategyDerived {
            code: code.clone(),
            records,
            gaps: series.gaps,
            stats,
            daily_metrics,
            behavior_alerts,
        })
    }
}
