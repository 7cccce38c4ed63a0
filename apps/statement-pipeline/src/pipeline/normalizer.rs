//! Time-series normalization for per-strategy equity records.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::PipelineError;
use crate::models::{DailyEquityRecord, DateGap, StrategyCode};

/// A strategy's equity series after normalization.
///
/// Records are strictly ascending by date with at most one per day. Gaps
/// are reported, never filled: downstream scans must treat the prior
/// *available* record as "previous day", not the calendar-previous day.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    /// Owning strategy.
    pub strategy_code: StrategyCode,
    /// Ascending, deduplicated records.
    pub records: Vec<DailyEquityRecord>,
    /// Gaps wider than the configured tolerance.
    pub gaps: Vec<DateGap>,
}

/// Sort, deduplicate and gap-check one strategy's equity records.
///
/// Duplicates on (strategy, date) resolve silently to the most recently
/// ingested record (input order is ingestion order). Two records for the
/// same date that disagree on equity are an upstream defect and fail the
/// strategy with [`PipelineError::DuplicateDateConflict`].
///
/// # Errors
///
/// Returns `DuplicateDateConflict` on disagreeing same-date records.
pub fn normalize(
    strategy_code: &StrategyCode,
    records: Vec<DailyEquityRecord>,
    gap_days: i64,
) -> Result<NormalizedSeries, PipelineError> {
    let mut by_date: BTreeMap<chrono::NaiveDate, DailyEquityRecord> = BTreeMap::new();

    for record in records {
        match by_date.get(&record.trade_date) {
            Some(existing) if existing.equity != record.equity => {
                return Err(PipelineError::DuplicateDateConflict {
                    strategy: strategy_code.clone(),
                    trade_date: record.trade_date,
                });
            }
            _ => {
                // Later ingestion wins
                by_date.insert(record.trade_date, record);
            }
        }
    }

    let records: Vec<DailyEquityRecord> = by_date.into_values().collect();

    let mut gaps = Vec::new();
    for pair in records.windows(2) {
        let days = (pair[1].trade_date - pair[0].trade_date).num_days();
        if days > gap_days {
            warn!(
                strategy = %strategy_code,
                from = %pair[0].trade_date,
                to = %pair[1].trade_date,
                days,
                "gap in equity series"
            );
            gaps.push(DateGap {
                from: pair[0].trade_date,
                to: pair[1].trade_date,
                calendar_days: days,
            });
        }
    }

    Ok(NormalizedSeries {
        strategy_code: strategy_code.clone(),
        records,
        gaps,
    })
}
