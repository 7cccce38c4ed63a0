//! Error taxonomy for the statement pipeline.
//!
//! Two classes of failure exist and they propagate differently:
//!
//! - **Per-strategy data-quality errors** (`DuplicateDateConflict`,
//!   `ScoringInputIncomplete`) exclude one strategy from part or all of a
//!   run; the rest of the cohort proceeds.
//! - **Infrastructure errors** (`Ingest`, `Storage`, `Config`) abort the
//!   whole batch.
//!
//! Missing baselines and zero denominators are not errors at all: the
//! affected derived value is `None` and the fact is logged where it
//! occurs.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::StrategyCode;

/// Errors raised by the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two ingested records for the same (strategy, date) disagree on
    /// equity. Signals an upstream ingestion defect; the strategy is
    /// excluded from the run.
    #[error("Conflicting equity records for strategy '{strategy}' on {trade_date}")]
    DuplicateDateConflict {
        /// Strategy with conflicting records.
        strategy: StrategyCode,
        /// The duplicated date.
        trade_date: NaiveDate,
    },

    /// A strategy lacks the history needed for scoring. The strategy is
    /// reported unscored; this is surfaced only to callers probing a
    /// single strategy.
    #[error(
        "Strategy '{strategy}' has insufficient history for scoring \
         ({observations} records, {valid_returns} valid returns)"
    )]
    ScoringInputIncomplete {
        /// The unscorable strategy.
        strategy: StrategyCode,
        /// Records available.
        observations: u32,
        /// Non-null daily returns available.
        valid_returns: u32,
    },

    /// The statement batch could not be read or decoded.
    #[error("Failed to load statement batch: {0}")]
    Ingest(String),

    /// The derived store rejected a write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl PipelineError {
    /// Whether the error poisons the whole batch rather than one strategy.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Ingest(_) | Self::Storage(_) | Self::Config(_))
    }
}
