//! Statement batch loading.
//!
//! The parsing of broker statements happens upstream; this boundary
//! consumes its output — a JSON document of validated per-day records —
//! and groups rows for the pipeline. Row order within the document is
//! ingestion order, which the normalizer uses to resolve same-day
//! duplicates.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PipelineError;
use crate::models::{
    DailyEquityRecord, PositionSnapshot, StrategyAccount, StrategyCode, TradeFill,
};

/// One run's immutable input snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementBatch {
    /// Known strategy accounts. Strategies appearing only in the record
    /// rows are added implicitly.
    #[serde(default)]
    pub accounts: Vec<StrategyAccount>,
    /// Daily equity rows, all strategies mixed.
    #[serde(default)]
    pub daily_equity: Vec<DailyEquityRecord>,
    /// Position snapshot rows.
    #[serde(default)]
    pub positions: Vec<PositionSnapshot>,
    /// Trade fill rows.
    #[serde(default)]
    pub trades: Vec<TradeFill>,
}

impl StatementBatch {
    /// Every strategy present in the batch, sorted by code.
    #[must_use]
    pub fn strategy_codes(&self) -> Vec<StrategyCode> {
        let mut codes: BTreeSet<StrategyCode> = self
            .accounts
            .iter()
            .map(|a| a.code.clone())
            .collect();
        codes.extend(self.daily_equity.iter().map(|r| r.strategy_code.clone()));
        codes.extend(self.positions.iter().map(|p| p.strategy_code.clone()));
        codes.extend(self.trades.iter().map(|t| t.strategy_code.clone()));
        codes.into_iter().collect()
    }

    /// Equity rows belonging to one strategy, in ingestion order.
    #[must_use]
    pub fn equity_for(&self, code: &StrategyCode) -> Vec<DailyEquityRecord> {
        self.daily_equity
            .iter()
            .filter(|r| &r.strategy_code == code)
            .cloned()
            .collect()
    }

    /// Position rows belonging to one strategy.
    #[must_use]
    pub fn positions_for(&self, code: &StrategyCode) -> Vec<PositionSnapshot> {
        self.positions
            .iter()
            .filter(|p| &p.strategy_code == code)
            .cloned()
            .collect()
    }

    /// Trade rows belonging to one strategy.
    #[must_use]
    pub fn trades_for(&self, code: &StrategyCode) -> Vec<TradeFill> {
        self.trades
            .iter()
            .filter(|t| &t.strategy_code == code)
            .cloned()
            .collect()
    }

    /// Latest trade date across all equity rows.
    #[must_use]
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.daily_equity.iter().map(|r| r.trade_date).max()
    }
}

/// Load a statement batch from a JSON file.
///
/// # Errors
///
/// Returns [`PipelineError::Ingest`] when the file cannot be read or
/// decoded.
pub fn load_batch(path: &Path) -> Result<StatementBatch, PipelineError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Ingest(format!("read {}: {e}", path.display())))?;

    let batch: StatementBatch = serde_json::from_str(&contents)
        .map_err(|e| PipelineError::Ingest(format!("decode {}: {e}", path.display())))?;

    info!(
        strategies = batch.strategy_codes().len(),
        equity_rows = batch.daily_equity.len(),
        position_rows = batch.positions.len(),
        trade_rows = batch.trades.len(),
        "loaded statement batch"
    );

    Ok(batch)
}
