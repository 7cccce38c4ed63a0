//! Daily risk metrics derived from position snapshots.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::StrategyCode;

/// Risk metrics for one strategy on one trading day.
///
/// Recomputed deterministically from the day's position snapshots, trades
/// and equity record; safe to overwrite on rerun. Every ratio is `None`
/// when its denominator is zero or the day has no positions — a day
/// without data is not a day without risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRiskMetrics {
    /// Owning strategy.
    pub strategy_code: StrategyCode,
    /// Trading date the metrics describe.
    pub trade_date: NaiveDate,
    /// Margin used over equity.
    pub margin_ratio: Option<Decimal>,
    /// Sum of long-side market values.
    pub long_exposure: Decimal,
    /// Sum of short-side market values.
    pub short_exposure: Decimal,
    /// (long - short) exposure over equity.
    pub net_exposure: Option<Decimal>,
    /// (long + short) exposure over equity.
    pub gross_exposure: Option<Decimal>,
    /// Sum of absolute position values.
    pub total_position_value: Decimal,
    /// Largest contract's share of total position value.
    pub top1_concentration: Option<Decimal>,
    /// Top-3 contracts' share of total position value.
    pub top3_concentration: Option<Decimal>,
    /// Number of contracts held.
    pub position_count: u32,
    /// Number of fills executed.
    pub trade_count: u32,
    /// Total traded notional.
    pub turnover: Decimal,
}
