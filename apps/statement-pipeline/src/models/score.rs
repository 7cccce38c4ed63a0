//! Per-strategy performance statistics and cohort scores.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::StrategyCode;

/// Summary statistics over a strategy's full return series.
///
/// Ratio fields are `None` where the metric is undefined (zero volatility,
/// zero drawdown, no valid returns) rather than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Compounded return over the whole series.
    pub total_return: Decimal,
    /// Linear annualization of total return by trading-day count.
    pub annualized_return: Decimal,
    /// Annualized standard deviation of daily returns.
    pub volatility: Option<Decimal>,
    /// Excess annualized return over annualized volatility.
    pub sharpe_ratio: Option<Decimal>,
    /// Worst peak-to-trough decline.
    pub max_drawdown: Decimal,
    /// Annualized return over max drawdown.
    pub calmar_ratio: Option<Decimal>,
    /// Share of positive daily returns among valid ones.
    pub win_rate: Option<Decimal>,
    /// Mean margin ratio across days with positive equity.
    pub avg_margin_ratio: Option<Decimal>,
    /// Number of records in the series.
    pub trading_days: u32,
}

/// Cohort-relative score for a strategy at a calculation date.
///
/// Statistics and scores are `None` for strategies with insufficient
/// history; such strategies are present in the output but carry no rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyScore {
    /// Scored strategy.
    pub strategy_code: StrategyCode,
    /// Date the cohort was scored.
    pub calc_date: NaiveDate,
    /// Underlying statistics, if computable.
    pub stats: Option<PerformanceStats>,
    /// Performance component, 0-100.
    pub performance_score: Option<Decimal>,
    /// Risk component, 0-100 (higher = lower risk).
    pub risk_score: Option<Decimal>,
    /// Blended total, 0-100.
    pub total_score: Option<Decimal>,
    /// Position in the cohort ranking, 1 = best. `None` when unscored.
    pub rank: Option<u32>,
}

impl StrategyScore {
    /// An unscored placeholder for a strategy excluded from ranking.
    #[must_use]
    pub const fn unscored(strategy_code: StrategyCode, calc_date: NaiveDate) -> Self {
        Self {
            strategy_code,
            calc_date,
            stats: None,
            performance_score: None,
            risk_score: None,
            total_score: None,
            rank: None,
        }
    }
}
