//! Daily risk metrics from position snapshots.

use rust_decimal::Decimal;
use tracing::debug;

use super::math::ratio_or_none;
use crate::models::{DailyEquityRecord, DailyRiskMetrics, PositionSnapshot, TradeFill};

/// Compute one day's risk metrics for a strategy.
///
/// `positions` and `trades` must already be filtered to the equity
/// record's (strategy, trade_date). Exposure uses side quantity times
/// settlement; concentration uses absolute position values per contract.
/// Every ratio degrades to `None` on a zero denominator.
#[must_use]
pub fn compute_daily_metrics(
    equity: &DailyEquityRecord,
    positions: &[&PositionSnapshot],
    trades: &[&TradeFill],
) -> DailyRiskMetrics {
    let long_exposure: Decimal = positions.iter().map(|p| p.long_value()).sum();
    let short_exposure: Decimal = positions.iter().map(|p| p.short_value()).sum();

    let margin_ratio = equity.margin_ratio();
    if margin_ratio.is_none() {
        debug!(
            strategy = %equity.strategy_code,
            date = %equity.trade_date,
            "non-positive equity, ratio metrics undefined"
        );
    }

    let net_exposure = ratio_or_none(long_exposure - short_exposure, equity.equity);
    let gross_exposure = ratio_or_none(long_exposure + short_exposure, equity.equity);

    let mut values: Vec<Decimal> = positions.iter().map(|p| p.position_value.abs()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    let total_position_value: Decimal = values.iter().sum();

    let (top1_concentration, top3_concentration) = if values.is_empty() {
        (None, None)
    } else {
        let top3: Decimal = values.iter().take(3).sum();
        (
            ratio_or_none(values[0], total_position_value),
            ratio_or_none(top3, total_position_value),
        )
    };

    DailyRiskMetrics {
        strategy_code: equity.strategy_code.clone(),
        trade_date: equity.trade_date,
        margin_ratio,
        long_exposure,
        short_exposure,
        net_exposure,
        gross_exposure,
        total_position_value,
        top1_concentration,
        top3_concentration,
        position_count: positions.len() as u32,
        trade_count: trades.len() as u32,
        turnover: trades.iter().map(|t| t.amount).sum(),
    }
}
