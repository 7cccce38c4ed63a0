//! Threshold alert generation.

use rust_decimal::Decimal;

use crate::config::{AlertThresholds, ThresholdPair};
use crate::models::{
    Alert, AlertLevel, AlertType, DailyRiskMetrics, PerformanceStats, StrategyCode,
};

/// Evaluate one metric against its threshold pair.
///
/// Danger is checked first; inside the normal band nothing is emitted —
/// absence of a record is the "all clear", there is no "ok" alert.
fn check(
    strategy_code: &StrategyCode,
    trade_date: chrono::NaiveDate,
    alert_type: AlertType,
    value: Option<Decimal>,
    pair: ThresholdPair,
) -> Option<Alert> {
    let value = value?;

    let (level, threshold) = if value >= pair.danger {
        (AlertLevel::Danger, pair.danger)
    } else if value >= pair.warning {
        (AlertLevel::Warning, pair.warning)
    } else {
        return None;
    };

    Some(Alert {
        strategy_code: strategy_code.clone(),
        trade_date,
        alert_type,
        alert_level: level,
        metric_value: value,
        threshold_value: threshold,
        message: format!("{alert_type} {value} breached {level} threshold {threshold}"),
    })
}

/// Generate alerts for one strategy from its latest risk metrics and
/// return statistics.
#[must_use]
pub fn evaluate(
    metrics: Option<&DailyRiskMetrics>,
    stats: Option<(&StrategyCode, chrono::NaiveDate, &PerformanceStats)>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(metrics) = metrics {
        alerts.extend(check(
            &metrics.strategy_code,
            metrics.trade_date,
            AlertType::MarginRatio,
            metrics.margin_ratio,
            thresholds.margin_ratio,
        ));
        alerts.extend(check(
            &metrics.strategy_code,
            metrics.trade_date,
            AlertType::GrossExposure,
            metrics.gross_exposure,
            thresholds.gross_exposure,
        ));
        alerts.extend(check(
            &metrics.strategy_code,
            metrics.trade_date,
            AlertType::Top1Concentration,
            metrics.top1_concentration,
            thresholds.top1_concentration,
        ));
    }

    if let Some((code, calc_date, stats)) = stats {
        alerts.extend(check(
            code,
            calc_date,
            AlertType::MaxDrawdown,
            Some(stats.max_drawdown),
            thresholds.max_drawdown,
        ));
    }

    alerts
}
