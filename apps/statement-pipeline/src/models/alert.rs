//! Threshold-breach alert records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::StrategyCode;

/// Metric monitored by the alert generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Margin used over equity.
    MarginRatio,
    /// Gross exposure over equity.
    GrossExposure,
    /// Largest contract's share of position value.
    Top1Concentration,
    /// Worst drawdown of the return series.
    MaxDrawdown,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarginRatio => write!(f, "margin_ratio"),
            Self::GrossExposure => write!(f, "gross_exposure"),
            Self::Top1Concentration => write!(f, "top1_concentration"),
            Self::MaxDrawdown => write!(f, "max_drawdown"),
        }
    }
}

/// Escalation level of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Warning threshold breached.
    Warning,
    /// Danger threshold breached.
    Danger,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A single threshold breach.
///
/// Keyed by (strategy, trade_date, alert_type). Absence of a record means
/// the metric stayed inside its normal band; there is no "ok" record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Strategy that breached.
    pub strategy_code: StrategyCode,
    /// Day the breach was observed.
    pub trade_date: NaiveDate,
    /// Which monitored metric breached.
    pub alert_type: AlertType,
    /// Warning or danger.
    pub alert_level: AlertLevel,
    /// The observed metric value.
    pub metric_value: Decimal,
    /// The threshold that was crossed.
    pub threshold_value: Decimal,
    /// Human-readable description.
    pub message: String,
}
