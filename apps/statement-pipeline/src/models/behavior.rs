//! Behavioral anomaly alerts and daily summaries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::StrategyCode;
use super::position::PositionSide;

/// Kind of detected behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorAlertType {
    /// Added to a position that was already at a floating loss.
    FloatingLossAdd,
    /// Added in the direction opposite to the settlement price move.
    CounterTrendAdd,
}

impl fmt::Display for BehaviorAlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloatingLossAdd => write!(f, "floating_loss_add"),
            Self::CounterTrendAdd => write!(f, "counter_trend_add"),
        }
    }
}

/// Severity band of a behavior alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Within the lowest band.
    Low,
    /// Exceeds the intermediate threshold.
    Medium,
    /// Exceeds the upper threshold.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Structured payload of a behavior alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorDetails {
    /// Details of a floating-loss add.
    FloatingLossAdd {
        /// Floating PnL of the contract at detection (negative).
        floating_pnl: Decimal,
        /// |floating_pnl| over margin (or position value).
        loss_ratio: Option<Decimal>,
        /// Lots added on the losing side.
        add_quantity: i64,
        /// Side the add happened on.
        add_direction: PositionSide,
        /// Market value of the position.
        position_value: Decimal,
    },
    /// Details of a counter-trend add.
    CounterTrendAdd {
        /// Side the add happened on.
        direction: PositionSide,
        /// Settlement price change versus the baseline day.
        price_change: Decimal,
        /// Price change as a fraction of the baseline settlement.
        change_pct: Decimal,
        /// Lots added.
        add_quantity: i64,
        /// Today's settlement price.
        settlement: Decimal,
        /// Baseline settlement price.
        prev_settlement: Decimal,
    },
}

/// An immutable detected behavior event.
///
/// Keyed by (strategy, trade_date, contract, alert_type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorAlert {
    /// Strategy the behavior was observed on.
    pub strategy_code: StrategyCode,
    /// Day the add happened.
    pub trade_date: NaiveDate,
    /// Kind of behavior.
    pub alert_type: BehaviorAlertType,
    /// Classified severity.
    pub severity: Severity,
    /// Contract the add happened on.
    pub contract: String,
    /// Human-readable one-line description.
    pub description: String,
    /// Structured event details.
    pub details: BehaviorDetails,
}

/// Daily aggregate of a strategy's behavior alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSummary {
    /// Summarized strategy.
    pub strategy_code: StrategyCode,
    /// Date the summary was computed for.
    pub calc_date: NaiveDate,
    /// Total alerts as of the calculation date.
    pub total_alerts: u32,
    /// Floating-loss adds.
    pub floating_loss_add_count: u32,
    /// Counter-trend adds.
    pub counter_trend_add_count: u32,
    /// Alerts classified high severity.
    pub high_severity_count: u32,
    /// Bounded 0-100 score; higher means riskier behavior.
    pub behavior_risk_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn alert_type_serde_snake_case() {
        let json = serde_json::to_string(&BehaviorAlertType::FloatingLossAdd).unwrap();
        assert_eq!(json, "\"floating_loss_add\"");
    }

    #[test]
    fn details_tagged_by_kind() {
        let details = BehaviorDetails::CounterTrendAdd {
            direction: PositionSide::Long,
            price_change: Decimal::new(-100, 0),
            change_pct: Decimal::new(-2, 2),
            add_quantity: 3,
            settlement: Decimal::new(4900, 0),
            prev_settlement: Decimal::new(5000, 0),
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"kind\":\"counter_trend_add\""));
    }
}
