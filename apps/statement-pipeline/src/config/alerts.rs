//! Alert threshold configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Warning/danger threshold pair for one monitored metric.
///
/// Both thresholds are upper bounds: crossing `warning` emits a warning,
/// crossing `danger` emits a danger alert instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPair {
    /// Warning threshold (inclusive).
    pub warning: Decimal,
    /// Danger threshold (inclusive).
    pub danger: Decimal,
}

/// Threshold pairs for every monitored metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Margin used over equity.
    #[serde(default = "default_margin_ratio")]
    pub margin_ratio: ThresholdPair,
    /// Gross exposure over equity.
    #[serde(default = "default_gross_exposure")]
    pub gross_exposure: ThresholdPair,
    /// Largest contract's share of total position value.
    #[serde(default = "default_top1_concentration")]
    pub top1_concentration: ThresholdPair,
    /// Worst drawdown of the return series.
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: ThresholdPair,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            margin_ratio: default_margin_ratio(),
            gross_exposure: default_gross_exposure(),
            top1_concentration: default_top1_concentration(),
            max_drawdown: default_max_drawdown(),
        }
    }
}

fn default_margin_ratio() -> ThresholdPair {
    ThresholdPair {
        warning: Decimal::new(60, 2), // 60%
        danger: Decimal::new(80, 2),  // 80%
    }
}

fn default_gross_exposure() -> ThresholdPair {
    ThresholdPair {
        warning: Decimal::TWO,
        danger: Decimal::new(3, 0),
    }
}

fn default_top1_concentration() -> ThresholdPair {
    ThresholdPair {
        warning: Decimal::new(50, 2),
        danger: Decimal::new(70, 2),
    }
}

fn default_max_drawdown() -> ThresholdPair {
    ThresholdPair {
        warning: Decimal::new(10, 2),
        danger: Decimal::new(20, 2),
    }
}
