//! Behavior detection thresholds and summary weights.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Severity;

/// Two-threshold severity classification.
///
/// Values above `high` classify high, above `medium` classify medium,
/// everything else low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBands {
    /// High-severity threshold (exclusive).
    pub high: Decimal,
    /// Medium-severity threshold (exclusive).
    pub medium: Decimal,
}

impl SeverityBands {
    /// Classify a magnitude. A missing magnitude falls to low.
    #[must_use]
    pub fn classify(&self, magnitude: Option<Decimal>) -> Severity {
        match magnitude {
            Some(m) if m > self.high => Severity::High,
            Some(m) if m > self.medium => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// Weights of the 0-100 behavior risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorScoreWeights {
    /// Points per floating-loss add.
    #[serde(default = "default_floating_loss_weight")]
    pub floating_loss_add: u32,
    /// Points per counter-trend add.
    #[serde(default = "default_counter_trend_weight")]
    pub counter_trend_add: u32,
    /// Extra points per high-severity alert.
    #[serde(default = "default_high_severity_weight")]
    pub high_severity: u32,
}

impl Default for BehaviorScoreWeights {
    fn default() -> Self {
        Self {
            floating_loss_add: default_floating_loss_weight(),
            counter_trend_add: default_counter_trend_weight(),
            high_severity: default_high_severity_weight(),
        }
    }
}

/// Behavior detector policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Severity bands over the loss ratio of a floating-loss add.
    #[serde(default = "default_loss_ratio_bands")]
    pub loss_ratio: SeverityBands,
    /// Severity bands over |change_pct| of a counter-trend add.
    #[serde(default = "default_change_pct_bands")]
    pub change_pct: SeverityBands,
    /// Risk score weights.
    #[serde(default)]
    pub score_weights: BehaviorScoreWeights,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            loss_ratio: default_loss_ratio_bands(),
            change_pct: default_change_pct_bands(),
            score_weights: BehaviorScoreWeights::default(),
        }
    }
}

fn default_loss_ratio_bands() -> SeverityBands {
    SeverityBands {
        high: Decimal::new(5, 2),   // 5% floating loss
        medium: Decimal::new(2, 2), // 2%
    }
}

fn default_change_pct_bands() -> SeverityBands {
    SeverityBands {
        high: Decimal::new(3, 2),    // 3% adverse move
        medium: Decimal::new(15, 3), // 1.5%
    }
}

const fn default_floating_loss_weight() -> u32 {
    5
}

const fn default_counter_trend_weight() -> u32 {
    3
}

const fn default_high_severity_weight() -> u32 {
    10
}
