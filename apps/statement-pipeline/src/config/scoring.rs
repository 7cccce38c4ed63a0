//! Scoring band configuration.
//!
//! Every sub-score is a linear clipped mapping from a raw metric onto
//! `0..=weight`. The breakpoints are policy, not physics: they ship as
//! configuration so they can be tuned and tested, never as literals inside
//! the score engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A linear clipped mapping from a metric to `0..=weight`.
///
/// `best` and `worst` are the metric values at which the band saturates.
/// `best < worst` is allowed and expresses "lower is better" (drawdown,
/// margin, volatility); the mapping is monotonic toward `best` either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Metric value mapped to the full weight.
    pub best: Decimal,
    /// Metric value mapped to zero.
    pub worst: Decimal,
    /// Points this band contributes at saturation.
    pub weight: Decimal,
}

impl ScoreBand {
    /// Map a metric value onto this band.
    ///
    /// A missing metric scores zero: an uncomputable statistic must never
    /// be rewarded with points.
    #[must_use]
    pub fn score(&self, value: Option<Decimal>) -> Decimal {
        let Some(value) = value else {
            return Decimal::ZERO;
        };
        let span = self.best - self.worst;
        if span == Decimal::ZERO {
            return Decimal::ZERO;
        }
        let fraction = (value - self.worst) / span;
        let clamped = fraction.clamp(Decimal::ZERO, Decimal::ONE);
        self.weight * clamped
    }
}

/// Bands making up the performance score (0-100 total).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceBands {
    /// Total return band.
    #[serde(default = "default_return_band")]
    pub total_return: ScoreBand,
    /// Sharpe ratio band.
    #[serde(default = "default_sharpe_band")]
    pub sharpe_ratio: ScoreBand,
    /// Max drawdown band (lower is better).
    #[serde(default = "default_perf_drawdown_band")]
    pub max_drawdown: ScoreBand,
    /// Win rate band.
    #[serde(default = "default_win_rate_band")]
    pub win_rate: ScoreBand,
}

impl Default for PerformanceBands {
    fn default() -> Self {
        Self {
            total_return: default_return_band(),
            sharpe_ratio: default_sharpe_band(),
            max_drawdown: default_perf_drawdown_band(),
            win_rate: default_win_rate_band(),
        }
    }
}

/// Bands making up the risk score (0-100 total, higher = lower risk).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBands {
    /// Average margin ratio band (lower is better).
    #[serde(default = "default_margin_band")]
    pub avg_margin_ratio: ScoreBand,
    /// Annualized volatility band (lower is better).
    #[serde(default = "default_volatility_band")]
    pub volatility: ScoreBand,
    /// Max drawdown band (lower is better).
    #[serde(default = "default_risk_drawdown_band")]
    pub max_drawdown: ScoreBand,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            avg_margin_ratio: default_margin_band(),
            volatility: default_volatility_band(),
            max_drawdown: default_risk_drawdown_band(),
        }
    }
}

/// Complete scoring policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    /// Performance sub-score bands.
    #[serde(default)]
    pub performance: PerformanceBands,
    /// Risk sub-score bands.
    #[serde(default)]
    pub risk: RiskBands,
}

fn default_return_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::new(15, 2),   // +15% total return
        worst: Decimal::new(-5, 2),  // -5%
        weight: Decimal::new(40, 0),
    }
}

fn default_sharpe_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::TWO,
        worst: Decimal::ZERO,
        weight: Decimal::new(30, 0),
    }
}

fn default_perf_drawdown_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::ZERO,
        worst: Decimal::new(20, 2), // 20% drawdown scores zero
        weight: Decimal::new(20, 0),
    }
}

fn default_win_rate_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::ONE,
        worst: Decimal::ZERO,
        weight: Decimal::new(10, 0),
    }
}

fn default_margin_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::ZERO,
        worst: Decimal::new(50, 2), // 50% margin occupancy scores zero
        weight: Decimal::new(40, 0),
    }
}

fn default_volatility_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::ZERO,
        worst: Decimal::new(50, 2),
        weight: Decimal::new(30, 0),
    }
}

fn default_risk_drawdown_band() -> ScoreBand {
    ScoreBand {
        best: Decimal::ZERO,
        worst: Decimal::new(20, 2),
        weight: Decimal::new(30, 0),
    }
}
