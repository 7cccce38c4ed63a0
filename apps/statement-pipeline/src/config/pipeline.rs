//! General pipeline parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters shared across pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Annual risk-free rate used in the Sharpe ratio.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Decimal,
    /// Trading days per year for annualization.
    #[serde(default = "default_trading_days_per_year")]
    pub trading_days_per_year: u32,
    /// Minimum equity records before a strategy can be scored.
    #[serde(default = "default_min_observations")]
    pub min_observations: u32,
    /// Calendar-day distance between consecutive records that counts as a gap.
    /// The default tolerates a weekend plus one holiday.
    #[serde(default = "default_gap_days")]
    pub gap_days: i64,
    /// Below this cohort size the runner stays sequential.
    #[serde(default = "default_min_parallel_strategies")]
    pub min_parallel_strategies: usize,
    /// Maximum recent behavior alerts carried per strategy in the snapshot.
    #[serde(default = "default_recent_alerts_limit")]
    pub recent_alerts_limit: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            trading_days_per_year: default_trading_days_per_year(),
            min_observations: default_min_observations(),
            gap_days: default_gap_days(),
            min_parallel_strategies: default_min_parallel_strategies(),
            recent_alerts_limit: default_recent_alerts_limit(),
        }
    }
}

fn default_risk_free_rate() -> Decimal {
    Decimal::new(3, 2) // 3% annualized
}

const fn default_trading_days_per_year() -> u32 {
    252
}

const fn default_min_observations() -> u32 {
    2
}

const fn default_gap_days() -> i64 {
    4
}

const fn default_min_parallel_strategies() -> usize {
    4
}

const fn default_recent_alerts_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let params = PipelineParams::default();
        assert_eq!(params.risk_free_rate, Decimal::new(3, 2));
        assert_eq!(params.trading_days_per_year, 252);
        assert_eq!(params.min_observations, 2);
        assert_eq!(params.recent_alerts_limit, 5);
    }
}
