//! Per-strategy statistics, composite scoring and cohort ranking.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::math::{mean, ratio_or_none, sqrt_decimal, std_dev};
use crate::config::{PipelineParams, ScoringConfig};
use crate::error::PipelineError;
use crate::models::{DailyEquityRecord, PerformanceStats, StrategyCode, StrategyScore};

/// Compute summary statistics over a derived equity series.
///
/// The series must already carry the derived return/drawdown fields.
///
/// # Errors
///
/// Returns [`PipelineError::ScoringInputIncomplete`] when the series has
/// fewer than `min_observations` records or fewer than two valid daily
/// returns; such strategies appear in output unscored.
pub fn compute_stats(
    strategy_code: &StrategyCode,
    records: &[DailyEquityRecord],
    params: &PipelineParams,
) -> Result<PerformanceStats, PipelineError> {
    let observations = records.len() as u32;
    let valid_returns: Vec<Decimal> = records.iter().filter_map(|r| r.daily_return).collect();

    if observations < params.min_observations || valid_returns.len() < 2 {
        return Err(PipelineError::ScoringInputIncomplete {
            strategy: strategy_code.clone(),
            observations,
            valid_returns: valid_returns.len() as u32,
        });
    }

    let total_return = records
        .last()
        .and_then(|r| r.cumulative_return)
        .unwrap_or(Decimal::ZERO);

    // Linear annualization by trading-day count, deliberately not
    // geometric: this matches the statement-report formula the scores are
    // calibrated against.
    let trading_days = Decimal::from(params.trading_days_per_year);
    let annualized_return = total_return * trading_days / Decimal::from(observations);

    let volatility = std_dev(&valid_returns)
        .zip(sqrt_decimal(trading_days))
        .map(|(daily_std, annualizer)| daily_std * annualizer);

    let sharpe_ratio = volatility.and_then(|vol| {
        ratio_or_none(annualized_return - params.risk_free_rate, vol)
    });

    let max_drawdown = records
        .last()
        .and_then(|r| r.max_drawdown)
        .unwrap_or(Decimal::ZERO);

    let calmar_ratio = ratio_or_none(annualized_return, max_drawdown);

    let wins = valid_returns.iter().filter(|r| **r > Decimal::ZERO).count();
    let win_rate = ratio_or_none(Decimal::from(wins as u64), Decimal::from(valid_returns.len() as u64));

    let margin_ratios: Vec<Decimal> = records.iter().filter_map(|r| r.margin_ratio()).collect();
    let avg_margin_ratio = mean(&margin_ratios);

    Ok(PerformanceStats {
        total_return,
        annualized_return,
        volatility,
        sharpe_ratio,
        max_drawdown,
        calmar_ratio,
        win_rate,
        avg_margin_ratio,
        trading_days: observations,
    })
}

/// Composite score components for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeScore {
    /// Performance component, 0-100.
    pub performance: Decimal,
    /// Risk component, 0-100.
    pub risk: Decimal,
    /// Blend of the two, 0-100.
    pub total: Decimal,
}

/// Map statistics onto the configured scoring bands.
#[must_use]
pub fn score_stats(stats: &PerformanceStats, config: &ScoringConfig) -> CompositeScore {
    let perf = &config.performance;
    let performance = perf.total_return.score(Some(stats.total_return))
        + perf.sharpe_ratio.score(stats.sharpe_ratio)
        + perf.max_drawdown.score(Some(stats.max_drawdown))
        + perf.win_rate.score(stats.win_rate);

    let risk_bands = &config.risk;
    let risk = risk_bands.avg_margin_ratio.score(stats.avg_margin_ratio)
        + risk_bands.volatility.score(stats.volatility)
        + risk_bands.max_drawdown.score(Some(stats.max_drawdown));

    let total = (performance + risk) / Decimal::TWO;

    CompositeScore {
        performance,
        risk,
        total,
    }
}

/// Rank a cohort of strategies for a calculation date.
///
/// Scored strategies are ordered by total score descending, ties broken by
/// strategy code ascending, and assigned ranks `1..=N` bijectively.
/// Unscored strategies follow, rank-less, in code order — present in the
/// output so the consumer can tell "excluded" from "missing".
#[must_use]
pub fn rank_cohort(
    cohort: Vec<(StrategyCode, Option<PerformanceStats>)>,
    calc_date: NaiveDate,
    config: &ScoringConfig,
) -> Vec<StrategyScore> {
    let mut scored = Vec::new();
    let mut unscored = Vec::new();

    for (code, stats) in cohort {
        match stats {
            Some(stats) => {
                let composite = score_stats(&stats, config);
                scored.push((code, stats, composite));
            }
            None => unscored.push(StrategyScore::unscored(code, calc_date)),
        }
    }

    scored.sort_by(|a, b| b.2.total.cmp(&a.2.total).then_with(|| a.0.cmp(&b.0)));
    unscored.sort_by(|a, b| a.strategy_code.cmp(&b.strategy_code));

    let mut out: Vec<StrategyScore> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (code, stats, composite))| StrategyScore {
            strategy_code: code,
            calc_date,
            stats: Some(stats),
            performance_score: Some(composite.performance),
            risk_score: Some(composite.risk),
            total_score: Some(composite.total),
            rank: Some(i as u32 + 1),
        })
        .collect();

    out.extend(unscored);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::drawdown::compute_drawdowns;
    use crate::pipeline::returns::compute_returns;
    use rust_decimal_macros::dec;

    fn derived_series(code: &str, equities: &[Decimal]) -> Vec<DailyEquityRecord> {
        let mut records: Vec<DailyEquityRecord> = equities
            .iter()
            .enumerate()
            .map(|(i, equity)| DailyEquityRecord {
                strategy_code: StrategyCode::new(code),
                trade_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
                    + chrono::Days::new(i as u64),
                prev_balance: Decimal::ZERO,
                deposit_withdraw: Decimal::ZERO,
                realized_pnl: Decimal::ZERO,
                commission: Decimal::ZERO,
                current_balance: *equity,
                floating_pnl: Decimal::ZERO,
                equity: *equity,
                margin_used: *equity * dec!(0.2),
                available_funds: Decimal::ZERO,
                risk_degree: Decimal::ZERO,
                daily_return: None,
                cumulative_return: None,
                drawdown: None,
                max_drawdown: None,
            })
            .collect();
        compute_returns(&mut records);
        compute_drawdowns(&mut records);
        records
    }

    fn params() -> PipelineParams {
        PipelineParams::default()
    }

    #[test]
    fn linear_annualization_is_preserved() {
        // total_return 0.10 over 100 trading days -> 0.252
        let stats = PerformanceStats {
            total_return: dec!(0.10),
            annualized_return: dec!(0.10) * dec!(252) / dec!(100),
            volatility: None,
            sharpe_ratio: None,
            max_drawdown: Decimal::ZERO,
            calmar_ratio: None,
            win_rate: None,
            avg_margin_ratio: None,
            trading_days: 100,
        };
        assert_eq!(stats.annualized_return, dec!(0.252));
    }

    #[test]
    fn sharpe_from_annualized_inputs() {
        // (0.252 - 0.03) / 0.15 ~= 1.48
        let sharpe = ratio_or_none(dec!(0.252) - dec!(0.03), dec!(0.15)).unwrap();
        assert!((sharpe - dec!(1.48)).abs() < dec!(0.001));
    }

    #[test]
    fn stats_over_simple_series() {
        let records = derived_series("s1", &[dec!(100), dec!(110), dec!(99), dec!(105)]);
        let stats = compute_stats(&StrategyCode::new("s1"), &records, &params()).unwrap();

        assert_eq!(stats.trading_days, 4);
        // 3 valid returns: +10%, -10%, +6.06..%
        assert_eq!(stats.win_rate, Some(dec!(2) / dec!(3)));
        assert!(stats.volatility.is_some());
        assert!(stats.sharpe_ratio.is_some());
        assert!(stats.max_drawdown > Decimal::ZERO);
        assert!(stats.calmar_ratio.is_some());
        assert_eq!(stats.avg_margin_ratio, Some(dec!(0.2)));
    }

    #[test]
    fn short_series_is_incomplete() {
        let records = derived_series("s1", &[dec!(100)]);
        let result = compute_stats(&StrategyCode::new("s1"), &records, &params());
        assert!(matches!(
            result,
            Err(PipelineError::ScoringInputIncomplete { .. })
        ));
    }

    #[test]
    fn flat_series_has_no_sharpe() {
        let records = derived_series("s1", &[dec!(100), dec!(100), dec!(100)]);
        let stats = compute_stats(&StrategyCode::new("s1"), &records, &params()).unwrap();

        // Zero volatility: Sharpe undefined, not infinite
        assert_eq!(stats.volatility, Some(Decimal::ZERO));
        assert_eq!(stats.sharpe_ratio, None);
        // Zero drawdown: Calmar undefined
        assert_eq!(stats.calmar_ratio, None);
    }

    #[test]
    fn total_blends_components_equally() {
        let records = derived_series("s1", &[dec!(100), dec!(103), dec!(106)]);
        let stats = compute_stats(&StrategyCode::new("s1"), &records, &params()).unwrap();
        let composite = score_stats(&stats, &ScoringConfig::default());

        assert_eq!(
            composite.total,
            (composite.performance + composite.risk) / dec!(2)
        );
        assert!(composite.total >= Decimal::ZERO && composite.total <= dec!(100));
    }

    #[test]
    fn rank_is_a_bijection_over_scored_strategies() {
        let config = ScoringConfig::default();
        let calc_date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let p = params();

        let mut cohort = Vec::new();
        for (code, equities) in [
            ("up", vec![dec!(100), dec!(105), dec!(111)]),
            ("down", vec![dec!(100), dec!(95), dec!(90)]),
            ("flat", vec![dec!(100), dec!(101), dec!(100)]),
        ] {
            let records = derived_series(code, &equities);
            let stats = compute_stats(&StrategyCode::new(code), &records, &p).ok();
            cohort.push((StrategyCode::new(code), stats));
        }
        // One strategy with no history at all
        cohort.push((StrategyCode::new("new"), None));

        let scores = rank_cohort(cohort, calc_date, &config);

        let mut ranks: Vec<u32> = scores.iter().filter_map(|s| s.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);

        // Best performer ranks first
        assert_eq!(scores[0].strategy_code.as_str(), "up");
        assert_eq!(scores[0].rank, Some(1));

        // Unscored strategy is present but rank-less
        let unscored = scores
            .iter()
            .find(|s| s.strategy_code.as_str() == "new")
            .unwrap();
        assert_eq!(unscored.rank, None);
        assert_eq!(unscored.total_score, None);
    }

    #[test]
    fn equal_scores_tie_break_by_code() {
        let config = ScoringConfig::default();
        let calc_date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let p = params();

        // Identical series, identical scores
        let mut cohort = Vec::new();
        for code in ["zeta", "alpha"] {
            let records = derived_series(code, &[dec!(100), dec!(102), dec!(104)]);
            let stats = compute_stats(&StrategyCode::new(code), &records, &p).ok();
            cohort.push((StrategyCode::new(code), stats));
        }

        let scores = rank_cohort(cohort, calc_date, &config);
        assert_eq!(scores[0].strategy_code.as_str(), "alpha");
        assert_eq!(scores[0].rank, Some(1));
        assert_eq!(scores[1].strategy_code.as_str(), "zeta");
        assert_eq!(scores[1].rank, Some(2));
    }
}
