//! Running peak and drawdown derivation.

use rust_decimal::Decimal;

use crate::models::DailyEquityRecord;

/// Explicit fold state for the drawdown scan.
#[derive(Debug)]
struct DrawdownScan {
    running_peak: Decimal,
    max_drawdown: Decimal,
}

impl DrawdownScan {
    fn new(first_equity: Decimal) -> Self {
        Self {
            running_peak: first_equity,
            max_drawdown: Decimal::ZERO,
        }
    }

    /// Advance by one equity value, returning (drawdown, max_drawdown).
    fn step(&mut self, equity: Decimal) -> (Decimal, Decimal) {
        self.running_peak = self.running_peak.max(equity);

        let drawdown = if self.running_peak > Decimal::ZERO {
            (self.running_peak - equity) / self.running_peak
        } else {
            Decimal::ZERO
        };

        self.max_drawdown = self.max_drawdown.max(drawdown);
        (drawdown, self.max_drawdown)
    }
}

/// Derive `drawdown` and `max_drawdown` over a normalized series.
///
/// The peak seeds from the first equity value, so the first record's
/// drawdown is zero. `max_drawdown` is non-decreasing and bounds
/// `drawdown` pointwise for the whole series.
pub fn compute_drawdowns(records: &mut [DailyEquityRecord]) {
    let Some(first) = records.first() else {
        return;
    };

    let mut scan = DrawdownScan::new(first.equity);
    for record in records {
        let (drawdown, max_drawdown) = scan.step(record.equity);
        record.drawdown = Some(drawdown);
        record.max_drawdown = Some(max_drawdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrategyCode;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn series(equities: &[Decimal]) -> Vec<DailyEquityRecord> {
        equities
            .iter()
            .enumerate()
            .map(|(i, equity)| DailyEquityRecord {
                strategy_code: StrategyCode::new("s1"),
                trade_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
                    + chrono::Days::new(i as u64),
                prev_balance: Decimal::ZERO,
                deposit_withdraw: Decimal::ZERO,
                realized_pnl: Decimal::ZERO,
                commission: Decimal::ZERO,
                current_balance: *equity,
                floating_pnl: Decimal::ZERO,
                equity: *equity,
                margin_used: Decimal::ZERO,
                available_funds: Decimal::ZERO,
                risk_degree: Decimal::ZERO,
                daily_return: None,
                cumulative_return: None,
                drawdown: None,
                max_drawdown: None,
            })
            .collect()
    }

    #[test]
    fn peak_to_trough_decline() {
        let mut records = series(&[
            dec!(100_000),
            dec!(110_000),
            dec!(105_000),
            dec!(95_000),
            dec!(112_000),
        ]);
        compute_drawdowns(&mut records);

        assert_eq!(records[0].drawdown, Some(Decimal::ZERO));
        // (110k - 95k) / 110k
        let expected = (dec!(110_000) - dec!(95_000)) / dec!(110_000);
        assert_eq!(records[3].drawdown, Some(expected));
        assert_eq!(records[3].max_drawdown, Some(expected));
        // Recovery resets drawdown but not max drawdown
        assert_eq!(records[4].drawdown, Some(Decimal::ZERO));
        assert_eq!(records[4].max_drawdown, Some(expected));
    }

    #[test]
    fn zero_peak_is_guarded() {
        let mut records = series(&[dec!(0), dec!(0)]);
        compute_drawdowns(&mut records);

        assert_eq!(records[0].drawdown, Some(Decimal::ZERO));
        assert_eq!(records[1].drawdown, Some(Decimal::ZERO));
    }

    #[test]
    fn empty_series_is_untouched() {
        let mut records = series(&[]);
        compute_drawdowns(&mut records);
        assert!(records.is_empty());
    }

    proptest! {
        #[test]
        fn max_drawdown_is_monotone_and_bounds_drawdown(
            equities in proptest::collection::vec(1u64..=10_000_000, 1..40)
        ) {
            let decimals: Vec<Decimal> = equities.iter().map(|e| Decimal::from(*e)).collect();
            let mut records = series(&decimals);
            compute_drawdowns(&mut records);

            let mut prev_max = Decimal::ZERO;
            for record in &records {
                let drawdown = record.drawdown.unwrap();
                let max_drawdown = record.max_drawdown.unwrap();
                prop_assert!(drawdown <= max_drawdown);
                prop_assert!(max_drawdown >= prev_max);
                prop_assert!(drawdown >= Decimal::ZERO);
                prev_max = max_drawdown;
            }
        }
    }
}
