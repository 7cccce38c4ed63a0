//! Daily and cumulative return derivation.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::DailyEquityRecord;

/// Explicit fold state for the return scan.
///
/// Held per strategy and never shared: the runner owns one accumulator per
/// series, which keeps the scan trivially parallel across strategies.
#[derive(Debug, Default)]
struct ReturnScan {
    prev_equity: Option<Decimal>,
    cumulative: Option<Decimal>,
}

impl ReturnScan {
    /// Advance the scan by one record, returning (daily, cumulative).
    fn step(&mut self, record: &DailyEquityRecord) -> (Option<Decimal>, Option<Decimal>) {
        let daily = match self.prev_equity {
            Some(prev) if prev != Decimal::ZERO => {
                Some((record.equity - prev - record.deposit_withdraw) / prev)
            }
            Some(_) => {
                debug!(
                    strategy = %record.strategy_code,
                    date = %record.trade_date,
                    "zero previous equity, daily return undefined"
                );
                None
            }
            // First record: no baseline
            None => None,
        };

        let cumulative = match (self.cumulative, daily) {
            // Compound onto the running value
            (Some(cum), Some(d)) => Some((Decimal::ONE + cum) * (Decimal::ONE + d) - Decimal::ONE),
            // Missing return carries the running value forward unchanged
            (Some(cum), None) => Some(cum),
            // Series baseline
            (None, _) => Some(Decimal::ZERO),
        };

        self.prev_equity = Some(record.equity);
        self.cumulative = cumulative;
        (daily, cumulative)
    }
}

/// Derive `daily_return` and `cumulative_return` over a normalized series.
///
/// The first record (and any record following a zero-equity day) gets a
/// `None` daily return — missing data, not a flat day — and is excluded
/// from downstream averages and win-rate counts.
pub fn compute_returns(records: &mut [DailyEquityRecord]) {
    let mut scan = ReturnScan::default();
    for record in records {
        let (daily, cumulative) = scan.step(record);
        record.daily_return = daily;
        record.cumulative_return = cumulative;
    }
}
