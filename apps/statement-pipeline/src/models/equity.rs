//! Daily equity records and their derived return/drawdown fields.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::StrategyCode;

/// One day of account-level equity data for a strategy.
///
/// Raw fields come straight from the validated statement; the derived
/// fields are written by the pipeline and must never be supplied by the
/// ingestion side. A missing derived value is `None`, never zero: the
/// first day of a series has no daily return, and downstream consumers
/// must be able to tell "no data" from "flat day".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEquityRecord {
    /// Owning strategy.
    pub strategy_code: StrategyCode,
    /// Trading date of the statement. Unique per strategy.
    pub trade_date: NaiveDate,
    /// Balance carried over from the previous statement.
    pub prev_balance: Decimal,
    /// Net deposits/withdrawals settled on this day.
    pub deposit_withdraw: Decimal,
    /// Realized profit and loss.
    pub realized_pnl: Decimal,
    /// Commission paid.
    pub commission: Decimal,
    /// Closing cash balance.
    pub current_balance: Decimal,
    /// Mark-to-market profit and loss on open positions.
    pub floating_pnl: Decimal,
    /// Account equity (net asset value).
    pub equity: Decimal,
    /// Margin currently occupied.
    pub margin_used: Decimal,
    /// Funds available for new positions.
    pub available_funds: Decimal,
    /// Broker-reported risk degree (margin over equity).
    pub risk_degree: Decimal,

    /// Derived: fractional return versus the prior available day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_return: Option<Decimal>,
    /// Derived: compounded return since the start of the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_return: Option<Decimal>,
    /// Derived: fractional decline from the running peak equity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawdown: Option<Decimal>,
    /// Derived: worst drawdown seen so far in the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drawdown: Option<Decimal>,
}

impl DailyEquityRecord {
    /// Margin occupied as a fraction of equity.
    ///
    /// `None` when equity is not positive: a busted account has no
    /// meaningful margin ratio and must not read as "no margin in use".
    #[must_use]
    pub fn margin_ratio(&self) -> Option<Decimal> {
        if self.equity > Decimal::ZERO {
            Some(self.margin_used / self.equity)
        } else {
            None
        }
    }
}

/// A gap between two consecutive available records in a normalized series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGap {
    /// Last date before the gap.
    pub from: NaiveDate,
    /// First date after the gap.
    pub to: NaiveDate,
    /// Calendar days between the two records.
    pub calendar_days: i64,
}
