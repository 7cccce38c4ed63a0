//! Trade fill records.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::StrategyCode;

/// Direction of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    /// Bought.
    Buy,
    /// Sold.
    Sell,
}

/// Whether a fill opened or closed a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OffsetFlag {
    /// Opened or added to a position.
    Open,
    /// Closed or reduced a position.
    Close,
}

/// A single executed fill from the day's statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFill {
    /// Owning strategy.
    pub strategy_code: StrategyCode,
    /// Trading date of the fill.
    pub trade_date: NaiveDate,
    /// Contract identifier.
    pub contract: String,
    /// Exchange-assigned trade id.
    pub trade_id: String,
    /// Execution timestamp.
    pub trade_time: Option<NaiveDateTime>,
    /// Buy or sell.
    pub direction: TradeDirection,
    /// Open or close.
    pub offset_flag: OffsetFlag,
    /// Fill price.
    pub price: Decimal,
    /// Filled quantity (lots).
    pub quantity: i64,
    /// Notional amount of the fill.
    pub amount: Decimal,
    /// Commission charged.
    pub commission: Decimal,
    /// Realized profit and loss (close fills).
    pub realized_pnl: Decimal,
    /// Exchange the fill executed on.
    pub exchange: String,
}
