//! Per-contract position snapshots.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::StrategyCode;

/// Side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Long (bought) side.
    Long,
    /// Short (sold) side.
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// End-of-day snapshot of one contract held by one strategy.
///
/// Created fresh from each day's statement. There is no cross-day identity
/// beyond (strategy, contract); the behavior detector pairs snapshots of
/// the same contract across adjacent available days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Owning strategy.
    pub strategy_code: StrategyCode,
    /// Trading date of the snapshot.
    pub trade_date: NaiveDate,
    /// Contract identifier, e.g. "mgq2601".
    pub contract: String,
    /// Long quantity (lots).
    pub long_qty: i64,
    /// Average long open price.
    pub long_price: Decimal,
    /// Short quantity (lots).
    pub short_qty: i64,
    /// Average short open price.
    pub short_price: Decimal,
    /// Previous day's settlement price.
    pub prev_settlement: Decimal,
    /// Today's settlement price.
    pub settlement: Decimal,
    /// Mark-to-market profit and loss for this contract.
    pub floating_pnl: Decimal,
    /// Market value of the position.
    pub position_value: Decimal,
    /// Margin occupied by the position.
    pub margin: Decimal,
    /// Exchange the contract trades on.
    pub exchange: String,
    /// Date the position was opened.
    pub open_date: Option<NaiveDate>,
}

impl PositionSnapshot {
    /// Quantity held on the given side.
    #[must_use]
    pub const fn qty(&self, side: PositionSide) -> i64 {
        match side {
            PositionSide::Long => self.long_qty,
            PositionSide::Short => self.short_qty,
        }
    }

    /// Market value of the long side (quantity times settlement).
    #[must_use]
    pub fn long_value(&self) -> Decimal {
        Decimal::from(self.long_qty) * self.settlement
    }

    /// Market value of the short side (quantity times settlement).
    #[must_use]
    pub fn short_value(&self) -> Decimal {
        Decimal::from(self.short_qty) * self.settlement
    }
}
