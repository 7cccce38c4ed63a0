//! Record types shared across the pipeline.
//!
//! Inputs (`DailyEquityRecord`, `PositionSnapshot`, `TradeFill`) mirror the
//! validated per-day statement schema; everything else is pipeline-owned
//! derived data. Optional-heavy raw data is modeled with explicit `Option`
//! fields so "no data" never silently reads as "no risk".

mod account;
mod alert;
mod behavior;
mod equity;
mod position;
mod risk;
mod score;
mod trade;

pub use account::{StrategyAccount, StrategyCode};
pub use alert::{Alert, AlertLevel, AlertType};
pub use behavior::{
    BehaviorAlert, BehaviorAlertType, BehaviorDetails, BehaviorSummary, Severity,
};
pub use equity::{DailyEquityRecord, DateGap};
pub use position::{PositionSide, PositionSnapshot};
pub use risk::DailyRiskMetrics;
pub use score::{PerformanceStats, StrategyScore};
pub use trade::{OffsetFlag, TradeDirection, TradeFill};
