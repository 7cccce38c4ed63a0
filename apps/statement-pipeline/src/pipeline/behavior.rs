//! Detection of risky position-management behavior.
//!
//! Scans per-contract position deltas between adjacent available days and
//! flags two patterns:
//!
//! - **floating-loss add**: the position was already losing and the losing
//!   side grew anyway;
//! - **counter-trend add**: lots were added against the settlement price
//!   move (buying a falling contract, selling a rising one).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{BehaviorConfig, BehaviorScoreWeights};
use crate::models::{
    BehaviorAlert, BehaviorAlertType, BehaviorDetails, BehaviorSummary, PositionSide,
    PositionSnapshot, Severity, StrategyCode,
};

/// Detect behavior alerts over one strategy's position history.
///
/// Snapshots may span any number of days and contracts; the detector pairs
/// each snapshot with the same contract's snapshot on the prior *available*
/// day. A floating-loss add needs that baseline to establish the quantity
/// increase. A counter-trend add also fires on a brand-new position, since
/// its price baseline is the settlement pair carried on the snapshot
/// itself.
#[must_use]
pub fn detect(
    strategy_code: &StrategyCode,
    positions: &[PositionSnapshot],
    config: &BehaviorConfig,
) -> Vec<BehaviorAlert> {
    let mut by_contract: BTreeMap<&str, BTreeMap<NaiveDate, &PositionSnapshot>> = BTreeMap::new();
    for snapshot in positions {
        by_contract
            .entry(snapshot.contract.as_str())
            .or_default()
            .insert(snapshot.trade_date, snapshot);
    }

    let mut alerts = Vec::new();

    for days in by_contract.values() {
        let mut prev: Option<&PositionSnapshot> = None;
        for today in days.values() {
            if let Some(prev) = prev {
                if let Some(alert) = check_floating_loss_add(strategy_code, prev, today, config) {
                    alerts.push(alert);
                }
            }
            if let Some(alert) = check_counter_trend_add(strategy_code, prev, today, config) {
                alerts.push(alert);
            }
            prev = Some(today);
        }
    }

    alerts.sort_by(|a, b| {
        (a.trade_date, &a.contract, a.alert_type)
            .cmp(&(b.trade_date, &b.contract, b.alert_type))
    });
    alerts
}

/// Which side of the position is carrying the floating loss.
fn losing_side(prev: &PositionSnapshot, today: &PositionSnapshot) -> Option<PositionSide> {
    let price_change = today.settlement - prev.settlement;
    if price_change < Decimal::ZERO {
        Some(PositionSide::Long)
    } else if price_change > Decimal::ZERO {
        Some(PositionSide::Short)
    } else if today.long_qty > 0 && today.short_qty == 0 {
        Some(PositionSide::Long)
    } else if today.short_qty > 0 && today.long_qty == 0 {
        Some(PositionSide::Short)
    } else if today.long_qty > 0 {
        // Both sides held on a flat day: attribute to the larger book
        Some(if today.long_qty >= today.short_qty {
            PositionSide::Long
        } else {
            PositionSide::Short
        })
    } else {
        None
    }
}

fn check_floating_loss_add(
    strategy_code: &StrategyCode,
    prev: &PositionSnapshot,
    today: &PositionSnapshot,
    config: &BehaviorConfig,
) -> Option<BehaviorAlert> {
    if today.floating_pnl >= Decimal::ZERO {
        return None;
    }

    let side = losing_side(prev, today)?;
    let add_quantity = today.qty(side) - prev.qty(side);
    if add_quantity <= 0 {
        return None;
    }

    let loss = today.floating_pnl.abs();
    let loss_ratio = if today.margin > Decimal::ZERO {
        Some(loss / today.margin)
    } else if today.position_value.abs() > Decimal::ZERO {
        Some(loss / today.position_value.abs())
    } else {
        None
    };

    let severity = config.loss_ratio.classify(loss_ratio);

    Some(BehaviorAlert {
        strategy_code: strategy_code.clone(),
        trade_date: today.trade_date,
        alert_type: BehaviorAlertType::FloatingLossAdd,
        severity,
        contract: today.contract.clone(),
        description: format!(
            "{}: added {} lots {} while down {}",
            today.contract, add_quantity, side, loss
        ),
        details: BehaviorDetails::FloatingLossAdd {
            floating_pnl: today.floating_pnl,
            loss_ratio,
            add_quantity,
            add_direction: side,
            position_value: today.position_value,
        },
    })
}

fn check_counter_trend_add(
    strategy_code: &StrategyCode,
    prev: Option<&PositionSnapshot>,
    today: &PositionSnapshot,
    config: &BehaviorConfig,
) -> Option<BehaviorAlert> {
    let baseline = prev.map_or(today.prev_settlement, |p| p.settlement);
    if baseline <= Decimal::ZERO {
        return None;
    }

    let price_change = today.settlement - baseline;
    if price_change == Decimal::ZERO {
        return None;
    }

    let (prev_long, prev_short) = prev.map_or((0, 0), |p| (p.long_qty, p.short_qty));
    let (side, add_quantity) = if price_change < Decimal::ZERO {
        (PositionSide::Long, today.long_qty - prev_long)
    } else {
        (PositionSide::Short, today.short_qty - prev_short)
    };
    if add_quantity <= 0 {
        return None;
    }

    let change_pct = price_change / baseline;
    let severity = config.change_pct.classify(Some(change_pct.abs()));

    let move_desc = if price_change < Decimal::ZERO {
        "falling"
    } else {
        "rising"
    };

    Some(BehaviorAlert {
        strategy_code: strategy_code.clone(),
        trade_date: today.trade_date,
        alert_type: BehaviorAlertType::CounterTrendAdd,
        severity,
        contract: today.contract.clone(),
        description: format!(
            "{}: added {} lots {} into a {} price ({} -> {})",
            today.contract, add_quantity, side, move_desc, baseline, today.settlement
        ),
        details: BehaviorDetails::CounterTrendAdd {
            direction: side,
            price_change,
            change_pct,
            add_quantity,
            settlement: today.settlement,
            prev_settlement: baseline,
        },
    })
}

/// Aggregate a strategy's alerts into the daily behavior summary.
#[must_use]
pub fn summarize(
    strategy_code: &StrategyCode,
    calc_date: NaiveDate,
    alerts: &[BehaviorAlert],
    weights: &BehaviorScoreWeights,
) -> BehaviorSummary {
    let floating_loss_add_count = alerts
        .iter()
        .filter(|a| a.alert_type == BehaviorAlertType::FloatingLossAdd)
        .count() as u32;
    let counter_trend_add_count = alerts
        .iter()
        .filter(|a| a.alert_type == BehaviorAlertType::CounterTrendAdd)
        .count() as u32;
    let high_severity_count = alerts.iter().filter(|a| a.severity == Severity::High).count() as u32;

    let raw_score = floating_loss_add_count * weights.floating_loss_add
        + counter_trend_add_count * weights.counter_trend_add
        + high_severity_count * weights.high_severity;

    BehaviorSummary {
        strategy_code: strategy_code.clone(),
        calc_date,
        total_alerts: alerts.len() as u32,
        floating_loss_add_count,
        counter_trend_add_count,
        high_severity_count,
        behavior_risk_score: raw_score.min(100),
    }
}
