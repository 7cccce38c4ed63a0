//! Statistical math utilities over `Decimal` values.

use rust_decimal::Decimal;

const TWO: Decimal = Decimal::TWO;
const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 7); // 0.0000001

/// Calculate mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

/// Calculate sample standard deviation of a slice of decimals.
pub fn std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum: Decimal = values.iter().map(|v| (*v - avg) * (*v - avg)).sum();
    let variance = variance_sum / Decimal::from((values.len() - 1) as u64);

    sqrt_decimal(variance)
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = value / TWO;

    for _ in 0..50 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

/// Divide, treating a zero or negative denominator as "undefined".
///
/// Ratio metrics over equity and position value use this so that a busted
/// denominator yields `None` instead of a nonsense ratio.
pub fn ratio_or_none(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator > Decimal::ZERO {
        Some(numerator / denominator)
    } else {
        None
    }
}
