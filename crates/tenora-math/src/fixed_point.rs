//! Overflow-checked multiply-divide with explicit rounding.
//!
//! All protocol ratio math flows through these helpers. Rounding is
//! always named at the call site: `mul_div_down` for amounts owed to a
//! counterparty, `mul_div_up` for fees charged against the caller.
//! Intermediate products are checked; overflow is an error, never a
//! wrapped value.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{MathError, MathResult};

/// Number of fractional digits carried by protocol values.
///
/// All results are rounded to this scale so that repeated operations
/// stay deterministic regardless of operand history.
pub const PROTOCOL_SCALE: u32 = 18;

/// Computes `a * b / denominator`, rounding toward negative infinity.
///
/// # Errors
///
/// Returns [`MathError::DivisionByZero`] if `denominator` is zero and
/// [`MathError::Overflow`] if the intermediate product does not fit.
pub fn mul_div_down(a: Decimal, b: Decimal, denominator: Decimal) -> MathResult<Decimal> {
    mul_div(a, b, denominator, RoundingStrategy::ToNegativeInfinity, "mul_div_down")
}

/// Computes `a * b / denominator`, rounding toward positive infinity.
///
/// # Errors
///
/// Returns [`MathError::DivisionByZero`] if `denominator` is zero and
/// [`MathError::Overflow`] if the intermediate product does not fit.
pub fn mul_div_up(a: Decimal, b: Decimal, denominator: Decimal) -> MathResult<Decimal> {
    mul_div(a, b, denominator, RoundingStrategy::ToPositiveInfinity, "mul_div_up")
}

/// Computes `a + b`, checked.
///
/// # Errors
///
/// Returns [`MathError::Overflow`] if the sum does not fit.
pub fn checked_add(a: Decimal, b: Decimal, operation: &'static str) -> MathResult<Decimal> {
    a.checked_add(b).ok_or_else(|| MathError::overflow(operation))
}

/// Computes the `numerator / denominator` share of `amount`, rounding down.
///
/// Shorthand for `mul_div_down(amount, numerator, denominator)` used by
/// pro-rata allocations; rounding down guarantees the shares of a whole
/// never sum above it.
pub fn proportion_down(amount: Decimal, numerator: Decimal, denominator: Decimal) -> MathResult<Decimal> {
    mul_div_down(amount, numerator, denominator)
}

fn mul_div(
    a: Decimal,
    b: Decimal,
    denominator: Decimal,
    rounding: RoundingStrategy,
    operation: &'static str,
) -> MathResult<Decimal> {
    if denominator.is_zero() {
        return Err(MathError::division_by_zero(operation));
    }

    let product = a.checked_mul(b).ok_or_else(|| MathError::overflow(operation))?;
    let quotient = product
        .checked_div(denominator)
        .ok_or_else(|| MathError::overflow(operation))?;

    Ok(quotient.round_dp_with_strategy(PROTOCOL_SCALE, rounding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mul_div_down_exact() {
        let r = mul_div_down(dec!(10), dec!(3), dec!(2)).unwrap();
        assert_eq!(r, dec!(15));
    }

    #[test]
    fn test_mul_div_down_rounds_toward_negative_infinity() {
        // 1 * 1 / 3 = 0.333... truncated at 18 places
        let r = mul_div_down(dec!(1), dec!(1), dec!(3)).unwrap();
        assert_eq!(r, dec!(0.333333333333333333));

        // Negative results round away from zero when flooring
        let r = mul_div_down(dec!(-1), dec!(1), dec!(3)).unwrap();
        assert_eq!(r, dec!(-0.333333333333333334));
    }

    #[test]
    fn test_mul_div_up_rounds_toward_positive_infinity() {
        let r = mul_div_up(dec!(1), dec!(1), dec!(3)).unwrap();
        assert_eq!(r, dec!(0.333333333333333334));
    }

    #[test]
    fn test_division_by_zero() {
        let err = mul_div_down(dec!(1), dec!(1), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, MathError::DivisionByZero { .. }));
    }

    #[test]
    fn test_overflow() {
        let err = mul_div_down(Decimal::MAX, dec!(2), dec!(1)).unwrap_err();
        assert!(matches!(err, MathError::Overflow { .. }));
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(checked_add(dec!(1), dec!(2), "sum").unwrap(), dec!(3));
        let err = checked_add(Decimal::MAX, dec!(1), "sum").unwrap_err();
        assert!(matches!(err, MathError::Overflow { .. }));
    }

    #[test]
    fn test_proportion_shares_never_exceed_whole() {
        let whole = dec!(100);
        let a = proportion_down(whole, dec!(1), dec!(3)).unwrap();
        let b = proportion_down(whole, dec!(1), dec!(3)).unwrap();
        let c = proportion_down(whole, dec!(1), dec!(3)).unwrap();
        assert!(a + b + c <= whole);
    }
}
