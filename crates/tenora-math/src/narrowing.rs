//! Checked narrowing conversions.
//!
//! Configuration values arrive on the wire wider than the fields that
//! store them (raw `u128` against 64-bit tenors, WAD-scaled ratios
//! against `Decimal`). Every narrowing goes through one of these
//! helpers and fails loudly; nothing in the protocol truncates.

use rust_decimal::Decimal;

use crate::error::{MathError, MathResult};

/// The external fixed-point wire scale: ratios arrive as `value * 10^18`.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Narrows a `u128` into a `u64`, failing instead of truncating.
pub fn narrow_u64(value: u128) -> MathResult<u64> {
    u64::try_from(value).map_err(|_| MathError::narrowing(value, "u64"))
}

/// Converts a WAD-scaled `u128` into a `Decimal` with 18 fractional digits.
///
/// # Errors
///
/// Returns [`MathError::Narrowing`] when the value exceeds the decimal
/// mantissa range.
pub fn decimal_from_wad(value: u128) -> MathResult<Decimal> {
    let signed = i128::try_from(value).map_err(|_| MathError::narrowing(value, "Decimal"))?;
    Decimal::try_from_i128_with_scale(signed, 18)
        .map_err(|_| MathError::narrowing(value, "Decimal"))
}

/// Converts a non-negative `Decimal` back to its WAD-scaled integer form.
///
/// # Errors
///
/// Returns [`MathError::InvalidInput`] for negative values and
/// [`MathError::Overflow`] when scaling does not fit.
pub fn wad_from_decimal(value: Decimal) -> MathResult<u128> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::invalid_input("WAD values must be non-negative"));
    }
    // Rescaling to 18 fractional digits makes the mantissa the WAD value.
    let mut scaled = value.trunc_with_scale(18);
    scaled.rescale(18);
    if scaled.scale() != 18 {
        return Err(MathError::overflow("wad_from_decimal"));
    }
    u128::try_from(scaled.mantissa()).map_err(|_| MathError::overflow("wad_from_decimal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_narrow_u64_in_range() {
        assert_eq!(narrow_u64(42).unwrap(), 42);
        assert_eq!(narrow_u64(u128::from(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn test_narrow_u64_overflow() {
        // 2^70 does not fit a 64-bit field
        let err = narrow_u64(1u128 << 70).unwrap_err();
        assert!(matches!(err, MathError::Narrowing { target: "u64", .. }));
    }

    #[test]
    fn test_decimal_from_wad() {
        assert_eq!(decimal_from_wad(WAD).unwrap(), dec!(1));
        assert_eq!(decimal_from_wad(WAD / 2).unwrap(), dec!(0.5));
        assert_eq!(decimal_from_wad(3 * WAD / 2).unwrap(), dec!(1.5));
    }

    #[test]
    fn test_decimal_from_wad_out_of_range() {
        assert!(decimal_from_wad(u128::MAX).is_err());
    }

    #[test]
    fn test_wad_round_trip() {
        for raw in [0u128, 1, WAD, 3 * WAD / 2, 1_250_000_000_000_000_000] {
            let dec = decimal_from_wad(raw).unwrap();
            assert_eq!(wad_from_decimal(dec).unwrap(), raw);
        }
    }

    #[test]
    fn test_wad_from_negative() {
        assert!(wad_from_decimal(dec!(-0.1)).is_err());
    }
}
