//! Tenor: duration from now until a debt's due date.

use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan duration in whole seconds.
///
/// Tenors are always re-derived at use time (`due_date - now` for an
/// existing position, a caller-supplied duration for a new order) and
/// never cached across time-sensitive checks.
///
/// # Example
///
/// ```rust
/// use tenora_core::types::Tenor;
///
/// let tenor = Tenor::from_days(45);
/// assert_eq!(tenor.as_seconds(), 45 * 86_400);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tenor(u64);

impl Tenor {
    /// Seconds in a protocol year (365 days).
    pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

    /// The zero tenor.
    pub const ZERO: Self = Self(0);

    /// Creates a tenor from whole seconds.
    #[must_use]
    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Creates a tenor from whole days.
    #[must_use]
    pub const fn from_days(days: u64) -> Self {
        Self(days * 86_400)
    }

    /// Creates a tenor from a non-negative [`chrono::Duration`].
    ///
    /// Returns `None` for negative durations.
    #[must_use]
    pub fn from_duration(duration: chrono::Duration) -> Option<Self> {
        u64::try_from(duration.num_seconds()).ok().map(Self)
    }

    /// Returns the tenor in whole seconds.
    #[must_use]
    pub const fn as_seconds(self) -> u64 {
        self.0
    }

    /// Returns true if the tenor is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the tenor as a fraction of a protocol year.
    ///
    /// Exact at `Decimal` precision; the 365-day year matches the APR
    /// convention used for face value computation.
    #[must_use]
    pub fn year_fraction(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(Self::SECONDS_PER_YEAR)
    }

    /// Checked tenor subtraction.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl Add for Tenor {
    type Output = Tenor;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Tenor {
    type Output = Tenor;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 86_400 == 0 {
            write!(f, "{}d", self.0 / 86_400)
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_days() {
        assert_eq!(Tenor::from_days(30).as_seconds(), 2_592_000);
    }

    #[test]
    fn test_year_fraction() {
        assert_eq!(Tenor::from_days(365).year_fraction(), dec!(1));
        assert_eq!(Tenor::from_days(730).year_fraction(), dec!(2));
    }

    #[test]
    fn test_from_duration_rejects_negative() {
        assert!(Tenor::from_duration(chrono::Duration::seconds(-1)).is_none());
        assert_eq!(
            Tenor::from_duration(chrono::Duration::days(3)),
            Some(Tenor::from_days(3))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Tenor::from_days(45).to_string(), "45d");
        assert_eq!(Tenor::from_seconds(90).to_string(), "90s");
    }

    #[test]
    fn test_ordering() {
        assert!(Tenor::from_days(30) < Tenor::from_days(60));
    }
}
