//! Signed fixed-point ratio.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenora_math::narrowing::decimal_from_wad;
use tenora_math::MathResult;

/// A signed fixed-point ratio.
///
/// Used for APRs (`0.15` = 15% annualized), rate multipliers, and
/// collateral ratios (`1.5` = 150% collateralized). Negative values are
/// legal for curve knots (inverted market segments); consumers that
/// require non-negative values validate at their own boundary.
///
/// # Example
///
/// ```rust
/// use tenora_core::types::Ratio;
/// use rust_decimal_macros::dec;
///
/// let apr = Ratio::new(dec!(0.135));
/// assert_eq!(apr.as_decimal(), dec!(0.135));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ratio(Decimal);

impl Ratio {
    /// The zero ratio.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The unit ratio (100%).
    pub const ONE: Self = Self(Decimal::ONE);

    /// Creates a ratio from a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates a ratio from a WAD-scaled (`10^18`) wire value.
    pub fn from_wad(raw: u128) -> MathResult<Self> {
        decimal_from_wad(raw).map(Self)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Returns true if the ratio is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the ratio is strictly negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl From<Decimal> for Ratio {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
