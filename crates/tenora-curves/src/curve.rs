//! Yield curve knots and APR resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenora_core::config::RiskConfig;
use tenora_core::error::{TenoraResult, ValidationError};
use tenora_core::types::{Ratio, Tenor};
use tenora_math::fixed_point::{checked_add, mul_div_down};

/// Largest admissible knot rate magnitude (APR or multiplier).
///
/// Generous for any real market, and keeps interpolation and the
/// variable-rate sum far from `Decimal` overflow.
const MAX_KNOT_RATE: Decimal = Decimal::ONE_HUNDRED;

/// One anchor point on a yield curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knot {
    /// Loan duration this knot anchors.
    pub tenor: Tenor,
    /// Multiplier applied to the variable pool borrow rate at this knot.
    pub rate_multiplier: Ratio,
    /// Annualized rate at this knot.
    pub apr: Ratio,
}

impl Knot {
    /// Creates a knot.
    #[must_use]
    pub const fn new(tenor: Tenor, rate_multiplier: Ratio, apr: Ratio) -> Self {
        Self {
            tenor,
            rate_multiplier,
            apr,
        }
    }

    /// Creates a fixed-rate knot (zero variable-rate multiplier).
    #[must_use]
    pub const fn fixed(tenor: Tenor, apr: Ratio) -> Self {
        Self::new(tenor, Ratio::ZERO, apr)
    }
}

/// An APR and the rate multiplier in force at a resolved tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedPoint {
    rate_multiplier: Ratio,
    apr: Ratio,
}

/// A per-offer yield curve: knots strictly increasing by tenor.
///
/// An empty curve is the null curve; resolving an APR against it fails
/// with [`ValidationError::NullCurve`].
///
/// The knot range `[min_tenor(), max_tenor()]` is the sole authority
/// for tenor validity. Creation-time validation
/// ([`YieldCurve::validate`]) keeps every knot inside the risk-config
/// bounds, so callers resolving an APR must not re-check those bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YieldCurve {
    knots: Vec<Knot>,
}

impl YieldCurve {
    /// Creates a curve from knots.
    ///
    /// The knots are stored as given; call [`YieldCurve::validate`]
    /// before admitting the curve into an offer.
    #[must_use]
    pub fn new(knots: Vec<Knot>) -> Self {
        Self { knots }
    }

    /// Creates the empty (null) curve.
    #[must_use]
    pub fn empty() -> Self {
        Self { knots: Vec::new() }
    }

    /// Returns true if the curve has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// The knots, in ascending tenor order once validated.
    #[must_use]
    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    /// Smallest knot tenor, if any.
    #[must_use]
    pub fn min_tenor(&self) -> Option<Tenor> {
        self.knots.first().map(|k| k.tenor)
    }

    /// Largest knot tenor, if any.
    #[must_use]
    pub fn max_tenor(&self) -> Option<Tenor> {
        self.knots.last().map(|k| k.tenor)
    }

    /// Creation-time validation: non-empty, strictly increasing tenors,
    /// every knot inside the risk-config tenor bounds, rate magnitudes
    /// within [`MAX_KNOT_RATE`].
    ///
    /// This runs once when a curve is admitted into an offer. It is what
    /// makes the knot range a subset of the risk-config range by
    /// construction, so per-resolution code never re-checks the config
    /// bounds.
    pub fn validate(&self, risk: &RiskConfig) -> TenoraResult<()> {
        if self.knots.is_empty() {
            return Err(ValidationError::NullCurve.into());
        }
        for pair in self.knots.windows(2) {
            if pair[1].tenor <= pair[0].tenor {
                return Err(ValidationError::InvalidCurve {
                    reason: format!(
                        "knot tenors must be strictly increasing: {} then {}",
                        pair[0].tenor, pair[1].tenor
                    ),
                }
                .into());
            }
        }
        for knot in &self.knots {
            if knot.tenor < risk.min_tenor || knot.tenor > risk.max_tenor {
                return Err(ValidationError::InvalidCurve {
                    reason: format!(
                        "knot tenor {} outside configured bounds [{}, {}]",
                        knot.tenor, risk.min_tenor, risk.max_tenor
                    ),
                }
                .into());
            }
            if knot.apr.as_decimal().abs() > MAX_KNOT_RATE
                || knot.rate_multiplier.as_decimal().abs() > MAX_KNOT_RATE
            {
                return Err(ValidationError::InvalidCurve {
                    reason: format!(
                        "knot rate magnitude at {} exceeds {}",
                        knot.tenor, MAX_KNOT_RATE
                    ),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolves the annualized rate for a requested tenor.
    ///
    /// Exact knot matches return the stored APR directly; tenors
    /// strictly between two knots interpolate linearly, rounding down
    /// like all other protocol ratio math. There is no extrapolation:
    /// tenors strictly outside the knot range fail with
    /// [`ValidationError::TenorOutOfRange`].
    pub fn apr(&self, tenor: Tenor) -> TenoraResult<Ratio> {
        self.resolve(tenor).map(|p| p.apr)
    }

    /// Resolves the annualized rate including the variable-rate leg.
    ///
    /// The rate multiplier interpolates the same way as the APR; the
    /// resolved multiplier is applied to `variable_rate` and added to
    /// the fixed APR. Curves whose knots all carry a zero multiplier
    /// are unaffected by the market rate.
    pub fn apr_with_market_rate(&self, tenor: Tenor, variable_rate: Ratio) -> TenoraResult<Ratio> {
        let point = self.resolve(tenor)?;
        if point.rate_multiplier.is_zero() {
            return Ok(point.apr);
        }
        let variable_leg = mul_div_down(
            point.rate_multiplier.as_decimal(),
            variable_rate.as_decimal(),
            Decimal::ONE,
        )?;
        let total = checked_add(point.apr.as_decimal(), variable_leg, "apr_with_market_rate")?;
        Ok(Ratio::new(total))
    }

    fn resolve(&self, tenor: Tenor) -> TenoraResult<ResolvedPoint> {
        let (first, last) = match (self.knots.first(), self.knots.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ValidationError::NullCurve.into()),
        };
        if tenor < first.tenor || tenor > last.tenor {
            return Err(ValidationError::TenorOutOfRange {
                tenor,
                min: first.tenor,
                max: last.tenor,
            }
            .into());
        }

        match self.knots.binary_search_by_key(&tenor, |k| k.tenor) {
            // Exact knot match: stored values, no interpolation error.
            Ok(i) => Ok(ResolvedPoint {
                rate_multiplier: self.knots[i].rate_multiplier,
                apr: self.knots[i].apr,
            }),
            Err(i) => {
                // Bounds were checked above, so i-1 and i both exist.
                let k0 = &self.knots[i - 1];
                let k1 = &self.knots[i];
                Ok(ResolvedPoint {
                    rate_multiplier: lerp_down(
                        k0.rate_multiplier,
                        k1.rate_multiplier,
                        tenor - k0.tenor,
                        k1.tenor - k0.tenor,
                    )?,
                    apr: lerp_down(k0.apr, k1.apr, tenor - k0.tenor, k1.tenor - k0.tenor)?,
                })
            }
        }
    }
}

/// `y0 + (y1 - y0) * elapsed / span`, rounding down.
fn lerp_down(y0: Ratio, y1: Ratio, elapsed: Tenor, span: Tenor) -> TenoraResult<Ratio> {
    let delta = mul_div_down(
        y1.as_decimal() - y0.as_decimal(),
        Decimal::from(elapsed.as_seconds()),
        Decimal::from(span.as_seconds()),
    )?;
    Ok(Ratio::new(checked_add(y0.as_decimal(), delta, "lerp")?))
}
