//! Limit offers: a yield curve plus a maximum due date.

use serde::{Deserialize, Serialize};
use tenora_core::config::RiskConfig;
use tenora_core::error::{TenoraResult, ValidationError};
use tenora_core::types::{Tenor, Timestamp};
use tenora_math::MathError;

use crate::curve::YieldCurve;

/// A lender's or borrower's standing offer.
///
/// The null offer (a cleared slot) is `max_due_date == 0` **and** an
/// empty curve; [`LimitOffer::is_null`] is the single predicate for
/// both conditions. Callers must not re-check `max_due_date == 0`
/// separately - it is subsumed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimitOffer {
    /// Latest due date this offer will accept.
    pub max_due_date: Timestamp,
    /// Per-offer yield curve; empty for the null offer.
    pub curve: YieldCurve,
}

impl LimitOffer {
    /// Creates an offer.
    #[must_use]
    pub fn new(max_due_date: Timestamp, curve: YieldCurve) -> Self {
        Self {
            max_due_date,
            curve,
        }
    }

    /// The null offer: a cleared slot.
    #[must_use]
    pub fn null() -> Self {
        Self {
            max_due_date: Timestamp::ZERO,
            curve: YieldCurve::empty(),
        }
    }

    /// Returns true if this is the null offer.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.max_due_date.is_zero() && self.curve.is_empty()
    }

    /// Creation-time validation.
    ///
    /// The null offer is valid (it is how an offer is cleared); any
    /// other offer must carry a curve passing
    /// [`YieldCurve::validate`] and a due date in the future of the
    /// posting time.
    pub fn validate(&self, risk: &RiskConfig, now: Timestamp) -> TenoraResult<()> {
        if self.is_null() {
            return Ok(());
        }
        self.curve.validate(risk)?;
        if self.max_due_date <= now {
            return Err(ValidationError::PastMaxDueDate {
                due_date: now,
                max_due_date: self.max_due_date,
            }
            .into());
        }
        Ok(())
    }

    /// Match-time due-date gate.
    ///
    /// A curve's knots can all sit inside the risk bounds while the
    /// implied due date still lands beyond this offer's
    /// `max_due_date`; resolving an APR alone does not rule that out.
    /// This check is deliberately a distinct branch from tenor-range
    /// validity.
    pub fn check_due_date(&self, now: Timestamp, tenor: Tenor) -> TenoraResult<()> {
        let due_date = now
            .checked_add(tenor)
            .ok_or_else(|| MathError::overflow("due_date"))?;
        if due_date > self.max_due_date {
            return Err(ValidationError::PastMaxDueDate {
                due_date,
                max_due_date: self.max_due_date,
            }
            .into());
        }
        Ok(())
    }
}
