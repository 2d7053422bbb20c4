//! Error taxonomy for the Tenora credit market core.
//!
//! Three error classes, each a distinct type so callers can match on
//! class without string inspection:
//!
//! - [`ValidationError`]: bad caller input. The transaction is fully
//!   rejected with no partial state change.
//! - [`ConsistencyError`]: an internal invariant was violated. Fatal;
//!   a defect to be caught by assertions during testing, not a
//!   recoverable runtime condition.
//! - [`StaleDataError`]: an oracle reading is too old. Surfaced to the
//!   caller, which may retry with a fresh reading; the core never
//!   retries internally.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{CreditPositionId, DebtPositionId, Ratio, Tenor, Timestamp};

/// A specialized Result type for Tenora operations.
pub type TenoraResult<T> = Result<T, TenoraError>;

/// The top-level error type for Tenora operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TenoraError {
    /// Bad caller input; transaction rejected with no state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal invariant violated; a defect, not a runtime condition.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// External data too old to act on.
    #[error(transparent)]
    StaleData(#[from] StaleDataError),

    /// Arithmetic failure (overflow, division by zero).
    #[error(transparent)]
    Math(#[from] tenora_math::MathError),
}

/// Rejections of bad caller input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Requested tenor falls strictly outside the curve's knot range.
    #[error("Tenor {tenor} out of range [{min}, {max}]")]
    TenorOutOfRange {
        /// The requested tenor.
        tenor: Tenor,
        /// Smallest knot tenor on the curve.
        min: Tenor,
        /// Largest knot tenor on the curve.
        max: Tenor,
    },

    /// The curve has no knots.
    #[error("Yield curve has no knots")]
    NullCurve,

    /// The offer is the null offer (zero max due date and empty curve).
    #[error("Offer is null")]
    NullOffer,

    /// The resulting due date would exceed the offer's maximum.
    #[error("Due date {due_date} past offer maximum {max_due_date}")]
    PastMaxDueDate {
        /// Due date implied by `now + tenor`.
        due_date: Timestamp,
        /// The offer's stated maximum due date.
        max_due_date: Timestamp,
    },

    /// A yield curve failed creation-time validation.
    #[error("Invalid yield curve: {reason}")]
    InvalidCurve {
        /// What was wrong with the curve.
        reason: String,
    },

    /// Unknown configuration key.
    #[error("Invalid configuration key: {key:?}")]
    InvalidKey {
        /// The unrecognized key.
        key: String,
    },

    /// A configuration value failed its range check.
    #[error("Configuration value out of range for {key}: {reason}")]
    ValueOutOfRange {
        /// The key being updated.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration value does not fit its field's declared width.
    #[error("Configuration value overflow for {key}: {value} does not fit {width}")]
    Overflow {
        /// The key being updated.
        key: &'static str,
        /// The oversized value.
        value: u128,
        /// The destination width.
        width: &'static str,
    },

    /// A position-mutating amount was zero or negative.
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        /// The offending amount.
        amount: Decimal,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Requested more credit than the position holds.
    #[error("Insufficient credit on {credit_id}: requested {requested}, available {available}")]
    InsufficientCredit {
        /// The credit position drawn against.
        credit_id: CreditPositionId,
        /// Amount requested.
        requested: Decimal,
        /// Amount actually available.
        available: Decimal,
    },

    /// Opening collateralization below the configured minimum.
    #[error("Collateral ratio {ratio} below minimum {minimum}")]
    InsufficientCollateral {
        /// The computed collateral ratio.
        ratio: Ratio,
        /// The configured minimum collateral ratio.
        minimum: Ratio,
    },

    /// The debt position is healthy; liquidation is not permitted.
    #[error("{debt_id} is not liquidatable")]
    NotLiquidatable {
        /// The healthy debt position.
        debt_id: DebtPositionId,
    },

    /// No debt position exists under the given identifier.
    #[error("{0} not found")]
    DebtPositionNotFound(DebtPositionId),

    /// No credit position exists under the given identifier.
    #[error("{0} not found")]
    CreditPositionNotFound(CreditPositionId),
}

/// Violations of internal invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    /// Live credit claims exceed the debt's outstanding face value.
    #[error("Credit sum {credit_sum} exceeds face value {face_value} on {debt_id}")]
    CreditExceedsDebt {
        /// The inconsistent debt position.
        debt_id: DebtPositionId,
        /// Sum of live credit claims.
        credit_sum: Decimal,
        /// Outstanding face value.
        face_value: Decimal,
    },
}

/// Oracle readings too old to act on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StaleDataError {
    /// The oracle reading exceeded the configured staleness interval.
    #[error("Oracle reading is {age} old, limit {max_age}")]
    StaleRate {
        /// Age of the reading at transaction time.
        age: Tenor,
        /// Configured staleness interval.
        max_age: Tenor,
    },
}

impl TenoraError {
    /// Returns true if this is a caller-input rejection.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal-invariant failure.
    #[must_use]
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::TenorOutOfRange {
            tenor: Tenor::from_days(61),
            min: Tenor::from_days(30),
            max: Tenor::from_days(60),
        };
        assert_eq!(err.to_string(), "Tenor 61d out of range [30d, 60d]");
    }

    #[test]
    fn test_classification() {
        let err: TenoraError = ValidationError::NullCurve.into();
        assert!(err.is_validation());
        assert!(!err.is_consistency());

        let err: TenoraError = StaleDataError::StaleRate {
            age: Tenor::from_seconds(7_200),
            max_age: Tenor::from_seconds(3_600),
        }
        .into();
        assert!(!err.is_validation());
    }
}
