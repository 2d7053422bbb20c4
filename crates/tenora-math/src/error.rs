//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Numerical overflow.
    #[error("Numerical overflow in {operation}")]
    Overflow {
        /// The operation that caused overflow.
        operation: String,
    },

    /// Division by zero.
    #[error("Division by zero in {operation}")]
    DivisionByZero {
        /// The operation that attempted the division.
        operation: String,
    },

    /// A value does not fit the declared width of its destination.
    #[error("Value {value} does not fit in {target}")]
    Narrowing {
        /// The offending value, rendered as a string to avoid width games.
        value: String,
        /// The destination type or field width.
        target: &'static str,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an overflow error.
    #[must_use]
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Creates a division-by-zero error.
    #[must_use]
    pub fn division_by_zero(operation: impl Into<String>) -> Self {
        Self::DivisionByZero {
            operation: operation.into(),
        }
    }

    /// Creates a narrowing error.
    #[must_use]
    pub fn narrowing(value: impl ToString, target: &'static str) -> Self {
        Self::Narrowing {
            value: value.to_string(),
            target,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::overflow("mul_div_down");
        assert!(err.to_string().contains("mul_div_down"));
    }

    #[test]
    fn test_narrowing_display() {
        let err = MathError::narrowing(u128::MAX, "u64");
        assert!(err.to_string().contains("u64"));
    }
}
