//! Oracle reading gate.
//!
//! The price/rate feed itself is an external collaborator; the core
//! only consumes a reading that has passed the staleness gate. A stale
//! reading is a hard failure, never a silently substituted default, and
//! the core never retries - retry policy belongs to the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::OracleConfig;
use crate::error::{StaleDataError, TenoraResult};
use crate::types::{Ratio, Tenor, Timestamp};

/// One oracle observation, sampled once per transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReading {
    /// Price of one collateral unit in debt units.
    pub collateral_price: Decimal,
    /// Current variable pool borrow rate, annualized.
    pub variable_pool_borrow_rate: Ratio,
    /// When the observation was made.
    pub observed_at: Timestamp,
}

impl OracleReading {
    /// Validates the reading against the staleness interval.
    ///
    /// Readings timestamped in the future are treated as age zero; the
    /// feed's clock is not this module's problem.
    ///
    /// # Errors
    ///
    /// Returns [`StaleDataError::StaleRate`] when the reading is older
    /// than `config.staleness_interval` at `now`.
    pub fn validate(&self, now: Timestamp, config: &OracleConfig) -> TenoraResult<()> {
        let age = self.observed_at.until(now).unwrap_or(Tenor::ZERO);
        if age > config.staleness_interval {
            return Err(StaleDataError::StaleRate {
                age,
                max_age: config.staleness_interval,
            }
            .into());
        }
        Ok(())
    }
}
