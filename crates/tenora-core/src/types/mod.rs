//! Domain types for the credit market core.
//!
//! This module provides type-safe representations of market concepts:
//!
//! - [`Tenor`]: Duration from now until a debt's due date
//! - [`Timestamp`]: A point in time, sampled once per transaction
//! - [`Ratio`]: Signed fixed-point ratio (APRs, multipliers, collateral ratios)
//! - [`AccountId`]: Market participant identifier
//! - [`DebtPositionId`] / [`CreditPositionId`]: Monotonic position keys

mod ids;
mod ratio;
mod tenor;
mod timestamp;

pub use ids::{AccountId, CreditPositionId, DebtPositionId};
pub use ratio::Ratio;
pub use tenor::Tenor;
pub use timestamp::Timestamp;
