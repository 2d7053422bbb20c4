//! # Tenora Curves
//!
//! Yield curve storage, validation, and APR resolution for the Tenora
//! credit market core.
//!
//! This crate provides:
//!
//! - **[`YieldCurve`]**: ordered (tenor, rate multiplier, APR) knots
//!   with linear interpolation between them
//! - **Tenor Validity**: the curve's knot range is the sole authority
//!   for whether a requested tenor is acceptable
//! - **[`LimitOffer`]**: an offer's curve plus its maximum due date and
//!   the match-time due-date gate
//!
//! ## Quick Start
//!
//! ```rust
//! use tenora_curves::{Knot, YieldCurve};
//! use tenora_core::types::{Ratio, Tenor};
//! use rust_decimal_macros::dec;
//!
//! let curve = YieldCurve::new(vec![
//!     Knot::fixed(Tenor::from_days(30), Ratio::new(dec!(0.15))),
//!     Knot::fixed(Tenor::from_days(60), Ratio::new(dec!(0.12))),
//! ]);
//!
//! // Midpoint linear interpolation
//! let apr = curve.apr(Tenor::from_days(45)).unwrap();
//! assert_eq!(apr, Ratio::new(dec!(0.135)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod curve;
pub mod offer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{Knot, YieldCurve};
    pub use crate::offer::LimitOffer;
}

pub use curve::{Knot, YieldCurve};
pub use offer::LimitOffer;
