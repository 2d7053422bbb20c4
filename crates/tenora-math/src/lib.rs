//! # Tenora Math
//!
//! Checked fixed-point arithmetic for the Tenora credit market core.
//!
//! This crate provides:
//!
//! - **Fixed Point**: Overflow-checked multiply-divide with explicit rounding
//! - **Narrowing**: Checked narrowing conversions that fail instead of truncating
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Same inputs always produce the same outputs
//! - **No Silent Loss**: Overflow and truncation are errors, never wraparound
//! - **Explicit Rounding**: Every division names its rounding direction

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod fixed_point;
pub mod narrowing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::fixed_point::{checked_add, mul_div_down, mul_div_up, proportion_down};
    pub use crate::narrowing::{decimal_from_wad, narrow_u64, wad_from_decimal};
}

pub use error::{MathError, MathResult};
