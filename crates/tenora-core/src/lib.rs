//! # Tenora Core
//!
//! Core types, configuration, and error taxonomy for the Tenora credit
//! market core.
//!
//! This crate provides the foundational building blocks used throughout
//! Tenora:
//!
//! - **Types**: Domain-specific newtypes like [`types::Tenor`],
//!   [`types::Timestamp`], [`types::Ratio`], and position identifiers
//! - **Configuration**: Versioned risk/fee/oracle singletons with a
//!   validated, atomic update path
//! - **Oracle Gate**: Staleness validation for external rate readings
//! - **Errors**: The protocol-wide error taxonomy
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: Newtypes prevent mixing incompatible values
//! - **Atomic Mutations**: Configuration updates either fully apply or
//!   leave every field untouched
//! - **Explicit Over Implicit**: Time is an argument, never sampled
//!   inside the core

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod oracle;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ConfigKey, FeeConfig, MarketConfig, OracleConfig, RiskConfig};
    pub use crate::error::{
        ConsistencyError, StaleDataError, TenoraError, TenoraResult, ValidationError,
    };
    pub use crate::oracle::OracleReading;
    pub use crate::types::{
        AccountId, CreditPositionId, DebtPositionId, Ratio, Tenor, Timestamp,
    };
}

pub use error::{TenoraError, TenoraResult};
