//! # Tenora Ledger
//!
//! Position lifecycle and liquidation state machine for the Tenora
//! credit market core.
//!
//! This crate provides:
//!
//! - **[`PositionLedger`]**: paired debt/credit positions, creation from
//!   matched orders, partial-credit splitting, and repayment
//! - **[`LiquidationEngine`]**: collateralization math and the
//!   self-/third-party/replacement liquidation transitions
//! - **[`TransferInstruction`]**: the fund movements each operation
//!   intends, executed by an external settlement collaborator
//!
//! ## Transaction Model
//!
//! The ledger is a pure state-transition engine. Every operation takes
//! one consistent snapshot of its inputs - the configuration, one oracle
//! reading, and the current time, all sampled by the caller at
//! transaction start - and either fully commits or fully rejects.
//! Nothing blocks, nothing retries, and no partial application survives
//! a failure.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod instructions;
pub mod liquidation;
pub mod positions;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::instructions::{AssetKind, Party, TransferInstruction};
    pub use crate::liquidation::{
        LiquidationEngine, LiquidationKind, LiquidationOutcome, ReplacementOrder,
    };
    pub use crate::positions::{
        CreditPosition, DebtPosition, MarketOrder, MatchOutcome, PositionLedger, RepayOutcome,
    };
}

pub use instructions::{AssetKind, Party, TransferInstruction};
pub use liquidation::{LiquidationEngine, LiquidationKind, LiquidationOutcome, ReplacementOrder};
pub use positions::{
    CreditPosition, DebtPosition, MarketOrder, MatchOutcome, PositionLedger, RepayOutcome,
};
