//! Settlement instructions.
//!
//! The core computes amounts and emits the intended transfers as
//! explicit values; an external settlement collaborator executes them.
//! The core never moves value itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenora_core::types::AccountId;

/// The asset a transfer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    /// The debt-denominated cash token.
    Cash,
    /// The collateral token.
    Collateral,
}

/// A party to a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    /// A market participant.
    Account(AccountId),
    /// The protocol itself (fee sink and collateral escrow).
    Protocol,
}

/// One intended fund movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    /// Paying party.
    pub from: Party,
    /// Receiving party.
    pub to: Party,
    /// Asset to move.
    pub asset: AssetKind,
    /// Amount to move; always positive.
    pub amount: Decimal,
}

impl TransferInstruction {
    /// A cash transfer between two accounts.
    #[must_use]
    pub fn cash(from: Party, to: Party, amount: Decimal) -> Self {
        Self {
            from,
            to,
            asset: AssetKind::Cash,
            amount,
        }
    }

    /// A collateral transfer between two accounts.
    #[must_use]
    pub fn collateral(from: Party, to: Party, amount: Decimal) -> Self {
        Self {
            from,
            to,
            asset: AssetKind::Collateral,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors() {
        let a = AccountId::random();
        let i = TransferInstruction::cash(Party::Account(a), Party::Protocol, dec!(5));
        assert_eq!(i.asset, AssetKind::Cash);
        assert_eq!(i.amount, dec!(5));
    }
}
