//! Identifier newtypes for accounts and positions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A market participant (lender, borrower, or liquidator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates an account id from an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random account id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! position_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// Identifiers are append-only and monotonically increasing. The
        /// reserved sentinel [`Self::RESERVED`] means "no existing
        /// position - create new".
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The first identifier handed out by a fresh ledger.
            pub const FIRST: Self = Self(1);

            /// Sentinel meaning "no existing position - create new".
            pub const RESERVED: Self = Self(u64::MAX);

            /// Creates an identifier from its raw value.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn as_raw(self) -> u64 {
                self.0
            }

            /// Returns true if this is the reserved sentinel.
            #[must_use]
            pub const fn is_reserved(self) -> bool {
                self.0 == u64::MAX
            }

            /// Returns the next identifier in sequence.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

position_id! {
    /// Identifier of a debt position: the obligation to repay.
    DebtPositionId
}

position_id! {
    /// Identifier of a credit position: the right to receive repayment.
    CreditPositionId
}
