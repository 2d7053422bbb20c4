//! The position ledger: paired debt/credit records and their lifecycle.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenora_core::config::{FeeConfig, MarketConfig};
use tenora_core::error::{ConsistencyError, TenoraResult, ValidationError};
use tenora_core::oracle::OracleReading;
use tenora_core::types::{AccountId, CreditPositionId, DebtPositionId, Ratio, Tenor, Timestamp};
use tenora_curves::LimitOffer;
use tenora_math::fixed_point::{checked_add, mul_div_down, mul_div_up};

use crate::instructions::{Party, TransferInstruction};
use crate::liquidation::collateral_ratio;

/// The obligation to repay: one borrower, one outstanding face value.
///
/// Created atomically with its initial credit position; destroyed when
/// the outstanding credit against it reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPosition {
    /// The account that owes the face value at the due date.
    pub borrower: AccountId,
    /// Outstanding future value owed, in cash units.
    pub face_value: Decimal,
    /// When the face value falls due.
    pub due_date: Timestamp,
    /// Collateral locked against this debt, in collateral units.
    pub collateral: Decimal,
    /// When the position was created.
    pub issued_at: Timestamp,
}

impl DebtPosition {
    /// The remaining tenor at `now`, or `None` once the debt is overdue.
    ///
    /// Always re-derived at use time; never cached across
    /// time-sensitive checks.
    #[must_use]
    pub fn tenor_at(&self, now: Timestamp) -> Option<Tenor> {
        now.until(self.due_date)
    }
}

/// The right to receive repayment: a claim against one debt position.
///
/// Multiple credit positions may reference one debt (partial sales);
/// the sum of their amounts never exceeds the debt's outstanding face
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPosition {
    /// Non-owning back-reference to the debt this claim draws on.
    pub debt_id: DebtPositionId,
    /// The account entitled to repayment.
    pub lender: AccountId,
    /// Claim amount, in cash units.
    pub credit: Decimal,
}

/// Parameters of a market order being matched against a limit offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    /// The account taking on the debt.
    pub borrower: AccountId,
    /// The account funding the loan.
    pub lender: AccountId,
    /// Principal lent, in cash units.
    pub principal: Decimal,
    /// Collateral the borrower locks, in collateral units.
    pub collateral: Decimal,
    /// Requested loan duration.
    pub tenor: Tenor,
}

/// Result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// The created debt position.
    pub debt_id: DebtPositionId,
    /// The created initial credit position.
    pub credit_id: CreditPositionId,
    /// The annualized rate resolved from the offer's curve.
    pub apr: Ratio,
    /// Future value owed at the due date.
    pub face_value: Decimal,
    /// Swap fee charged on the principal.
    pub swap_fee: Decimal,
    /// Intended fund movements.
    pub instructions: Vec<TransferInstruction>,
}

/// Result of a repayment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepayOutcome {
    /// Amount repaid, in cash units.
    pub repaid: Decimal,
    /// True when the debt position was destroyed by this repayment.
    pub closed: bool,
    /// Intended fund movements.
    pub instructions: Vec<TransferInstruction>,
}

/// Owner of all debt and credit positions.
///
/// Identifiers are append-only and monotonically increasing; records
/// are mutable until destroyed. All mutation validates fully before
/// touching state, so a failed operation leaves the ledger unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionLedger {
    debts: BTreeMap<DebtPositionId, DebtPosition>,
    credits: BTreeMap<CreditPositionId, CreditPosition>,
    next_debt_id: Option<DebtPositionId>,
    next_credit_id: Option<CreditPositionId>,
}

impl PositionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a debt position.
    pub fn debt(&self, id: DebtPositionId) -> TenoraResult<&DebtPosition> {
        self.debts
            .get(&id)
            .ok_or_else(|| ValidationError::DebtPositionNotFound(id).into())
    }

    /// Looks up a credit position.
    pub fn credit(&self, id: CreditPositionId) -> TenoraResult<&CreditPosition> {
        self.credits
            .get(&id)
            .ok_or_else(|| ValidationError::CreditPositionNotFound(id).into())
    }

    /// Number of live debt positions.
    #[must_use]
    pub fn debt_count(&self) -> usize {
        self.debts.len()
    }

    /// Number of live credit positions.
    #[must_use]
    pub fn credit_count(&self) -> usize {
        self.credits.len()
    }

    /// Iterates live credit positions referencing `debt_id`, in id order.
    pub fn credits_of(
        &self,
        debt_id: DebtPositionId,
    ) -> impl Iterator<Item = (CreditPositionId, &CreditPosition)> {
        self.credits
            .iter()
            .filter(move |(_, c)| c.debt_id == debt_id)
            .map(|(id, c)| (*id, c))
    }

    /// Sum of live credit claims against `debt_id`.
    #[must_use]
    pub fn credit_sum(&self, debt_id: DebtPositionId) -> Decimal {
        self.credits_of(debt_id).map(|(_, c)| c.credit).sum()
    }

    /// Verifies the credit-sum invariant for every live debt position.
    ///
    /// A failure here is a defect in the ledger, not a caller error;
    /// mutating operations defend the same invariant with debug
    /// assertions.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        for (&debt_id, debt) in &self.debts {
            let credit_sum = self.credit_sum(debt_id);
            if credit_sum > debt.face_value {
                return Err(ConsistencyError::CreditExceedsDebt {
                    debt_id,
                    credit_sum,
                    face_value: debt.face_value,
                });
            }
        }
        Ok(())
    }

    /// Matches a market order against a limit offer, creating a debt
    /// position and its initial credit position atomically.
    ///
    /// Tenor validity is delegated entirely to the offer's curve; the
    /// knot range is inside the risk-config bounds by construction, so
    /// no re-check against those bounds happens here. The due-date gate
    /// is a separate, explicit check.
    pub fn match_order(
        &mut self,
        offer: &LimitOffer,
        order: &MarketOrder,
        config: &MarketConfig,
        reading: &OracleReading,
        now: Timestamp,
    ) -> TenoraResult<MatchOutcome> {
        reading.validate(now, &config.oracle)?;

        if offer.is_null() {
            return Err(ValidationError::NullOffer.into());
        }
        if order.principal <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount: order.principal,
                reason: "principal must be positive",
            }
            .into());
        }
        if order.collateral < Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount: order.collateral,
                reason: "collateral must be non-negative",
            }
            .into());
        }

        let apr = offer
            .curve
            .apr_with_market_rate(order.tenor, reading.variable_pool_borrow_rate)?;
        offer.check_due_date(now, order.tenor)?;

        let face_value = face_value(order.principal, apr, order.tenor)?;
        if face_value <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount: face_value,
                reason: "face value must be positive",
            }
            .into());
        }

        let ratio = collateral_ratio(order.collateral, reading.collateral_price, face_value)?;
        if ratio < config.risk.min_collateral_ratio {
            return Err(ValidationError::InsufficientCollateral {
                ratio,
                minimum: config.risk.min_collateral_ratio,
            }
            .into());
        }

        let fee_rate = mul_div_up(
            config.fees.swap_fee_apr.as_decimal(),
            order.tenor.year_fraction(),
            Decimal::ONE,
        )?;
        let swap_fee = mul_div_up(order.principal, fee_rate, Decimal::ONE)?;

        // Due date overflow was ruled out by the due-date gate above.
        let due_date = now.checked_add(order.tenor).unwrap_or(offer.max_due_date);

        // All validation has passed; mutate.
        let debt_id = self.allocate_debt_id();
        self.debts.insert(
            debt_id,
            DebtPosition {
                borrower: order.borrower,
                face_value,
                due_date,
                collateral: order.collateral,
                issued_at: now,
            },
        );
        let credit_id =
            self.create_credit(CreditPositionId::RESERVED, order.lender, debt_id, face_value)?;

        debug_assert!(self.check_consistency().is_ok());
        log::debug!(
            "matched order: {debt_id} face {face_value} due {due_date}, apr {apr}"
        );

        let mut instructions = vec![
            TransferInstruction::cash(
                Party::Account(order.lender),
                Party::Account(order.borrower),
                order.principal,
            ),
            TransferInstruction::collateral(
                Party::Account(order.borrower),
                Party::Protocol,
                order.collateral,
            ),
        ];
        if swap_fee > Decimal::ZERO {
            instructions.push(TransferInstruction::cash(
                Party::Account(order.borrower),
                Party::Protocol,
                swap_fee,
            ));
        }

        Ok(MatchOutcome {
            debt_id,
            credit_id,
            apr,
            face_value,
            swap_fee,
            instructions,
        })
    }

    /// Transfers `amount` of an existing credit position to `new_lender`.
    ///
    /// Transferring the entire remaining credit reassigns the position
    /// in place and returns its existing identifier; only a partial
    /// transfer allocates a new position, and only a partial transfer
    /// pays the fragmentation fee.
    pub fn transfer_credit(
        &mut self,
        credit_id: CreditPositionId,
        new_lender: AccountId,
        amount: Decimal,
        fees: &FeeConfig,
    ) -> TenoraResult<(CreditPositionId, Vec<TransferInstruction>)> {
        let existing = self.credit(credit_id)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount,
                reason: "transfer amount must be positive",
            }
            .into());
        }
        if amount > existing.credit {
            return Err(ValidationError::InsufficientCredit {
                credit_id,
                requested: amount,
                available: existing.credit,
            }
            .into());
        }
        let debt_id = existing.debt_id;

        let new_id = self.create_credit(credit_id, new_lender, debt_id, amount)?;

        debug_assert!(self.check_consistency().is_ok());

        let mut instructions = Vec::new();
        if new_id != credit_id && fees.fragmentation_fee > Decimal::ZERO {
            instructions.push(TransferInstruction::cash(
                Party::Account(new_lender),
                Party::Protocol,
                fees.fragmentation_fee,
            ));
        }
        Ok((new_id, instructions))
    }

    /// Repays part or all of a debt position.
    ///
    /// Credit claims retire in identifier order. The debt position is
    /// destroyed when its outstanding face value reaches zero.
    pub fn repay(&mut self, debt_id: DebtPositionId, amount: Decimal) -> TenoraResult<RepayOutcome> {
        let debt = self.debt(debt_id)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount,
                reason: "repayment must be positive",
            }
            .into());
        }
        if amount > debt.face_value {
            return Err(ValidationError::InvalidAmount {
                amount,
                reason: "repayment exceeds outstanding face value",
            }
            .into());
        }
        let borrower = debt.borrower;

        // Validation done; mutate.
        let mut instructions = Vec::new();
        let mut remaining = amount;
        let credit_ids: Vec<CreditPositionId> =
            self.credits_of(debt_id).map(|(id, _)| id).collect();
        for credit_id in credit_ids {
            if remaining.is_zero() {
                break;
            }
            let Some(credit) = self.credits.get_mut(&credit_id) else {
                continue;
            };
            let take = credit.credit.min(remaining);
            credit.credit -= take;
            remaining -= take;
            instructions.push(TransferInstruction::cash(
                Party::Account(borrower),
                Party::Account(credit.lender),
                take,
            ));
            if credit.credit.is_zero() {
                self.credits.remove(&credit_id);
            }
        }

        let debt = self.debt_mut(debt_id)?;
        debt.face_value -= amount;
        let closed = debt.face_value.is_zero();
        if closed {
            self.remove_debt(debt_id);
        }

        debug_assert!(self.check_consistency().is_ok());
        log::debug!("repaid {amount} on {debt_id}, closed: {closed}");

        Ok(RepayOutcome {
            repaid: amount,
            closed,
            instructions,
        })
    }

    /// Creates a credit claim of `amount` against `debt_id` for `lender`.
    ///
    /// With the [`CreditPositionId::RESERVED`] sentinel a fresh position
    /// is appended. Otherwise the claim exits the given position:
    /// full-remainder exits reassign the lender in place - the branch is
    /// taken before any position value is built, so no unused record is
    /// ever materialized - and partial exits split.
    ///
    /// Callers have already bounds-checked `amount` against the source
    /// position.
    pub(crate) fn create_credit(
        &mut self,
        exit_credit_id: CreditPositionId,
        lender: AccountId,
        debt_id: DebtPositionId,
        amount: Decimal,
    ) -> TenoraResult<CreditPositionId> {
        if exit_credit_id.is_reserved() {
            let id = self.allocate_credit_id();
            self.credits.insert(
                id,
                CreditPosition {
                    debt_id,
                    lender,
                    credit: amount,
                },
            );
            return Ok(id);
        }

        let existing = self
            .credits
            .get_mut(&exit_credit_id)
            .ok_or(ValidationError::CreditPositionNotFound(exit_credit_id))?;
        if amount == existing.credit {
            existing.lender = lender;
            return Ok(exit_credit_id);
        }

        existing.credit -= amount;
        let id = self.allocate_credit_id();
        self.credits.insert(
            id,
            CreditPosition {
                debt_id,
                lender,
                credit: amount,
            },
        );
        Ok(id)
    }

    pub(crate) fn debt_mut(&mut self, id: DebtPositionId) -> TenoraResult<&mut DebtPosition> {
        self.debts
            .get_mut(&id)
            .ok_or_else(|| ValidationError::DebtPositionNotFound(id).into())
    }

    pub(crate) fn remove_credit(&mut self, id: CreditPositionId) {
        self.credits.remove(&id);
    }

    /// Removes a debt position and any remaining credit claims on it.
    pub(crate) fn remove_debt(&mut self, id: DebtPositionId) {
        let orphaned: Vec<CreditPositionId> = self.credits_of(id).map(|(cid, _)| cid).collect();
        for credit_id in orphaned {
            self.credits.remove(&credit_id);
        }
        self.debts.remove(&id);
    }

    fn allocate_debt_id(&mut self) -> DebtPositionId {
        let id = self.next_debt_id.unwrap_or(DebtPositionId::FIRST);
        self.next_debt_id = Some(id.next());
        id
    }

    fn allocate_credit_id(&mut self) -> CreditPositionId {
        let id = self.next_credit_id.unwrap_or(CreditPositionId::FIRST);
        self.next_credit_id = Some(id.next());
        id
    }
}

/// `principal * (1 + apr * tenor/year)`, rounding down.
fn face_value(principal: Decimal, apr: Ratio, tenor: Tenor) -> TenoraResult<Decimal> {
    let rate_per_tenor = mul_div_down(apr.as_decimal(), tenor.year_fraction(), Decimal::ONE)?;
    let growth = checked_add(Decimal::ONE, rate_per_tenor, "face_value")?;
    Ok(mul_div_down(principal, growth, Decimal::ONE)?)
}
