//! Collateralization math and liquidation transitions.
//!
//! Per debt position the state machine is:
//!
//! ```text
//! Healthy --(ratio < minimum, or overdue)--> Liquidatable
//!   Liquidatable --> SelfLiquidated | Liquidated | ReplacedAndLiquidated
//! ```
//!
//! [`LiquidationEngine::is_liquidatable`] is the single authoritative
//! health predicate; every liquidation entrypoint calls it exactly once
//! and none re-derives the comparison.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tenora_core::config::MarketConfig;
use tenora_core::error::{TenoraResult, ValidationError};
use tenora_core::oracle::OracleReading;
use tenora_core::types::{AccountId, CreditPositionId, DebtPositionId, Ratio, Tenor, Timestamp};
use tenora_curves::LimitOffer;
use tenora_math::fixed_point::{checked_add, mul_div_down, proportion_down};

use crate::instructions::{Party, TransferInstruction};
use crate::positions::{DebtPosition, PositionLedger};

/// How a liquidatable position was closed or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidationKind {
    /// A lender surrendered their own credit for its collateral share.
    SelfLiquidated,
    /// A third party repaid the debt and took the collateral.
    Liquidated,
    /// A new borrower was substituted at a freshly resolved rate.
    ReplacedAndLiquidated,
}

/// Result of a liquidation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidationOutcome {
    /// Which transition ran.
    pub kind: LiquidationKind,
    /// The debt position acted on.
    pub debt_id: DebtPositionId,
    /// True when the debt position was destroyed.
    pub closed: bool,
    /// Collateral leaving the borrower, in collateral units.
    pub seized_collateral: Decimal,
    /// Collateral retained by the protocol from the post-reward
    /// remainder; nonzero only when the position was overdue.
    pub protocol_collateral: Decimal,
    /// Future-value spread retained by the protocol; nonzero only for
    /// liquidation with replacement.
    pub rate_spread_profit: Decimal,
    /// Intended fund movements.
    pub instructions: Vec<TransferInstruction>,
}

/// Terms of a replacement borrower for liquidation with replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementOrder {
    /// The substituted borrower.
    pub new_borrower: AccountId,
    /// Tenor of the replacement debt, from the liquidation time.
    pub tenor: Tenor,
    /// Collateral the new borrower locks, in collateral units.
    pub collateral: Decimal,
}

/// `collateral * price / face_value`, rounding down.
///
/// The single collateral-ratio computation, shared by the opening check
/// at match time and the health predicate at liquidation time.
pub fn collateral_ratio(
    collateral: Decimal,
    price: Decimal,
    face_value: Decimal,
) -> TenoraResult<Ratio> {
    Ok(Ratio::new(mul_div_down(collateral, price, face_value)?))
}

/// Collateral assigned pro rata to a credit claim:
/// `collateral * credit / face_value`, rounding down.
///
/// When the claim covers the whole face value the quotient is exactly
/// one and the result is the collateral amount; that branch is an
/// optimization only, the general formula is equally correct there.
pub fn collateral_share(
    collateral: Decimal,
    credit: Decimal,
    face_value: Decimal,
) -> TenoraResult<Decimal> {
    if credit == face_value {
        return Ok(collateral);
    }
    proportion_down(collateral, credit, face_value).map_err(Into::into)
}

/// Liquidation transitions over the position ledger.
///
/// Stateless: configuration, the oracle reading, and the time are
/// snapshot inputs to every call, taken once per transaction by the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiquidationEngine;

impl LiquidationEngine {
    /// Creates the engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The single authoritative health predicate.
    ///
    /// A debt position is liquidatable when its collateral ratio falls
    /// below the configured minimum, or when it is past due. Both
    /// self-liquidation and third-party liquidation delegate here;
    /// within one transaction snapshot the answer never changes.
    pub fn is_liquidatable(
        &self,
        debt: &DebtPosition,
        config: &MarketConfig,
        reading: &OracleReading,
        now: Timestamp,
    ) -> TenoraResult<bool> {
        let ratio = collateral_ratio(debt.collateral, reading.collateral_price, debt.face_value)?;
        Ok(ratio < config.risk.min_collateral_ratio || now > debt.due_date)
    }

    /// A lender voluntarily closes their own credit against an
    /// undercollateralized or overdue debt, taking the pro-rata
    /// collateral share instead of repayment.
    pub fn self_liquidate(
        &self,
        ledger: &mut PositionLedger,
        credit_id: CreditPositionId,
        config: &MarketConfig,
        reading: &OracleReading,
        now: Timestamp,
    ) -> TenoraResult<LiquidationOutcome> {
        reading.validate(now, &config.oracle)?;

        let credit = *ledger.credit(credit_id)?;
        let debt_id = credit.debt_id;
        let debt = *ledger.debt(debt_id)?;

        if !self.is_liquidatable(&debt, config, reading, now)? {
            return Err(ValidationError::NotLiquidatable { debt_id }.into());
        }

        let share = collateral_share(debt.collateral, credit.credit, debt.face_value)?;

        // Validation done; mutate.
        {
            let debt = ledger.debt_mut(debt_id)?;
            debt.collateral -= share;
            debt.face_value -= credit.credit;
        }
        ledger.remove_credit(credit_id);
        let closed = ledger.debt(debt_id)?.face_value.is_zero();
        if closed {
            ledger.remove_debt(debt_id);
        }

        debug_assert!(ledger.check_consistency().is_ok());
        log::debug!("self-liquidated {credit_id} on {debt_id}, collateral share {share}");

        Ok(LiquidationOutcome {
            kind: LiquidationKind::SelfLiquidated,
            debt_id,
            closed,
            seized_collateral: share,
            protocol_collateral: Decimal::ZERO,
            rate_spread_profit: Decimal::ZERO,
            instructions: vec![TransferInstruction::collateral(
                Party::Protocol,
                Party::Account(credit.lender),
                share,
            )],
        })
    }

    /// A third-party liquidator repays the outstanding face value to
    /// the credit holders and receives the collateral, capped at the
    /// debt's collateral-equivalent plus the liquidation reward; any
    /// remainder returns to the borrower.
    pub fn liquidate(
        &self,
        ledger: &mut PositionLedger,
        debt_id: DebtPositionId,
        liquidator: AccountId,
        config: &MarketConfig,
        reading: &OracleReading,
        now: Timestamp,
    ) -> TenoraResult<LiquidationOutcome> {
        reading.validate(now, &config.oracle)?;

        let debt = *ledger.debt(debt_id)?;
        if !self.is_liquidatable(&debt, config, reading, now)? {
            return Err(ValidationError::NotLiquidatable { debt_id }.into());
        }

        let split = split_collateral(&debt, config, reading, now)?;

        let mut instructions = Vec::new();
        for (_, credit) in ledger.credits_of(debt_id) {
            instructions.push(TransferInstruction::cash(
                Party::Account(liquidator),
                Party::Account(credit.lender),
                credit.credit,
            ));
        }
        instructions.push(TransferInstruction::collateral(
            Party::Protocol,
            Party::Account(liquidator),
            split.seized,
        ));
        // The protocol's overdue cut stays in escrow; no transfer leg.
        if split.returned > Decimal::ZERO {
            instructions.push(TransferInstruction::collateral(
                Party::Protocol,
                Party::Account(debt.borrower),
                split.returned,
            ));
        }

        // Validation done; mutate.
        ledger.remove_debt(debt_id);

        debug_assert!(ledger.check_consistency().is_ok());
        log::debug!(
            "liquidated {debt_id}, seized {}, returned {}",
            split.seized,
            split.returned
        );

        Ok(LiquidationOutcome {
            kind: LiquidationKind::Liquidated,
            debt_id,
            closed: true,
            seized_collateral: split.seized,
            protocol_collateral: split.protocol,
            rate_spread_profit: Decimal::ZERO,
            instructions,
        })
    }

    /// Closes an undercollateralized debt by substituting a new
    /// borrower at a freshly resolved tenor and rate instead of seizing
    /// collateral outright.
    ///
    /// Tenor validity delegates entirely to the replacement offer's
    /// curve. The credit positions survive untouched: the same debt
    /// identifier continues against the new borrower. The liquidator
    /// pays the outstanding face value into the protocol in exchange
    /// for the seized collateral; that payment funds the issuance to
    /// the new borrower, and the protocol retains the spread between
    /// the face value and the replacement issuance value.
    #[allow(clippy::too_many_arguments)]
    pub fn liquidate_with_replacement(
        &self,
        ledger: &mut PositionLedger,
        debt_id: DebtPositionId,
        offer: &LimitOffer,
        replacement: &ReplacementOrder,
        liquidator: AccountId,
        config: &MarketConfig,
        reading: &OracleReading,
        now: Timestamp,
    ) -> TenoraResult<LiquidationOutcome> {
        reading.validate(now, &config.oracle)?;

        let debt = *ledger.debt(debt_id)?;
        if !self.is_liquidatable(&debt, config, reading, now)? {
            return Err(ValidationError::NotLiquidatable { debt_id }.into());
        }
        if offer.is_null() {
            return Err(ValidationError::NullOffer.into());
        }

        let apr = offer
            .curve
            .apr_with_market_rate(replacement.tenor, reading.variable_pool_borrow_rate)?;
        offer.check_due_date(now, replacement.tenor)?;

        let rate_per_tenor = mul_div_down(
            apr.as_decimal(),
            replacement.tenor.year_fraction(),
            Decimal::ONE,
        )?;
        let divisor = checked_add(Decimal::ONE, rate_per_tenor, "replacement_issuance")?;
        if divisor <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount {
                amount: divisor,
                reason: "replacement rate discounts the face value to nothing",
            }
            .into());
        }
        let issuance_value = mul_div_down(debt.face_value, Decimal::ONE, divisor)?;

        let ratio = collateral_ratio(
            replacement.collateral,
            reading.collateral_price,
            debt.face_value,
        )?;
        if ratio < config.risk.min_collateral_ratio {
            return Err(ValidationError::InsufficientCollateral {
                ratio,
                minimum: config.risk.min_collateral_ratio,
            }
            .into());
        }

        let split = split_collateral(&debt, config, reading, now)?;
        let profit = debt.face_value - issuance_value;

        // Due date overflow was ruled out by the due-date gate above.
        let due_date = now
            .checked_add(replacement.tenor)
            .unwrap_or(offer.max_due_date);

        // Validation done; mutate.
        {
            let record = ledger.debt_mut(debt_id)?;
            record.borrower = replacement.new_borrower;
            record.due_date = due_date;
            record.collateral = replacement.collateral;
            record.issued_at = now;
        }

        debug_assert!(ledger.check_consistency().is_ok());
        log::debug!(
            "replaced borrower on {debt_id}: new due {due_date}, apr {apr}, profit {profit}"
        );

        let mut instructions = vec![
            TransferInstruction::collateral(
                Party::Account(replacement.new_borrower),
                Party::Protocol,
                replacement.collateral,
            ),
            TransferInstruction::cash(Party::Account(liquidator), Party::Protocol, debt.face_value),
            TransferInstruction::cash(
                Party::Protocol,
                Party::Account(replacement.new_borrower),
                issuance_value,
            ),
            TransferInstruction::collateral(
                Party::Protocol,
                Party::Account(liquidator),
                split.seized,
            ),
        ];
        if split.returned > Decimal::ZERO {
            instructions.push(TransferInstruction::collateral(
                Party::Protocol,
                Party::Account(debt.borrower),
                split.returned,
            ));
        }

        Ok(LiquidationOutcome {
            kind: LiquidationKind::ReplacedAndLiquidated,
            debt_id,
            closed: false,
            seized_collateral: split.seized,
            protocol_collateral: split.protocol,
            rate_spread_profit: profit,
            instructions,
        })
    }
}

/// How a liquidated debt's collateral divides up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CollateralSplit {
    /// Liquidator's part: debt equivalent plus reward, capped by what
    /// is there.
    seized: Decimal,
    /// Protocol's cut of the remainder; zero unless the position was
    /// overdue.
    protocol: Decimal,
    /// What goes back to the borrower.
    returned: Decimal,
}

fn split_collateral(
    debt: &DebtPosition,
    config: &MarketConfig,
    reading: &OracleReading,
    now: Timestamp,
) -> TenoraResult<CollateralSplit> {
    let debt_in_collateral =
        mul_div_down(debt.face_value, Decimal::ONE, reading.collateral_price)?;
    let growth = checked_add(
        Decimal::ONE,
        config.fees.liquidation_reward_ratio.as_decimal(),
        "liquidation_reward",
    )?;
    let cap = mul_div_down(debt_in_collateral, growth, Decimal::ONE)?;
    let seized = debt.collateral.min(cap);
    let remainder = debt.collateral - seized;
    let protocol = if now > debt.due_date {
        mul_div_down(
            remainder,
            config.fees.overdue_collateral_protocol_ratio.as_decimal(),
            Decimal::ONE,
        )?
    } else {
        Decimal::ZERO
    };
    Ok(CollateralSplit {
        seized,
        protocol,
        returned: remainder - protocol,
    })
}
