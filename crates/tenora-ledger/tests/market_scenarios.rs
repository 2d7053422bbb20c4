//! End-to-end market scenarios across matching, credit transfer,
//! repayment, and the liquidation transitions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tenora_core::config::MarketConfig;
use tenora_core::error::{TenoraError, ValidationError};
use tenora_core::oracle::OracleReading;
use tenora_core::types::{AccountId, Ratio, Tenor, Timestamp};
use tenora_curves::{Knot, LimitOffer, YieldCurve};
use tenora_ledger::prelude::*;

const T0: u64 = 1_700_000_000;

fn now() -> Timestamp {
    Timestamp::from_unix(T0)
}

fn at_price(price: Decimal, observed_at: Timestamp) -> OracleReading {
    OracleReading {
        collateral_price: price,
        variable_pool_borrow_rate: Ratio::new(dec!(0.03)),
        observed_at,
    }
}

fn standing_offer() -> LimitOffer {
    LimitOffer::new(
        Timestamp::from_unix(T0 + Tenor::from_days(120).as_seconds()),
        YieldCurve::new(vec![
            Knot::fixed(Tenor::from_days(30), Ratio::new(dec!(0.15))),
            Knot::fixed(Tenor::from_days(60), Ratio::new(dec!(0.12))),
            Knot::fixed(Tenor::from_days(90), Ratio::new(dec!(0.10))),
        ]),
    )
}

fn order(
    borrower: AccountId,
    lender: AccountId,
    principal: Decimal,
    collateral: Decimal,
    tenor: Tenor,
) -> MarketOrder {
    MarketOrder {
        borrower,
        lender,
        principal,
        collateral,
        tenor,
    }
}

#[test]
fn borrow_sell_credit_and_repay_to_two_lenders() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();
    let borrower = AccountId::random();
    let lender = AccountId::random();
    let buyer = AccountId::random();

    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(borrower, lender, dec!(1000), dec!(1000), Tenor::from_days(45)),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();

    // Lender funds the borrower, collateral escrows, swap fee accrues.
    assert_eq!(matched.instructions.len(), 3);
    assert_eq!(matched.instructions[0].asset, AssetKind::Cash);
    assert_eq!(matched.instructions[0].amount, dec!(1000));
    assert_eq!(matched.instructions[1].asset, AssetKind::Collateral);
    assert!(matched.swap_fee > Decimal::ZERO);

    // Lender sells part of the claim to a buyer.
    let (split_id, fee_instructions) = ledger
        .transfer_credit(matched.credit_id, buyer, dec!(400), &config.fees)
        .unwrap();
    assert_ne!(split_id, matched.credit_id);
    assert_eq!(fee_instructions.len(), 1);
    assert_eq!(fee_instructions[0].amount, config.fees.fragmentation_fee);

    // Full repayment pays both claim holders, older claim first.
    let outcome = ledger.repay(matched.debt_id, matched.face_value).unwrap();
    assert!(outcome.closed);
    assert_eq!(outcome.instructions.len(), 2);
    assert_eq!(
        outcome.instructions[0].amount,
        matched.face_value - dec!(400)
    );
    assert_eq!(outcome.instructions[1].amount, dec!(400));

    assert_eq!(ledger.debt_count(), 0);
    assert_eq!(ledger.credit_count(), 0);
}

#[test]
fn curve_knot_range_is_the_sole_tenor_authority() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();

    // Config bounds are 1 hour to 5 years; the offered curve only
    // spans 30 to 90 days. A 10-day tenor is inside the config bounds
    // but below the curve's first knot, and the curve alone decides.
    let err = ledger
        .match_order(
            &standing_offer(),
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(10),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TenoraError::Validation(ValidationError::TenorOutOfRange { .. })
    ));
}

#[test]
fn due_date_gate_is_distinct_from_tenor_validity() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();

    // The offer expires 40 days out; 60 days resolves on the curve but
    // would fall due past the offer's horizon.
    let short_offer = LimitOffer::new(
        Timestamp::from_unix(T0 + Tenor::from_days(40).as_seconds()),
        standing_offer().curve,
    );
    let err = ledger
        .match_order(
            &short_offer,
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(60),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TenoraError::Validation(ValidationError::PastMaxDueDate { .. })
    ));

    // 30 days clears both gates against the same offer.
    assert!(ledger
        .match_order(
            &short_offer,
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(30),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .is_ok());
}

#[test]
fn price_crash_self_liquidation_then_third_party_sweep() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();
    let engine = LiquidationEngine::new();
    let buyer = AccountId::random();

    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(45),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();
    let (split_id, _) = ledger
        .transfer_credit(matched.credit_id, buyer, dec!(400), &config.fees)
        .unwrap();

    // Collateral price collapses. One claim holder exits for their
    // pro-rata collateral share.
    let crashed = at_price(dec!(0.5), now());
    let debt_before = *ledger.debt(matched.debt_id).unwrap();
    assert!(engine
        .is_liquidatable(&debt_before, &config, &crashed, now())
        .unwrap());

    let exited = engine
        .self_liquidate(&mut ledger, split_id, &config, &crashed, now())
        .unwrap();
    assert_eq!(exited.kind, LiquidationKind::SelfLiquidated);
    assert!(!exited.closed);
    // 400 of the face claims 1000 * 400 / face of the collateral
    assert!(exited.seized_collateral < dec!(1000));
    assert!(ledger.check_consistency().is_ok());

    // A third party sweeps the remainder.
    let liquidator = AccountId::random();
    let swept = engine
        .liquidate(&mut ledger, matched.debt_id, liquidator, &config, &crashed, now())
        .unwrap();
    assert_eq!(swept.kind, LiquidationKind::Liquidated);
    assert!(swept.closed);
    // Underwater: the liquidator takes all remaining collateral
    assert_eq!(
        swept.seized_collateral,
        dec!(1000) - exited.seized_collateral
    );
    assert_eq!(ledger.debt_count(), 0);
    assert_eq!(ledger.credit_count(), 0);
}

#[test]
fn overdue_position_replaced_then_repaid_by_new_borrower() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();
    let engine = LiquidationEngine::new();
    let new_borrower = AccountId::random();

    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(30),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();

    // 31 days later the position is overdue though fully collateralized.
    let late = Timestamp::from_unix(T0 + Tenor::from_days(31).as_seconds());
    let reading = at_price(dec!(2), late);

    // The replacement offer must still have runway past the new tenor.
    let replacement_offer = LimitOffer::new(
        Timestamp::from_unix(late.as_unix() + Tenor::from_days(120).as_seconds()),
        standing_offer().curve,
    );
    let outcome = engine
        .liquidate_with_replacement(
            &mut ledger,
            matched.debt_id,
            &replacement_offer,
            &ReplacementOrder {
                new_borrower,
                tenor: Tenor::from_days(60),
                collateral: dec!(1500),
            },
            AccountId::random(),
            &config,
            &reading,
            late,
        )
        .unwrap();

    assert_eq!(outcome.kind, LiquidationKind::ReplacedAndLiquidated);
    assert!(!outcome.closed);
    assert!(outcome.rate_spread_profit > Decimal::ZERO);

    // Same debt id, same face value, new borrower and schedule; the
    // original lender's claim is untouched.
    let debt = ledger.debt(matched.debt_id).unwrap();
    assert_eq!(debt.borrower, new_borrower);
    assert_eq!(debt.face_value, matched.face_value);
    assert_eq!(
        debt.due_date,
        late.checked_add(Tenor::from_days(60)).unwrap()
    );
    assert_eq!(
        ledger.credit(matched.credit_id).unwrap().credit,
        matched.face_value
    );

    // The new borrower repays at the new due date.
    let repaid = ledger.repay(matched.debt_id, matched.face_value).unwrap();
    assert!(repaid.closed);
    assert_eq!(ledger.debt_count(), 0);
}

#[test]
fn raising_the_minimum_ratio_makes_standing_positions_liquidatable() {
    let mut ledger = PositionLedger::new();
    let mut config = MarketConfig::default();
    let engine = LiquidationEngine::new();

    // Healthy at 1.3: collateral value 2000 against ~1016 face, ~1.97
    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(45),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();
    let debt = *ledger.debt(matched.debt_id).unwrap();
    let reading = at_price(dec!(2), now());
    assert!(!engine.is_liquidatable(&debt, &config, &reading, now()).unwrap());

    // Governance raises the minimum ratio above the position's ratio.
    config
        .update("min_collateral_ratio", 2_500_000_000_000_000_000)
        .unwrap();
    assert!(engine.is_liquidatable(&debt, &config, &reading, now()).unwrap());
}

#[test]
fn stale_reading_rejects_every_oracle_dependent_operation() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();
    let engine = LiquidationEngine::new();

    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(
                AccountId::random(),
                AccountId::random(),
                dec!(1000),
                dec!(1000),
                Tenor::from_days(45),
            ),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();

    // Reading older than the staleness interval at evaluation time
    let later = Timestamp::from_unix(T0 + 7_200);
    let stale = at_price(dec!(0.5), now());

    let err = engine
        .self_liquidate(&mut ledger, matched.credit_id, &config, &stale, later)
        .unwrap_err();
    assert!(matches!(err, TenoraError::StaleData(_)));

    let err = engine
        .liquidate(
            &mut ledger,
            matched.debt_id,
            AccountId::random(),
            &config,
            &stale,
            later,
        )
        .unwrap_err();
    assert!(matches!(err, TenoraError::StaleData(_)));

    // Nothing mutated
    assert_eq!(ledger.debt_count(), 1);
    assert_eq!(ledger.credit_count(), 1);
}

#[test]
fn liquidation_conserves_collateral() {
    let mut ledger = PositionLedger::new();
    let config = MarketConfig::default();
    let engine = LiquidationEngine::new();
    let borrower = AccountId::random();

    let matched = ledger
        .match_order(
            &standing_offer(),
            &order(borrower, AccountId::random(), dec!(1000), dec!(1000), Tenor::from_days(30)),
            &config,
            &at_price(dec!(2), now()),
            now(),
        )
        .unwrap();

    let late = Timestamp::from_unix(T0 + Tenor::from_days(31).as_seconds());
    let outcome = engine
        .liquidate(
            &mut ledger,
            matched.debt_id,
            AccountId::random(),
            &config,
            &at_price(dec!(2), late),
            late,
        )
        .unwrap();

    // Seized, returned, and the protocol's overdue cut account for
    // every unit of escrowed collateral.
    let collateral_moved: Decimal = outcome
        .instructions
        .iter()
        .filter(|i| i.asset == AssetKind::Collateral)
        .map(|i| i.amount)
        .sum();
    assert!(outcome.protocol_collateral > Decimal::ZERO);
    assert_eq!(collateral_moved + outcome.protocol_collateral, dec!(1000));

    // The returned leg goes back to the borrower.
    let returned = outcome
        .instructions
        .iter()
        .find(|i| i.asset == AssetKind::Collateral && i.to == Party::Account(borrower));
    assert!(returned.is_some());
}
