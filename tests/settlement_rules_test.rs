use courier_ledger::settlement::{evaluate, PaymentMode, Settlement, SettlementRule};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use PaymentMode::{Cod, Due, Prepaid};

#[rstest]
#[case::cod_due(Cod, Due, SettlementRule::CodDue, dec!(400), dec!(500))]
#[case::cod_prepaid(Cod, Prepaid, SettlementRule::CodPrepaid, dec!(500), dec!(500))]
#[case::cod_cod(Cod, Cod, SettlementRule::CodCod, dec!(500), dec!(600))]
#[case::prepaid_due(Prepaid, Due, SettlementRule::PrepaidDue, dec!(400), dec!(0))]
#[case::prepaid_prepaid(Prepaid, Prepaid, SettlementRule::PrepaidPrepaid, dec!(0), dec!(0))]
#[case::prepaid_cod(Prepaid, Cod, SettlementRule::PrepaidCod, dec!(0), dec!(100))]
#[case::due_due(Due, Due, SettlementRule::DueDue, dec!(-600), dec!(0))]
#[case::due_prepaid(Due, Prepaid, SettlementRule::DuePrepaid, dec!(-100), dec!(100))]
#[case::due_cod(Due, Cod, SettlementRule::DueCod, dec!(600), dec!(100))]
fn every_rule_cell(
    #[case] pb: PaymentMode,
    #[case] dc: PaymentMode,
    #[case] rule: SettlementRule,
    #[case] tsb: Decimal,
    #[case] cid: Decimal,
) {
    assert_eq!(SettlementRule::for_modes(pb, dc), rule);
    assert_eq!(evaluate(pb, dc, dec!(500), dec!(100)), Settlement { tsb, cid });
}

#[test]
fn cod_pickup_with_due_drop_charge() {
    let outcome = evaluate(Cod, Due, dec!(500), dec!(100));
    assert_eq!(outcome.tsb, dec!(400));
    assert_eq!(outcome.cid, dec!(500));
}

#[test]
fn fully_prepaid_order_settles_nothing() {
    let outcome = evaluate(Prepaid, Prepaid, dec!(300), dec!(50));
    assert_eq!(outcome, Settlement::default());
}

#[rstest]
fn zero_amounts_settle_to_zero(
    #[values(Cod, Prepaid, Due)] pb: PaymentMode,
    #[values(Cod, Prepaid, Due)] dc: PaymentMode,
) {
    let outcome = evaluate(pb, dc, Decimal::ZERO, Decimal::ZERO);
    assert!(outcome.tsb.is_zero());
    assert!(outcome.cid.is_zero());
}

#[test]
fn fractional_amounts_keep_exact_precision() {
    let outcome = evaluate(Cod, Cod, dec!(0.10), dec!(0.20));
    assert_eq!(outcome.cid, dec!(0.30));
}

#[test]
fn missing_amounts_count_as_zero_and_negatives_are_refused() {
    let outcome = Settlement::try_evaluate(Due, Cod, None, Some(dec!(40))).unwrap();
    assert_eq!(outcome.tsb, dec!(40));
    assert_eq!(outcome.cid, dec!(40));

    assert!(Settlement::try_evaluate(Cod, Cod, Some(dec!(-1)), None).is_err());
}

#[test]
fn mode_labels_parse_loosely() {
    assert_eq!("cod".parse::<PaymentMode>().unwrap(), Cod);
    assert_eq!(" Prepaid ".parse::<PaymentMode>().unwrap(), Prepaid);
    assert_eq!("DUE".parse::<PaymentMode>().unwrap(), Due);
    assert!("card".parse::<PaymentMode>().is_err());
}
