//! Property-based tests for the settlement and ledger arithmetic.

use chrono::{Duration, TimeZone, Utc};
use courier_ledger::entities::ledger_entry::{self, LedgerEntryKind, PartitionKind};
use courier_ledger::entities::order_record::{Model, OrderStatus, OrderType};
use courier_ledger::ledger::{
    running_balance, statement_page, CommissionTracker, DateBucket, LedgerField,
};
use courier_ledger::settlement::{evaluate, PaymentMode, SettlementRule};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn mode_strategy() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::Cod),
        Just(PaymentMode::Prepaid),
        Just(PaymentMode::Due),
    ]
}

/// Non-negative amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn order(id: i32, pb: PaymentMode, dc: PaymentMode, pb_amt: Decimal, dc_amt: Decimal) -> Model {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::hours(id as i64);
    let settlement = evaluate(pb, dc, pb_amt, dc_amt);
    Model {
        id,
        created_at,
        updated_at: created_at,
        pickup_name: "Pickup".into(),
        pickup_address: "1 Road".into(),
        pickup_phone: "100".into(),
        drop_name: "Drop".into(),
        drop_address: "2 Road".into(),
        drop_phone: "200".into(),
        vendor: Some("v@example.com".into()),
        team: None,
        pb,
        dc,
        pb_amt,
        dc_amt,
        tsb: settlement.tsb,
        cid: settlement.cid,
        status: OrderStatus::Pending,
        order_type: OrderType::Delivery,
        notes: None,
        created_by: None,
    }
}

fn entry(id: i32, kind: LedgerEntryKind, amount: Decimal) -> ledger_entry::Model {
    ledger_entry::Model {
        id,
        kind,
        partition_kind: PartitionKind::Team,
        partition_key: "north".into(),
        bucket_date: None,
        amount,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
        created_by: Some("owner-1".into()),
    }
}

fn orders_strategy() -> impl Strategy<Value = Vec<Model>> {
    prop::collection::vec(
        (mode_strategy(), mode_strategy(), amount_strategy(), amount_strategy()),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (pb, dc, pb_amt, dc_amt))| order(i as i32 + 1, pb, dc, pb_amt, dc_amt))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn stored_settlement_matches_rule_table(
        pb in mode_strategy(),
        dc in mode_strategy(),
        pb_amt in amount_strategy(),
        dc_amt in amount_strategy(),
    ) {
        let model = order(1, pb, dc, pb_amt, dc_amt);
        prop_assert!(!model.has_settlement_drift());
        prop_assert_eq!(model.settlement(), SettlementRule::for_modes(pb, dc).apply(pb_amt, dc_amt));
    }

    #[test]
    fn cash_in_hand_is_never_negative(
        pb in mode_strategy(),
        dc in mode_strategy(),
        pb_amt in amount_strategy(),
        dc_amt in amount_strategy(),
    ) {
        prop_assert!(evaluate(pb, dc, pb_amt, dc_amt).cid >= Decimal::ZERO);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn statement_pages_concatenate_to_the_full_statement(
        records in orders_strategy(),
        per_page in 1u64..10,
        use_tsb in any::<bool>(),
    ) {
        let field = if use_tsb { LedgerField::Tsb } else { LedgerField::Cid };
        let full = running_balance(&records, field);

        let mut stitched = Vec::new();
        let mut carried = Decimal::ZERO;
        let pages = (records.len() as u64).div_ceil(per_page).max(1);
        for page in 1..=pages {
            let slice = statement_page(&records, field, page, per_page);
            prop_assert_eq!(slice.opening_balance, carried);
            carried = slice.closing_balance;
            stitched.extend(slice.rows);
        }

        prop_assert_eq!(stitched, full);
    }

    #[test]
    fn accepted_submissions_never_overdraw(
        original in amount_strategy(),
        attempts in prop::collection::vec(amount_strategy(), 1..20),
    ) {
        let mut bucket = DateBucket::new(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        bucket.original_total = original;

        for amount in attempts {
            let before = bucket.remaining();
            match bucket.submit(amount) {
                Ok(remaining) => {
                    prop_assert!(amount > Decimal::ZERO && amount <= before);
                    prop_assert_eq!(remaining, before - amount);
                }
                Err(_) => prop_assert_eq!(bucket.remaining(), before),
            }
            prop_assert!(bucket.remaining() >= Decimal::ZERO);
        }
    }

    #[test]
    fn commission_payouts_stay_within_what_is_owed(
        records in orders_strategy(),
        payouts in prop::collection::vec(amount_strategy(), 0..10),
    ) {
        let rate = Decimal::new(7, 1);
        let mut tracker = CommissionTracker::from_records(&records, &[], rate);
        let owed: Decimal = records.iter().map(|r| r.dc_amt).sum::<Decimal>() * rate;
        prop_assert_eq!(tracker.total_commission, owed);

        // A cash-in-hand submission in the same partition never counts as a payout.
        let mut entries = vec![entry(1, LedgerEntryKind::CidSubmission, Decimal::ONE)];
        for amount in payouts {
            let before = tracker.clone();
            match tracker.payout(amount) {
                Ok(remaining) => {
                    prop_assert_eq!(remaining, before.remaining() - amount);
                    prop_assert_eq!(tracker.remaining(), remaining);
                    entries.push(entry(entries.len() as i32 + 1, LedgerEntryKind::CommissionPayout, amount));
                }
                Err(_) => prop_assert_eq!(&tracker, &before),
            }
            prop_assert!(tracker.paid_out <= tracker.total_commission);

            let rebuilt = CommissionTracker::from_records(&records, &entries, rate);
            prop_assert_eq!(rebuilt.remaining(), tracker.remaining());
            prop_assert_eq!(&rebuilt, &tracker);
        }
    }
}
