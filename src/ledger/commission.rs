//! Commission owed on drop charges and the payouts drawn against it.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{bucket_date, check_submission, LedgerSource, SubmissionRejected};
use crate::entities::ledger_entry::{self, LedgerEntryKind};

/// Commission owed on a set of records: the drop charges times the rate.
pub fn commission_for<R: LedgerSource>(records: &[R], rate: Decimal) -> Decimal {
    let drop_charges: Decimal = records.iter().map(LedgerSource::drop_charge).sum();
    drop_charges * rate
}

/// Commission earned on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CommissionPeriod {
    pub date: NaiveDate,
    pub drop_charges: Decimal,
    pub commission: Decimal,
}

pub fn commission_by_date<R: LedgerSource>(
    records: &[R],
    rate: Decimal,
    offset: &FixedOffset,
) -> Vec<CommissionPeriod> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        *totals
            .entry(bucket_date(record.created_at(), offset))
            .or_insert(Decimal::ZERO) += record.drop_charge();
    }
    totals
        .into_iter()
        .map(|(date, drop_charges)| CommissionPeriod {
            date,
            drop_charges,
            commission: drop_charges * rate,
        })
        .collect()
}

/// Commission total for a partition and what has been paid out against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CommissionTracker {
    pub rate: Decimal,
    pub total_commission: Decimal,
    pub paid_out: Decimal,
}

impl CommissionTracker {
    /// Builds the tracker from storage. Only commission payout entries count.
    pub fn from_records<R: LedgerSource>(
        records: &[R],
        entries: &[ledger_entry::Model],
        rate: Decimal,
    ) -> Self {
        let paid_out = entries
            .iter()
            .filter(|e| e.kind == LedgerEntryKind::CommissionPayout)
            .map(|e| e.amount)
            .sum();
        Self {
            rate,
            total_commission: commission_for(records, rate),
            paid_out,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.total_commission - self.paid_out
    }

    /// Pays out part of the remaining commission. Returns the new remaining.
    pub fn payout(&mut self, amount: Decimal) -> Result<Decimal, SubmissionRejected> {
        check_submission(amount, self.remaining())?;
        self.paid_out += amount;
        Ok(self.remaining())
    }
}
