//! Per-date buckets and running-balance statements over order records.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{bucket_date, check_submission, LedgerField, LedgerSource, SubmissionRejected};
use crate::entities::ledger_entry;

/// Orders created on one calendar date, with what has already been settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub order_ids: Vec<i32>,
    pub original_total: Decimal,
    pub already_submitted: Decimal,
}

impl DateBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            order_ids: Vec::new(),
            original_total: Decimal::ZERO,
            already_submitted: Decimal::ZERO,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.original_total - self.already_submitted
    }

    /// Records a partial settlement against this bucket. Nothing changes when
    /// the amount is refused. Returns the new remaining balance.
    pub fn submit(&mut self, amount: Decimal) -> Result<Decimal, SubmissionRejected> {
        check_submission(amount, self.remaining())?;
        self.already_submitted += amount;
        Ok(self.remaining())
    }
}

/// Groups records by creation date and nets off prior entries per date.
///
/// Entries without a bucket date are ignored. Entries dated on a day with no
/// orders still produce a bucket so over-submission stays visible.
pub fn bucket_by_date<R: LedgerSource>(
    records: &[R],
    entries: &[ledger_entry::Model],
    field: LedgerField,
    offset: &FixedOffset,
) -> Vec<DateBucket> {
    let mut buckets: BTreeMap<NaiveDate, DateBucket> = BTreeMap::new();

    for record in records {
        let date = bucket_date(record.created_at(), offset);
        let bucket = buckets
            .entry(date)
            .or_insert_with(|| DateBucket::new(date));
        bucket.order_ids.push(record.record_id());
        bucket.original_total += field.of(record);
    }

    for entry in entries {
        if let Some(date) = entry.bucket_date {
            buckets
                .entry(date)
                .or_insert_with(|| DateBucket::new(date))
                .already_submitted += entry.amount;
        }
    }

    buckets.into_values().collect()
}

/// One record with the partition balance as of that record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BalanceRow {
    pub order_id: i32,
    pub created_at: DateTime<Utc>,
    pub amount: Decimal,
    pub balance: Decimal,
}

/// Accumulator for running balances in creation order.
#[derive(Debug, Clone, Copy)]
pub struct RunningBalance {
    field: LedgerField,
    balance: Decimal,
}

impl RunningBalance {
    pub fn new(field: LedgerField) -> Self {
        Self::with_opening(field, Decimal::ZERO)
    }

    pub fn with_opening(field: LedgerField, opening: Decimal) -> Self {
        Self {
            field,
            balance: opening,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Folds one record in and returns its snapshot row.
    pub fn fold<R: LedgerSource>(&mut self, record: &R) -> BalanceRow {
        let amount = self.field.of(record);
        self.balance += amount;
        BalanceRow {
            order_id: record.record_id(),
            created_at: record.created_at(),
            amount,
            balance: self.balance,
        }
    }
}

/// Running balance over records already sorted by creation time.
pub fn running_balance<R: LedgerSource>(records: &[R], field: LedgerField) -> Vec<BalanceRow> {
    let mut acc = RunningBalance::new(field);
    records.iter().map(|record| acc.fold(record)).collect()
}

/// A page of a partition statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatementPage {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub rows: Vec<BalanceRow>,
}

/// Slices a statement into pages without resetting the accumulator: page `n`
/// opens with the balance of every record before it.
pub fn statement_page<R: LedgerSource>(
    records: &[R],
    field: LedgerField,
    page: u64,
    per_page: u64,
) -> StatementPage {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = records.len() as u64;
    let total_pages = total.div_ceil(per_page);

    let start = usize::try_from((page - 1).saturating_mul(per_page))
        .unwrap_or(usize::MAX)
        .min(records.len());
    let end = usize::try_from(per_page)
        .ok()
        .and_then(|len| start.checked_add(len))
        .unwrap_or(usize::MAX)
        .min(records.len());

    let opening: Decimal = records[..start].iter().map(|r| field.of(r)).sum();
    let mut acc = RunningBalance::with_opening(field, opening);
    let rows: Vec<BalanceRow> = records[start..end].iter().map(|r| acc.fold(r)).collect();

    StatementPage {
        page,
        per_page,
        total,
        total_pages,
        opening_balance: opening,
        closing_balance: acc.balance(),
        rows,
    }
}
