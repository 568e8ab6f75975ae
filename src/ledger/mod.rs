//! Ledger bookkeeping over already-fetched order records.
//!
//! Nothing here touches the store. Services load the records and prior ledger
//! entries for one partition, fold them with these types, and persist whatever
//! entry a successful submission produces.

pub mod aggregator;
pub mod commission;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{ledger_entry::LedgerEntryKind, order_record};
use crate::errors::ServiceError;
use crate::settlement::Settlement;

pub use aggregator::{
    bucket_by_date, running_balance, statement_page, BalanceRow, DateBucket, RunningBalance,
    StatementPage,
};
pub use commission::{commission_by_date, commission_for, CommissionPeriod, CommissionTracker};

/// A row that contributes to a partition's ledger.
pub trait LedgerSource {
    fn record_id(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
    fn settlement(&self) -> Settlement;
    fn drop_charge(&self) -> Decimal;
}

impl LedgerSource for order_record::Model {
    fn record_id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn settlement(&self) -> Settlement {
        order_record::Model::settlement(self)
    }

    fn drop_charge(&self) -> Decimal {
        self.dc_amt
    }
}

/// Which stored settlement figure a ledger folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerField {
    Cid,
    Tsb,
}

impl LedgerField {
    pub fn of<R: LedgerSource>(&self, record: &R) -> Decimal {
        let settlement = record.settlement();
        match self {
            LedgerField::Cid => settlement.cid,
            LedgerField::Tsb => settlement.tsb,
        }
    }

    /// Field drawn down by a kind of entry. Commission payouts draw against
    /// the commission total instead and have no field.
    pub fn for_kind(kind: LedgerEntryKind) -> Option<Self> {
        match kind {
            LedgerEntryKind::CidSubmission => Some(LedgerField::Cid),
            LedgerEntryKind::SettlementPayment => Some(LedgerField::Tsb),
            LedgerEntryKind::CommissionPayout => None,
        }
    }
}

/// Reasons a submission or payout is refused before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionRejected {
    #[error("amount must be greater than zero (got {amount})")]
    NonPositive { amount: Decimal },

    #[error("amount {amount} exceeds the remaining balance of {remaining}")]
    ExceedsRemaining { amount: Decimal, remaining: Decimal },
}

impl From<SubmissionRejected> for ServiceError {
    fn from(err: SubmissionRejected) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Accepts `0 < amount <= remaining`.
pub fn check_submission(amount: Decimal, remaining: Decimal) -> Result<(), SubmissionRejected> {
    if amount <= Decimal::ZERO {
        return Err(SubmissionRejected::NonPositive { amount });
    }
    if amount > remaining {
        return Err(SubmissionRejected::ExceedsRemaining { amount, remaining });
    }
    Ok(())
}

/// Calendar date of a timestamp in the ledger's reference timezone.
pub fn bucket_date(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    at.with_timezone(offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn check_submission_bounds() {
        assert_eq!(
            check_submission(dec!(0), dec!(10)),
            Err(SubmissionRejected::NonPositive { amount: dec!(0) })
        );
        assert_eq!(
            check_submission(dec!(-5), dec!(10)),
            Err(SubmissionRejected::NonPositive { amount: dec!(-5) })
        );
        assert_eq!(
            check_submission(dec!(11), dec!(10)),
            Err(SubmissionRejected::ExceedsRemaining {
                amount: dec!(11),
                remaining: dec!(10)
            })
        );
        assert!(check_submission(dec!(10), dec!(10)).is_ok());
    }

    #[test]
    fn bucket_date_uses_fixed_offset() {
        let late_utc = Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let kathmandu = FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap();

        assert_eq!(
            bucket_date(late_utc, &utc),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            bucket_date(late_utc, &kathmandu),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn rejection_maps_to_validation_error() {
        let err: ServiceError = SubmissionRejected::NonPositive { amount: dec!(0) }.into();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
