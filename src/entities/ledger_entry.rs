use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Kind of partial settlement recorded against an accumulated balance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum LedgerEntryKind {
    /// Cash in hand remitted, drawn against `cid`
    #[sea_orm(string_value = "cid_submission")]
    CidSubmission,
    /// Settlement balance paid, drawn against `tsb`
    #[sea_orm(string_value = "settlement_payment")]
    SettlementPayment,
    /// Commission paid out, drawn against the commission total
    #[sea_orm(string_value = "commission_payout")]
    CommissionPayout,
}

impl std::str::FromStr for LedgerEntryKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cid" | "cid-submission" => Ok(LedgerEntryKind::CidSubmission),
            "tsb" | "settlement" | "settlement-payment" => Ok(LedgerEntryKind::SettlementPayment),
            "commission" | "commission-payout" => Ok(LedgerEntryKind::CommissionPayout),
            other => Err(ServiceError::ValidationError(format!(
                "Unknown ledger kind: {other}"
            ))),
        }
    }
}

/// Whether a partition key names a vendor or a team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    #[sea_orm(string_value = "vendor")]
    Vendor,
    #[sea_orm(string_value = "team")]
    Team,
}

impl std::str::FromStr for PartitionKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vendor" | "vendors" => Ok(PartitionKind::Vendor),
            "team" | "teams" => Ok(PartitionKind::Team),
            other => Err(ServiceError::ValidationError(format!(
                "Unknown partition kind: {other}"
            ))),
        }
    }
}

/// Append-only ledger entry. Never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub kind: LedgerEntryKind,

    pub partition_kind: PartitionKind,

    /// Vendor email or team identifier
    pub partition_key: String,

    /// Date bucket the entry settles; `None` for partition-wide payouts
    pub bucket_date: Option<NaiveDate>,

    pub amount: Decimal,

    pub created_at: DateTime<Utc>,

    /// Actor that recorded the entry
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_short_labels() {
        assert_eq!(
            "cid".parse::<LedgerEntryKind>().unwrap(),
            LedgerEntryKind::CidSubmission
        );
        assert_eq!(
            "settlement_payment".parse::<LedgerEntryKind>().unwrap(),
            LedgerEntryKind::SettlementPayment
        );
        assert!("refund".parse::<LedgerEntryKind>().is_err());
    }

    #[test]
    fn partition_kind_accepts_plural() {
        assert_eq!(
            "teams".parse::<PartitionKind>().unwrap(),
            PartitionKind::Team
        );
    }
}
