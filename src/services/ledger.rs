use crate::{
    auth::Actor,
    db::{begin_ledger_transaction, DbPool},
    entities::ledger_entry::{
        ActiveModel as LedgerEntryActiveModel, LedgerEntryKind, Model as LedgerEntryModel,
        PartitionKind,
    },
    errors::ServiceError,
    ledger::{bucket_by_date, statement_page, DateBucket, LedgerField, StatementPage},
    repositories::{LedgerRepository, OrderRepository},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// One vendor or team ledger of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPartition {
    pub kind: LedgerEntryKind,
    pub partition_kind: PartitionKind,
    pub key: String,
}

impl LedgerPartition {
    pub fn new(kind: LedgerEntryKind, partition_kind: PartitionKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            partition_kind,
            key: key.into(),
        }
    }

    /// Field this ledger draws against. Commission has its own tracker.
    pub fn field(&self) -> Result<LedgerField, ServiceError> {
        LedgerField::for_kind(self.kind).ok_or_else(|| {
            ServiceError::BadRequest(
                "Commission payouts are tracked under /commission, not per date".to_string(),
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// Date bucket being settled
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryResponse {
    pub id: i32,
    pub kind: LedgerEntryKind,
    pub partition_kind: PartitionKind,
    pub partition_key: String,
    pub bucket_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<LedgerEntryModel> for LedgerEntryResponse {
    fn from(model: LedgerEntryModel) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            partition_kind: model.partition_kind,
            partition_key: model.partition_key,
            bucket_date: model.bucket_date,
            amount: model.amount,
            created_at: model.created_at,
            created_by: model.created_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmissionReceipt {
    pub entry: LedgerEntryResponse,
    /// The bucket after the submission was applied
    pub bucket: DateBucket,
}

/// Per-date ledgers for CID submissions and settlement payments
#[derive(Clone)]
pub struct LedgerService {
    db_pool: Arc<DbPool>,
    offset: FixedOffset,
}

impl LedgerService {
    pub fn new(db_pool: Arc<DbPool>, offset: FixedOffset) -> Self {
        Self { db_pool, offset }
    }

    async fn load_buckets<C: ConnectionTrait>(
        &self,
        conn: &C,
        partition: &LedgerPartition,
    ) -> Result<Vec<DateBucket>, ServiceError> {
        let field = partition.field()?;
        let records =
            OrderRepository::find_partition(conn, partition.partition_kind, &partition.key).await?;
        let entries = LedgerRepository::entries_for(
            conn,
            partition.kind,
            partition.partition_kind,
            &partition.key,
        )
        .await?;
        Ok(bucket_by_date(&records, &entries, field, &self.offset))
    }

    /// Per-date totals with what has already been submitted against each.
    #[instrument(skip(self), fields(kind = ?partition.kind, key = %partition.key))]
    pub async fn buckets(&self, partition: &LedgerPartition) -> Result<Vec<DateBucket>, ServiceError> {
        self.load_buckets(&*self.db_pool, partition).await
    }

    /// Records a partial settlement against one date bucket.
    ///
    /// The remaining balance is re-read, checked and the entry inserted in one
    /// transaction so concurrent submissions cannot both pass the check.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id, kind = ?partition.kind, key = %partition.key, date = %request.date, amount = %request.amount))]
    pub async fn submit(
        &self,
        actor: &Actor,
        partition: &LedgerPartition,
        request: SubmitRequest,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let txn = begin_ledger_transaction(&self.db_pool)
            .await
            .map_err(ServiceError::from_store)?;

        let mut bucket = self
            .load_buckets(&txn, partition)
            .await
            .map_err(ServiceError::promote_conflict)?
            .into_iter()
            .find(|b| b.date == request.date)
            .unwrap_or_else(|| DateBucket::new(request.date));

        if let Err(rejected) = bucket.submit(request.amount) {
            metrics::counter!("courier_ledger.ledger.submissions_rejected", 1);
            warn!(reason = %rejected, "Ledger submission rejected");
            return Err(rejected.into());
        }

        let entry = LedgerRepository::append(
            &txn,
            LedgerEntryActiveModel {
                kind: Set(partition.kind),
                partition_kind: Set(partition.partition_kind),
                partition_key: Set(partition.key.clone()),
                bucket_date: Set(Some(request.date)),
                amount: Set(request.amount),
                created_at: Set(Utc::now()),
                created_by: Set(Some(actor.id.clone())),
                ..Default::default()
            },
        )
        .await
        .map_err(ServiceError::promote_conflict)?;

        txn.commit().await.map_err(ServiceError::from_store)?;

        metrics::counter!("courier_ledger.ledger.submissions_accepted", 1);
        info!(entry_id = entry.id, remaining = %bucket.remaining(), "Ledger submission recorded");

        Ok(SubmissionReceipt {
            entry: entry.into(),
            bucket,
        })
    }

    /// Running-balance statement page. Page `n` opens with the balance of
    /// every earlier record.
    #[instrument(skip(self), fields(kind = ?partition.kind, key = %partition.key))]
    pub async fn statement(
        &self,
        partition: &LedgerPartition,
        page: u64,
        per_page: u64,
    ) -> Result<StatementPage, ServiceError> {
        let field = partition.field()?;
        let records = OrderRepository::find_partition(
            &*self.db_pool,
            partition.partition_kind,
            &partition.key,
        )
        .await?;
        Ok(statement_page(&records, field, page, per_page))
    }

    /// Prior entries of the partition, oldest first.
    pub async fn entries(
        &self,
        partition: &LedgerPartition,
    ) -> Result<Vec<LedgerEntryResponse>, ServiceError> {
        let entries = LedgerRepository::entries_for(
            &*self.db_pool,
            partition.kind,
            partition.partition_kind,
            &partition.key,
        )
        .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_partitions_have_no_date_field() {
        let partition = LedgerPartition::new(
            LedgerEntryKind::CommissionPayout,
            PartitionKind::Team,
            "north",
        );
        assert!(matches!(partition.field(), Err(ServiceError::BadRequest(_))));

        let partition =
            LedgerPartition::new(LedgerEntryKind::CidSubmission, PartitionKind::Vendor, "v@x.io");
        assert_eq!(partition.field().unwrap(), LedgerField::Cid);
    }
}
