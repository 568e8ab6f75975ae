use crate::{
    auth::Actor,
    db::{begin_ledger_transaction, DbPool},
    entities::ledger_entry::{ActiveModel as LedgerEntryActiveModel, LedgerEntryKind, PartitionKind},
    errors::ServiceError,
    ledger::{commission_by_date, CommissionPeriod, CommissionTracker},
    repositories::{LedgerRepository, OrderRepository},
    services::ledger::LedgerEntryResponse,
};
use chrono::{FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoutRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CommissionSummary {
    pub partition_kind: PartitionKind,
    pub partition_key: String,
    pub rate: Decimal,
    pub total_commission: Decimal,
    pub paid_out: Decimal,
    pub remaining: Decimal,
    pub periods: Vec<CommissionPeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PayoutReceipt {
    pub entry: LedgerEntryResponse,
    pub remaining: Decimal,
}

/// Commission owed on drop charges and payouts made against it
#[derive(Clone)]
pub struct CommissionService {
    db_pool: Arc<DbPool>,
    rate: Decimal,
    offset: FixedOffset,
}

impl CommissionService {
    pub fn new(db_pool: Arc<DbPool>, rate: Decimal, offset: FixedOffset) -> Self {
        Self {
            db_pool,
            rate,
            offset,
        }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    async fn tracker<C: ConnectionTrait>(
        &self,
        conn: &C,
        partition_kind: PartitionKind,
        key: &str,
    ) -> Result<(CommissionTracker, Vec<CommissionPeriod>), ServiceError> {
        let records = OrderRepository::find_partition(conn, partition_kind, key).await?;
        let entries = LedgerRepository::entries_for(
            conn,
            LedgerEntryKind::CommissionPayout,
            partition_kind,
            key,
        )
        .await?;
        let tracker = CommissionTracker::from_records(&records, &entries, self.rate);
        let periods = commission_by_date(&records, self.rate, &self.offset);
        Ok((tracker, periods))
    }

    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        partition_kind: PartitionKind,
        key: &str,
    ) -> Result<CommissionSummary, ServiceError> {
        let (tracker, periods) = self.tracker(&*self.db_pool, partition_kind, key).await?;
        Ok(CommissionSummary {
            partition_kind,
            partition_key: key.to_string(),
            rate: tracker.rate,
            total_commission: tracker.total_commission,
            paid_out: tracker.paid_out,
            remaining: tracker.remaining(),
            periods,
        })
    }

    /// Pays out part of the remaining commission inside one ledger transaction.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn payout(
        &self,
        actor: &Actor,
        partition_kind: PartitionKind,
        key: &str,
        amount: Decimal,
    ) -> Result<PayoutReceipt, ServiceError> {
        let txn = begin_ledger_transaction(&self.db_pool)
            .await
            .map_err(ServiceError::from_store)?;

        let (mut tracker, _) = self
            .tracker(&txn, partition_kind, key)
            .await
            .map_err(ServiceError::promote_conflict)?;

        let remaining = match tracker.payout(amount) {
            Ok(remaining) => remaining,
            Err(rejected) => {
                metrics::counter!("courier_ledger.commission.payouts_rejected", 1);
                warn!(reason = %rejected, "Commission payout rejected");
                return Err(rejected.into());
            }
        };

        let entry = LedgerRepository::append(
            &txn,
            LedgerEntryActiveModel {
                kind: Set(LedgerEntryKind::CommissionPayout),
                partition_kind: Set(partition_kind),
                partition_key: Set(key.to_string()),
                bucket_date: Set(None),
                amount: Set(amount),
                created_at: Set(Utc::now()),
                created_by: Set(Some(actor.id.clone())),
                ..Default::default()
            },
        )
        .await
        .map_err(ServiceError::promote_conflict)?;

        txn.commit().await.map_err(ServiceError::from_store)?;

        metrics::counter!("courier_ledger.commission.payouts_accepted", 1);
        info!(entry_id = entry.id, remaining = %remaining, "Commission payout recorded");

        Ok(PayoutReceipt {
            entry: entry.into(),
            remaining,
        })
    }
}
