use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::ledger_entry::{
    ActiveModel as LedgerEntryActiveModel, Column, Entity as LedgerEntry, LedgerEntryKind,
    Model as LedgerEntryModel, PartitionKind,
};
use crate::errors::AppError;

/// Append-only access to ledger entries.
///
/// Both operations take any connection so a submission can read and append
/// inside the same transaction. Entries are never updated or deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    /// Entries of one kind for a partition, in insertion order.
    pub async fn entries_for<C: ConnectionTrait>(
        conn: &C,
        kind: LedgerEntryKind,
        partition_kind: PartitionKind,
        partition_key: &str,
    ) -> Result<Vec<LedgerEntryModel>, AppError> {
        LedgerEntry::find()
            .filter(Column::Kind.eq(kind))
            .filter(Column::PartitionKind.eq(partition_kind))
            .filter(Column::PartitionKey.eq(partition_key))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(AppError::DatabaseError)
    }

    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        entry: LedgerEntryActiveModel,
    ) -> Result<LedgerEntryModel, AppError> {
        entry.insert(conn).await.map_err(AppError::DatabaseError)
    }
}
