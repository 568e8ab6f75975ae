use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::ledger_entry::PartitionKind;
use crate::entities::order_record::{
    ActiveModel as OrderActiveModel, Column, Entity as OrderRecord, Model as OrderModel,
    OrderStatus, OrderType,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Equality filters for order listings. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    pub vendor: Option<String>,
    pub team: Option<String>,
}

impl OrderFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(status) = self.status {
            condition = condition.add(Column::Status.eq(status));
        }
        if let Some(order_type) = self.order_type {
            condition = condition.add(Column::OrderType.eq(order_type));
        }
        if let Some(vendor) = &self.vendor {
            condition = condition.add(Column::Vendor.eq(vendor.as_str()));
        }
        if let Some(team) = &self.team {
            condition = condition.add(Column::Team.eq(team.as_str()));
        }
        condition
    }
}

fn partition_column(kind: PartitionKind) -> Column {
    match kind {
        PartitionKind::Vendor => Column::Vendor,
        PartitionKind::Team => Column::Team,
    }
}

/// Repository for order record operations
#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, AppError> {
        OrderRecord::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Newest-first page of orders matching `filter`. Pages are 1-based.
    pub async fn find_filtered(
        &self,
        filter: &OrderFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<OrderModel>, u64), AppError> {
        let paginator = OrderRecord::find()
            .filter(filter.condition())
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(self.base.get_db(), page_size.max(1));

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((orders, total))
    }

    /// Every order in one vendor or team partition, oldest first.
    ///
    /// Takes any connection so ledger writes can read inside their transaction.
    pub async fn find_partition<C: ConnectionTrait>(
        conn: &C,
        kind: PartitionKind,
        key: &str,
    ) -> Result<Vec<OrderModel>, AppError> {
        OrderRecord::find()
            .filter(partition_column(kind).eq(key))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Create a new order
    pub async fn create(&self, order: OrderActiveModel) -> Result<OrderModel, AppError> {
        order
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Persist changed columns of an existing order
    pub async fn update(&self, order: OrderActiveModel) -> Result<OrderModel, AppError> {
        order
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Hard-delete an order. Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = OrderRecord::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected > 0)
    }
}

impl Repository for OrderRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
