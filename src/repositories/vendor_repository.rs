use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::vendor::{
    ActiveModel as VendorActiveModel, Column, Entity as Vendor, Model as VendorModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for vendor profiles
#[derive(Debug, Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<VendorModel>, AppError> {
        Vendor::find()
            .filter(Column::Name.eq(name))
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Vendors ordered by name. Pages are 1-based.
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<VendorModel>, u64), AppError> {
        let paginator = Vendor::find()
            .order_by_asc(Column::Name)
            .paginate(self.base.get_db(), page_size.max(1));

        let total = paginator.num_items().await?;
        let vendors = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((vendors, total))
    }

    pub async fn create(&self, vendor: VendorActiveModel) -> Result<VendorModel, AppError> {
        vendor
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }
}

impl Repository for VendorRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
