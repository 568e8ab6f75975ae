use crate::{
    db::DbPool,
    entities::vendor::{ActiveModel as VendorActiveModel, Model as VendorModel},
    errors::ServiceError,
    repositories::VendorRepository,
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 120, message = "Vendor name must be between 1 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Vendor email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Vendor phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Vendor address is required"))]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VendorResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<VendorModel> for VendorResponse {
    fn from(model: VendorModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            created_at: model.created_at,
        }
    }
}

/// Vendor directory
#[derive(Clone)]
pub struct VendorService {
    repository: VendorRepository,
}

impl VendorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repository: VendorRepository::new(db_pool),
        }
    }

    /// Registers a vendor. Names are unique.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_vendor(
        &self,
        request: CreateVendorRequest,
    ) -> Result<VendorResponse, ServiceError> {
        let name = request.name.trim().to_string();
        let model = VendorModel {
            id: 0,
            name: name.clone(),
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            address: request.address.trim().to_string(),
            created_at: Utc::now(),
        };
        model.validate()?;

        if self.repository.find_by_name(&name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Vendor named '{}' already exists",
                name
            )));
        }

        let vendor = self
            .repository
            .create(VendorActiveModel {
                name: Set(model.name),
                email: Set(model.email),
                phone: Set(model.phone),
                address: Set(model.address),
                created_at: Set(model.created_at),
                ..Default::default()
            })
            .await?;

        info!(vendor_id = vendor.id, "Vendor created");
        Ok(vendor.into())
    }

    pub async fn list_vendors(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<VendorResponse>, u64), ServiceError> {
        let (vendors, total) = self.repository.find_all(page.max(1), per_page).await?;
        Ok((vendors.into_iter().map(Into::into).collect(), total))
    }

    /// Exact-name lookup. A miss is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<VendorModel>, ServiceError> {
        self.repository.find_by_name(name.trim()).await
    }

    pub async fn lookup(&self, name: &str) -> Result<VendorResponse, ServiceError> {
        self.find_by_name(name)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor '{}' not found", name)))
    }
}
