use crate::errors::ServiceError;
use crate::AppState;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Pagination parameters for list operations
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    /// Page number, starting at 1 (default: 1)
    pub page: Option<u64>,
    /// Items per page, capped by configuration
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// Resolves `(page, per_page)` against the configured bounds.
    pub fn resolve(&self, state: &AppState) -> (u64, u64) {
        (
            self.page.unwrap_or(1).max(1),
            state.config.page_size(self.per_page),
        )
    }
}

pub fn total_pages(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page.max(1))
}

/// Parses a path segment into a typed label, turning failures into 400s.
pub fn parse_path<T>(raw: &str) -> Result<T, ServiceError>
where
    T: std::str::FromStr<Err = ServiceError>,
{
    raw.parse::<T>().map_err(|err| match err {
        ServiceError::ValidationError(msg) | ServiceError::InvalidStatus(msg) => {
            ServiceError::BadRequest(msg)
        }
        other => other,
    })
}
