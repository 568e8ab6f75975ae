use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::handlers::common::{total_pages, PaginationParams};
use crate::services::vendors::{CreateVendorRequest, VendorResponse};
use crate::{auth::Actor, errors::ServiceError, ApiResponse, AppState, PaginatedResponse};

#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    summary = "Register vendor",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = ApiResponse<VendorResponse>),
        (status = 400, description = "Invalid vendor profile", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing actor identity", body = crate::errors::ErrorResponse),
        (status = 409, description = "Vendor name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VendorResponse>>), ServiceError> {
    tracing::debug!(actor = %actor.id, "registering vendor");
    let vendor = state.services.vendors.create_vendor(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(vendor))))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    summary = "List vendors",
    params(PaginationParams),
    responses(
        (status = 200, description = "Vendors ordered by name", body = ApiResponse<PaginatedResponse<VendorResponse>>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<VendorResponse>>>, ServiceError> {
    let (page, per_page) = params.resolve(&state);
    let (items, total) = state.services.vendors.list_vendors(page, per_page).await?;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit: per_page,
        total_pages: total_pages(total, per_page),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors/lookup/{name}",
    summary = "Look up vendor by name",
    params(("name" = String, Path, description = "Exact vendor name")),
    responses(
        (status = 200, description = "Vendor found", body = ApiResponse<VendorResponse>),
        (status = 404, description = "No vendor with that name", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn lookup_vendor(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<VendorResponse>>, ServiceError> {
    let vendor = state.services.vendors.lookup(&name).await?;
    Ok(Json(ApiResponse::success(vendor)))
}
