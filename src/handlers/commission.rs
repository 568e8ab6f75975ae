use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::entities::ledger_entry::PartitionKind;
use crate::handlers::common::parse_path;
use crate::services::commission::{CommissionSummary, PayoutReceipt, PayoutRequest};
use crate::{auth::Actor, errors::ServiceError, ApiResponse, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/commission/{partition_kind}/{key}",
    summary = "Commission summary",
    description = "Commission owed on the partition's drop charges at the configured rate, what has been paid out and a per-date breakdown.",
    params(
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
    ),
    responses(
        (status = 200, description = "Commission summary", body = ApiResponse<CommissionSummary>),
        (status = 400, description = "Unknown partition kind", body = crate::errors::ErrorResponse)
    ),
    tag = "commission"
)]
pub async fn summary(
    State(state): State<AppState>,
    Path((partition_kind, key)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CommissionSummary>>, ServiceError> {
    let partition_kind = parse_path::<PartitionKind>(&partition_kind)?;
    let summary = state
        .services
        .commission
        .summary(partition_kind, key.trim())
        .await?;
    Ok(Json(ApiResponse::success(summary)))
}

#[utoipa::path(
    post,
    path = "/api/v1/commission/{partition_kind}/{key}/payouts",
    summary = "Pay out commission",
    params(
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
    ),
    request_body = PayoutRequest,
    responses(
        (status = 201, description = "Payout recorded", body = ApiResponse<PayoutReceipt>),
        (status = 400, description = "Amount rejected", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing actor identity", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent payout changed the balance", body = crate::errors::ErrorResponse)
    ),
    tag = "commission"
)]
pub async fn payout(
    State(state): State<AppState>,
    Path((partition_kind, key)): Path<(String, String)>,
    actor: Actor,
    Json(request): Json<PayoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PayoutReceipt>>), ServiceError> {
    let partition_kind = parse_path::<PartitionKind>(&partition_kind)?;
    let receipt = state
        .services
        .commission
        .payout(&actor, partition_kind, key.trim(), request.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}
