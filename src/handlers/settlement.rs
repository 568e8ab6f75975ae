use axum::{extract::Query, response::Json};

use crate::services::orders::{preview_settlement, SettlementPreview, SettlementPreviewQuery};
use crate::{errors::ServiceError, ApiResponse};

/// Stateless settlement calculation for order forms
#[utoipa::path(
    get,
    path = "/api/v1/settlement/preview",
    summary = "Preview settlement",
    description = "Evaluates tsb and cid for a payment-mode pair without storing anything. Missing amounts count as zero.",
    params(SettlementPreviewQuery),
    responses(
        (status = 200, description = "Settlement evaluated", body = ApiResponse<SettlementPreview>),
        (status = 400, description = "Unknown mode or negative amount", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn preview(
    Query(query): Query<SettlementPreviewQuery>,
) -> Result<Json<ApiResponse<SettlementPreview>>, ServiceError> {
    let preview = preview_settlement(&query)?;
    Ok(Json(ApiResponse::success(preview)))
}
