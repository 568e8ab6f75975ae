use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::entities::ledger_entry::{LedgerEntryKind, PartitionKind};
use crate::handlers::common::{parse_path, PaginationParams};
use crate::ledger::{DateBucket, StatementPage};
use crate::services::ledger::{
    LedgerEntryResponse, LedgerPartition, SubmissionReceipt, SubmitRequest,
};
use crate::{auth::Actor, errors::ServiceError, ApiResponse, AppState};

fn partition(
    (kind, partition_kind, key): (String, String, String),
) -> Result<LedgerPartition, ServiceError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ServiceError::BadRequest(
            "Partition key must not be empty".to_string(),
        ));
    }
    Ok(LedgerPartition::new(
        parse_path::<LedgerEntryKind>(&kind)?,
        parse_path::<PartitionKind>(&partition_kind)?,
        key,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/ledger/{kind}/{partition_kind}/{key}/buckets",
    summary = "Per-date ledger buckets",
    description = "Orders of one vendor or team grouped by creation date, with what has already been submitted per date.",
    params(
        ("kind" = String, Path, description = "`cid` or `settlement`"),
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
    ),
    responses(
        (status = 200, description = "Buckets ordered by date", body = ApiResponse<Vec<DateBucket>>),
        (status = 400, description = "Unknown ledger or partition kind", body = crate::errors::ErrorResponse)
    ),
    tag = "ledger"
)]
pub async fn list_buckets(
    State(state): State<AppState>,
    Path(path): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Vec<DateBucket>>>, ServiceError> {
    let partition = partition(path)?;
    let buckets = state.services.ledger.buckets(&partition).await?;
    Ok(Json(ApiResponse::success(buckets)))
}

#[utoipa::path(
    post,
    path = "/api/v1/ledger/{kind}/{partition_kind}/{key}/submissions",
    summary = "Submit against a date bucket",
    description = "Records a partial settlement. Rejected when the amount is not positive or exceeds the bucket's remaining balance.",
    params(
        ("kind" = String, Path, description = "`cid` or `settlement`"),
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
    ),
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Submission recorded", body = ApiResponse<SubmissionReceipt>),
        (status = 400, description = "Amount rejected", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing actor identity", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent submission changed the balance", body = crate::errors::ErrorResponse)
    ),
    tag = "ledger"
)]
pub async fn submit(
    State(state): State<AppState>,
    Path(path): Path<(String, String, String)>,
    actor: Actor,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionReceipt>>), ServiceError> {
    let partition = partition(path)?;
    let receipt = state
        .services
        .ledger
        .submit(&actor, &partition, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}

#[utoipa::path(
    get,
    path = "/api/v1/ledger/{kind}/{partition_kind}/{key}/statement",
    summary = "Running-balance statement",
    params(
        ("kind" = String, Path, description = "`cid` or `settlement`"),
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "One statement page", body = ApiResponse<StatementPage>),
        (status = 400, description = "Unknown ledger or partition kind", body = crate::errors::ErrorResponse)
    ),
    tag = "ledger"
)]
pub async fn statement(
    State(state): State<AppState>,
    Path(path): Path<(String, String, String)>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<StatementPage>>, ServiceError> {
    let partition = partition(path)?;
    let (page, per_page) = params.resolve(&state);
    let page = state
        .services
        .ledger
        .statement(&partition, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/ledger/{kind}/{partition_kind}/{key}/entries",
    summary = "Ledger entries",
    params(
        ("kind" = String, Path, description = "`cid`, `settlement` or `commission`"),
        ("partition_kind" = String, Path, description = "`vendor` or `team`"),
        ("key" = String, Path, description = "Vendor email or team identifier"),
    ),
    responses(
        (status = 200, description = "Entries oldest first", body = ApiResponse<Vec<LedgerEntryResponse>>)
    ),
    tag = "ledger"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(path): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Vec<LedgerEntryResponse>>>, ServiceError> {
    let partition = partition(path)?;
    let entries = state.services.ledger.entries(&partition).await?;
    Ok(Json(ApiResponse::success(entries)))
}
