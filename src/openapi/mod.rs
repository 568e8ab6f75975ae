use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courier Ledger API",
        version = "0.1.0",
        description = r#"
# Courier Ledger API

Billing backend for pickup-and-drop delivery coordination.

Every order carries a pickup-billing mode (`pb`) and a drop-charge mode (`dc`),
each one of `COD`, `Prepaid` or `Due`. The service derives and stores the
settlement balance (`tsb`) and cash in hand (`cid`) for each order, folds them
into per-date vendor and team ledgers, and records partial settlements as
append-only ledger entries.

## Identity

Authentication happens upstream. Mutating endpoints require the forwarded
principal in `x-actor-id` and `x-actor-role` (`admin`, `owner`, `employee`,
`team`). Deleting an order requires `admin`.

## Error Handling

Failures return a JSON body with the request id:

```json
{
  "error": "Bad Request",
  "message": "Validation error: amount 600 exceeds the remaining balance of 500",
  "request_id": "6f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default and maximum
come from configuration).
        "#,
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "orders", description = "Order records and settlement audit"),
        (name = "settlement", description = "Stateless settlement preview"),
        (name = "vendors", description = "Vendor directory"),
        (name = "ledger", description = "Per-date CID and settlement ledgers"),
        (name = "commission", description = "Commission totals and payouts")
    ),
    paths(
        crate::handlers::settlement::preview,

        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::audit_settlement,

        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::lookup_vendor,

        crate::handlers::ledger::list_buckets,
        crate::handlers::ledger::submit,
        crate::handlers::ledger::statement,
        crate::handlers::ledger::list_entries,

        crate::handlers::commission::summary,
        crate::handlers::commission::payout,
    ),
    components(
        schemas(
            crate::settlement::PaymentMode,
            crate::settlement::Settlement,
            crate::settlement::SettlementRule,
            crate::entities::order_record::OrderStatus,
            crate::entities::order_record::OrderType,
            crate::entities::ledger_entry::LedgerEntryKind,
            crate::entities::ledger_entry::PartitionKind,

            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderRequest,
            crate::services::orders::UpdateOrderStatusRequest,
            crate::services::orders::OrderResponse,
            crate::services::orders::ContactResponse,
            crate::services::orders::SettlementPreview,
            crate::services::orders::SettlementAudit,

            crate::services::vendors::CreateVendorRequest,
            crate::services::vendors::VendorResponse,

            crate::ledger::DateBucket,
            crate::ledger::BalanceRow,
            crate::ledger::StatementPage,
            crate::ledger::CommissionPeriod,
            crate::services::ledger::SubmitRequest,
            crate::services::ledger::LedgerEntryResponse,
            crate::services::ledger::SubmissionReceipt,
            crate::services::commission::PayoutRequest,
            crate::services::commission::CommissionSummary,
            crate::services::commission::PayoutReceipt,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
