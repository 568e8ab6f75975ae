use crate::{
    auth::{Actor, ActorRole},
    db::DbPool,
    entities::order_record::{
        ActiveModel as OrderActiveModel, Model as OrderModel, OrderStatus, OrderType,
    },
    errors::ServiceError,
    repositories::{OrderFilter, OrderRepository},
    services::vendors::VendorService,
    settlement::{PaymentMode, Settlement, SettlementRule},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    /// Vendor name; resolves the vendor email and pickup contact
    pub vendor_name: Option<String>,
    pub team: Option<String>,

    pub pickup_name: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_phone: Option<String>,

    #[validate(length(min = 1, message = "Drop name is required"))]
    pub drop_name: String,
    #[validate(length(min = 1, message = "Drop address is required"))]
    pub drop_address: String,
    #[validate(length(min = 1, message = "Drop phone is required"))]
    pub drop_phone: String,

    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub pb_amt: Option<Decimal>,
    pub dc_amt: Option<Decimal>,

    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Partial update. Only the fields present are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1))]
    pub pickup_name: Option<String>,
    #[validate(length(min = 1))]
    pub pickup_address: Option<String>,
    #[validate(length(min = 1))]
    pub pickup_phone: Option<String>,
    #[validate(length(min = 1))]
    pub drop_name: Option<String>,
    #[validate(length(min = 1))]
    pub drop_address: Option<String>,
    #[validate(length(min = 1))]
    pub drop_phone: Option<String>,

    pub vendor: Option<String>,
    pub team: Option<String>,

    pub pb: Option<PaymentMode>,
    pub dc: Option<PaymentMode>,
    pub pb_amt: Option<Decimal>,
    pub dc_amt: Option<Decimal>,

    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl UpdateOrderRequest {
    fn touches_billing(&self) -> bool {
        self.pb.is_some() || self.dc.is_some() || self.pb_amt.is_some() || self.dc_amt.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Inputs for a settlement preview. Amounts default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct SettlementPreviewQuery {
    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub pb_amt: Option<Decimal>,
    pub dc_amt: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettlementPreview {
    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub rule: SettlementRule,
    pub tsb: Decimal,
    pub cid: Decimal,
}

/// Stored settlement compared against the current rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettlementAudit {
    pub order_id: i32,
    pub rule: SettlementRule,
    pub stored: Settlement,
    pub recomputed: Settlement,
    pub drift: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pickup: ContactResponse,
    pub drop: ContactResponse,
    pub vendor: Option<String>,
    pub team: Option<String>,
    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub pb_amt: Decimal,
    pub dc_amt: Decimal,
    pub tsb: Decimal,
    pub cid: Decimal,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

impl From<OrderModel> for OrderResponse {
    fn from(model: OrderModel) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            pickup: ContactResponse {
                name: model.pickup_name,
                address: model.pickup_address,
                phone: model.pickup_phone,
            },
            drop: ContactResponse {
                name: model.drop_name,
                address: model.drop_address,
                phone: model.drop_phone,
            },
            vendor: model.vendor,
            team: model.team,
            pb: model.pb,
            dc: model.dc,
            pb_amt: model.pb_amt,
            dc_amt: model.dc_amt,
            tsb: model.tsb,
            cid: model.cid,
            status: model.status,
            order_type: model.order_type,
            notes: model.notes,
            created_by: model.created_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Stateless settlement calculation used by order forms before submission.
pub fn preview_settlement(query: &SettlementPreviewQuery) -> Result<SettlementPreview, ServiceError> {
    let settlement = Settlement::try_evaluate(query.pb, query.dc, query.pb_amt, query.dc_amt)?;
    Ok(SettlementPreview {
        pb: query.pb,
        dc: query.dc,
        rule: SettlementRule::for_modes(query.pb, query.dc),
        tsb: settlement.tsb,
        cid: settlement.cid,
    })
}

/// Service for the order records table
#[derive(Clone)]
pub struct OrderService {
    repository: OrderRepository,
    vendors: Arc<VendorService>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, vendors: Arc<VendorService>) -> Self {
        Self {
            repository: OrderRepository::new(db_pool),
            vendors,
        }
    }

    /// Creates an order, snapshotting the vendor's contact as the pickup
    /// contact and storing the evaluated settlement.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id, vendor = ?request.vendor_name))]
    pub async fn create_order(
        &self,
        actor: &Actor,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.validate()?;

        let pb_amt = crate::settlement::non_negative("pb_amt", request.pb_amt)?;
        let dc_amt = crate::settlement::non_negative("dc_amt", request.dc_amt)?;
        let settlement = crate::settlement::evaluate(request.pb, request.dc, pb_amt, dc_amt);

        let mut pickup_name = non_blank(request.pickup_name);
        let mut pickup_address = non_blank(request.pickup_address);
        let mut pickup_phone = non_blank(request.pickup_phone);
        let mut vendor_key = None;

        if let Some(vendor_name) = non_blank(request.vendor_name) {
            match self.vendors.find_by_name(&vendor_name).await? {
                Some(vendor) => {
                    vendor_key = Some(vendor.email);
                    pickup_name = pickup_name.or(Some(vendor.name));
                    pickup_address = pickup_address.or(Some(vendor.address));
                    pickup_phone = pickup_phone.or(Some(vendor.phone));
                }
                None => {
                    warn!(vendor = %vendor_name, "vendor not found; creating order without vendor");
                }
            }
        }

        let team = non_blank(request.team).or_else(|| {
            (actor.role == ActorRole::Team).then(|| actor.id.clone())
        });

        let now = Utc::now();
        let model = OrderActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            pickup_name: Set(pickup_name.unwrap_or_default()),
            pickup_address: Set(pickup_address.unwrap_or_default()),
            pickup_phone: Set(pickup_phone.unwrap_or_default()),
            drop_name: Set(request.drop_name.trim().to_string()),
            drop_address: Set(request.drop_address.trim().to_string()),
            drop_phone: Set(request.drop_phone.trim().to_string()),
            vendor: Set(vendor_key),
            team: Set(team),
            pb: Set(request.pb),
            dc: Set(request.dc),
            pb_amt: Set(pb_amt),
            dc_amt: Set(dc_amt),
            tsb: Set(settlement.tsb),
            cid: Set(settlement.cid),
            status: Set(request.status.unwrap_or(OrderStatus::Pending)),
            order_type: Set(request.order_type.unwrap_or_default()),
            notes: Set(non_blank(request.notes)),
            created_by: Set(Some(actor.id.clone())),
            ..Default::default()
        };

        let order = self.repository.create(model).await?;
        metrics::counter!("courier_ledger.orders.created", 1);
        info!(order_id = order.id, tsb = %order.tsb, cid = %order.cid, "Order created");

        Ok(order.into())
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: i32) -> Result<OrderResponse, ServiceError> {
        self.find(id).await.map(Into::into)
    }

    /// Newest-first page of orders.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let page = page.max(1);
        let (orders, total) = self
            .repository
            .find_filtered(&filter, page, per_page)
            .await?;

        Ok(OrderListResponse {
            orders: orders.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Applies a partial edit. Billing edits re-derive `tsb`/`cid` in the
    /// same write. Last write wins.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update_order(
        &self,
        actor: &Actor,
        id: i32,
        request: UpdateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request.validate()?;
        let existing = self.find(id).await?;

        let pb = request.pb.unwrap_or(existing.pb);
        let dc = request.dc.unwrap_or(existing.dc);
        let pb_amt = match request.pb_amt {
            Some(amount) => crate::settlement::non_negative("pb_amt", Some(amount))?,
            None => existing.pb_amt,
        };
        let dc_amt = match request.dc_amt {
            Some(amount) => crate::settlement::non_negative("dc_amt", Some(amount))?,
            None => existing.dc_amt,
        };
        let touches_billing = request.touches_billing();

        let mut model: OrderActiveModel = existing.into();
        if let Some(value) = request.pickup_name {
            model.pickup_name = Set(value);
        }
        if let Some(value) = request.pickup_address {
            model.pickup_address = Set(value);
        }
        if let Some(value) = request.pickup_phone {
            model.pickup_phone = Set(value);
        }
        if let Some(value) = request.drop_name {
            model.drop_name = Set(value);
        }
        if let Some(value) = request.drop_address {
            model.drop_address = Set(value);
        }
        if let Some(value) = request.drop_phone {
            model.drop_phone = Set(value);
        }
        if let Some(value) = request.vendor {
            model.vendor = Set(non_blank(Some(value)));
        }
        if let Some(value) = request.team {
            model.team = Set(non_blank(Some(value)));
        }
        if let Some(status) = request.status {
            model.status = Set(status);
        }
        if let Some(order_type) = request.order_type {
            model.order_type = Set(order_type);
        }
        if let Some(notes) = request.notes {
            model.notes = Set(non_blank(Some(notes)));
        }

        if touches_billing {
            let settlement = crate::settlement::evaluate(pb, dc, pb_amt, dc_amt);
            model.pb = Set(pb);
            model.dc = Set(dc);
            model.pb_amt = Set(pb_amt);
            model.dc_amt = Set(dc_amt);
            model.tsb = Set(settlement.tsb);
            model.cid = Set(settlement.cid);
        }

        if !model.is_changed() {
            return self.get_order(id).await;
        }
        model.updated_at = Set(Utc::now());

        let order = self.repository.update(model).await?;
        info!(order_id = id, billing_changed = touches_billing, "Order updated");
        Ok(order.into())
    }

    /// Sets the lifecycle status. Any status may follow any other.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn update_order_status(
        &self,
        actor: &Actor,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        let existing = self.find(id).await?;
        let previous = existing.status;

        let mut model: OrderActiveModel = existing.into();
        model.status = Set(status);
        model.updated_at = Set(Utc::now());

        let order = self.repository.update(model).await?;
        info!(order_id = id, from = ?previous, to = ?status, "Order status changed");
        Ok(order.into())
    }

    /// Hard delete. Admin only.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_order(&self, actor: &Actor, id: i32) -> Result<(), ServiceError> {
        actor.require_admin()?;

        if !self.repository.delete(id).await? {
            return Err(ServiceError::NotFound(format!(
                "Order with ID {} not found",
                id
            )));
        }

        warn!(order_id = id, "Order deleted");
        Ok(())
    }

    /// Recomputes the settlement of a stored order and reports drift.
    #[instrument(skip(self))]
    pub async fn audit_settlement(&self, id: i32) -> Result<SettlementAudit, ServiceError> {
        let order = self.find(id).await?;
        let audit = SettlementAudit {
            order_id: order.id,
            rule: order.rule(),
            stored: order.settlement(),
            recomputed: order.recompute(),
            drift: order.has_settlement_drift(),
        };
        if audit.drift {
            warn!(order_id = id, stored = ?audit.stored, recomputed = ?audit.recomputed, "Stored settlement drifts from rule table");
        }
        Ok(audit)
    }

    async fn find(&self, id: i32) -> Result<OrderModel, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {} not found", id)))
    }
}
