use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::settlement::{self, PaymentMode, Settlement, SettlementRule};

/// Delivery lifecycle status. Any status may follow any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "delivered")]
    #[serde(alias = "completed")]
    Delivered,
    #[sea_orm(string_value = "out-for-delivery")]
    OutForDelivery,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "cancelled")]
    #[serde(alias = "canceled")]
    Cancelled,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "pre-order")]
    PreOrder,
}

impl std::str::FromStr for OrderStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "delivered" | "completed" => Ok(OrderStatus::Delivered),
            "out-for-delivery" => Ok(OrderStatus::OutForDelivery),
            "returned" => Ok(OrderStatus::Returned),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            "failed" => Ok(OrderStatus::Failed),
            "pre-order" | "preorder" => Ok(OrderStatus::PreOrder),
            other => Err(ServiceError::InvalidStatus(format!(
                "Unknown order status: {other}"
            ))),
        }
    }
}

/// Category of a row in the orders table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// A pickup-and-drop delivery
    #[sea_orm(string_value = "delivery")]
    Delivery,
    /// A billing-only settlement entry
    #[sea_orm(string_value = "billing")]
    Billing,
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Delivery
    }
}

/// A delivery order with its stored settlement figures.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub pickup_name: String,
    pub pickup_address: String,
    pub pickup_phone: String,

    pub drop_name: String,
    pub drop_address: String,
    pub drop_phone: String,

    /// Vendor email, resolved from the vendor name at submission
    pub vendor: Option<String>,
    /// Team identifier
    pub team: Option<String>,

    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub pb_amt: Decimal,
    pub dc_amt: Decimal,

    /// Stored at write time, never recomputed on read
    pub tsb: Decimal,
    pub cid: Decimal,

    pub status: OrderStatus,
    pub order_type: OrderType,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored settlement figures.
    pub fn settlement(&self) -> Settlement {
        Settlement {
            tsb: self.tsb,
            cid: self.cid,
        }
    }

    /// Settlement re-derived from the stored inputs under the current rules.
    pub fn recompute(&self) -> Settlement {
        settlement::evaluate(self.pb, self.dc, self.pb_amt, self.dc_amt)
    }

    pub fn rule(&self) -> SettlementRule {
        SettlementRule::for_modes(self.pb, self.dc)
    }

    /// True when the stored figures no longer match the rule table.
    pub fn has_settlement_drift(&self) -> bool {
        self.settlement() != self.recompute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_accepts_source_labels() {
        assert_eq!(
            "completed".parse::<OrderStatus>().unwrap(),
            OrderStatus::Delivered
        );
        assert_eq!(
            "out_for_delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::PreOrder).unwrap();
        assert_eq!(json, "\"pre-order\"");
        let parsed: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }

    #[test]
    fn drift_detects_edited_figures() {
        let now = Utc::now();
        let mut model = Model {
            id: 1,
            created_at: now,
            updated_at: now,
            pickup_name: "Shop".into(),
            pickup_address: "1 Road".into(),
            pickup_phone: "100".into(),
            drop_name: "Buyer".into(),
            drop_address: "2 Road".into(),
            drop_phone: "200".into(),
            vendor: Some("shop@example.com".into()),
            team: None,
            pb: PaymentMode::Cod,
            dc: PaymentMode::Due,
            pb_amt: dec!(500),
            dc_amt: dec!(100),
            tsb: dec!(400),
            cid: dec!(500),
            status: OrderStatus::Pending,
            order_type: OrderType::Delivery,
            notes: None,
            created_by: None,
        };
        assert!(!model.has_settlement_drift());
        assert_eq!(model.rule(), SettlementRule::CodDue);

        model.tsb = dec!(0);
        assert!(model.has_settlement_drift());
    }
}
