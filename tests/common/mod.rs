#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use courier_ledger::{
    app_router,
    config::AppConfig,
    db,
    entities::order_record::{self, OrderStatus, OrderType},
    settlement::{self, PaymentMode},
    AppState,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN: (&str, &str) = ("root", "admin");
pub const OWNER: (&str, &str) = ("owner-1", "owner");
pub const EMPLOYEE: (&str, &str) = ("emp-7", "employee");

/// Helper harness for an application backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    db_file: std::path::PathBuf,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Fresh database per app so tests can run in parallel.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let db_file = std::env::temp_dir().join(format!("courier-ledger-{}.db", Uuid::new_v4()));

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            db_file,
        }
    }

    /// Sends a request, optionally as `actor` (id, role), and returns the
    /// status with the parsed JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        actor: Option<(&str, &str)>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = actor {
            builder = builder.header("x-actor-id", id).header("x-actor-role", role);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value, actor: (&str, &str)) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), Some(actor)).await
    }

    /// Inserts an order row directly with a fixed creation time.
    pub async fn seed_order(&self, seed: SeedOrder) -> order_record::Model {
        let outcome = settlement::evaluate(seed.pb, seed.dc, seed.pb_amt, seed.dc_amt);
        order_record::ActiveModel {
            created_at: Set(seed.created_at),
            updated_at: Set(seed.created_at),
            pickup_name: Set("Pickup".to_string()),
            pickup_address: Set("1 Market Street".to_string()),
            pickup_phone: Set("5550001".to_string()),
            drop_name: Set("Drop".to_string()),
            drop_address: Set("9 Harbour Road".to_string()),
            drop_phone: Set("5550009".to_string()),
            vendor: Set(seed.vendor),
            team: Set(seed.team),
            pb: Set(seed.pb),
            dc: Set(seed.dc),
            pb_amt: Set(seed.pb_amt),
            dc_amt: Set(seed.dc_amt),
            tsb: Set(outcome.tsb),
            cid: Set(outcome.cid),
            status: Set(OrderStatus::Pending),
            order_type: Set(OrderType::Delivery),
            notes: Set(None),
            created_by: Set(Some("seed".to_string())),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed order should insert")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}

pub struct SeedOrder {
    pub created_at: DateTime<Utc>,
    pub vendor: Option<String>,
    pub team: Option<String>,
    pub pb: PaymentMode,
    pub dc: PaymentMode,
    pub pb_amt: Decimal,
    pub dc_amt: Decimal,
}

impl SeedOrder {
    /// COD pickup with a due drop charge, so `cid == pb_amt`.
    pub fn cod_for_vendor(vendor: &str, created_at: DateTime<Utc>, pb_amt: Decimal) -> Self {
        Self {
            created_at,
            vendor: Some(vendor.to_string()),
            team: None,
            pb: PaymentMode::Cod,
            dc: PaymentMode::Due,
            pb_amt,
            dc_amt: Decimal::ZERO,
        }
    }
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
