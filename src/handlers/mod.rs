pub mod commission;
pub mod common;
pub mod health;
pub mod ledger;
pub mod orders;
pub mod settlement;
pub mod vendors;

use crate::{config::AppConfig, db::DbPool};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub order: Arc<crate::services::orders::OrderService>,
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub ledger: Arc<crate::services::ledger::LedgerService>,
    pub commission: Arc<crate::services::commission::CommissionService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let offset = config.ledger_offset();
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
        ));
        let order = Arc::new(crate::services::orders::OrderService::new(
            db_pool.clone(),
            vendors.clone(),
        ));
        let ledger = Arc::new(crate::services::ledger::LedgerService::new(
            db_pool.clone(),
            offset,
        ));
        let commission = Arc::new(crate::services::commission::CommissionService::new(
            db_pool,
            config.commission_rate(),
            offset,
        ));

        Self {
            order,
            vendors,
            ledger,
            commission,
        }
    }
}
