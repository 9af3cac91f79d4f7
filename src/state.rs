use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::coupon::{CouponRegistry, StaticCouponRegistry};
use crate::engine::pricing::PricingConfig;
use crate::store::{self, CatalogStore, OrderStore, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub sessions: Arc<SessionStore>,
    pub orders: Arc<OrderStore>,
    pub coupons: Arc<dyn CouponRegistry>,
    pub pricing: PricingConfig,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let (products, categories) = store::demo_catalog();
        Self::with_catalog(products, categories, config.pricing.clone())
    }

    pub fn with_catalog(
        products: Vec<crate::models::Product>,
        categories: Vec<crate::models::Category>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogStore::new(products, categories)),
            sessions: Arc::new(SessionStore::new()),
            orders: Arc::new(OrderStore::new()),
            coupons: Arc::new(StaticCouponRegistry::default()),
            pricing,
        }
    }
}
