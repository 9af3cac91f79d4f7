use std::env;

use crate::engine::pricing::PricingConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            tax_rate_basis_points: env_i64("TAX_RATE_BASIS_POINTS")
                .unwrap_or(defaults.tax_rate_basis_points),
            free_shipping_threshold: env_i64("FREE_SHIPPING_THRESHOLD_CENTS")
                .unwrap_or(defaults.free_shipping_threshold),
            shipping_fee: env_i64("SHIPPING_FEE_CENTS").unwrap_or(defaults.shipping_fee),
        };

        Ok(Self {
            host,
            port,
            pricing,
        })
    }
}

fn env_i64(key: &str) -> Option<i64> {
    env::var(key).ok().and_then(|v| v.parse::<i64>().ok())
}
