use std::{env, str::FromStr};

use anyhow::Context;
use rust_decimal::Decimal;

use crate::pricing::ShippingPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub shipping: ShippingPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let shipping = shipping_from_vars(
            env::var("SHIPPING_FREE_OVER").ok().as_deref(),
            env::var("SHIPPING_FLAT_FEE").ok().as_deref(),
        )?;
        Ok(Self {
            port,
            database_url,
            host,
            shipping,
        })
    }
}

/// Builds the shipping policy from raw variable values; unset values keep the
/// defaults and `none` (or an empty value) turns free shipping off.
pub fn shipping_from_vars(
    free_over: Option<&str>,
    flat_fee: Option<&str>,
) -> anyhow::Result<ShippingPolicy> {
    let mut policy = ShippingPolicy::default();

    if let Some(raw) = free_over.map(str::trim) {
        policy.free_over = if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            None
        } else {
            let threshold =
                Decimal::from_str(raw).context("SHIPPING_FREE_OVER is not a decimal")?;
            anyhow::ensure!(
                threshold >= Decimal::ZERO,
                "SHIPPING_FREE_OVER must not be negative"
            );
            Some(threshold)
        };
    }

    if let Some(raw) = flat_fee.map(str::trim).filter(|s| !s.is_empty()) {
        let fee = Decimal::from_str(raw).context("SHIPPING_FLAT_FEE is not a decimal")?;
        anyhow::ensure!(fee >= Decimal::ZERO, "SHIPPING_FLAT_FEE must not be negative");
        policy.flat_fee = fee;
    }

    Ok(policy)
}
