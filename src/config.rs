//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORT` - Listen port (default: 8083)
//! - `STORAGE_DIR` - Directory for the local storage cache; in-memory when unset
//! - `NATS_URL` - NATS server for domain event publication
//! - `SHIPPING_FEE` - Flat checkout shipping fee (default: 9.99)
//! - `LOW_STOCK_THRESHOLD` - Units at or below which a product is low on stock (default: 10)

use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::aggregates::LOW_STOCK_THRESHOLD;
use crate::domain::value_objects::Money;
use crate::store::StoreSettings;

const DEFAULT_PORT: u16 = 8083;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub storage_dir: Option<PathBuf>,
    pub nats_url: Option<String>,
    pub shipping_fee: Money,
    pub low_stock_threshold: u32,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let shipping_fee: Decimal = parse_or(get("SHIPPING_FEE"), "SHIPPING_FEE", Decimal::new(999, 2))?;
        if shipping_fee.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar("SHIPPING_FEE".into(), "must not be negative".into()));
        }
        Ok(Self {
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            storage_dir: get("STORAGE_DIR").map(PathBuf::from),
            nats_url: get("NATS_URL"),
            shipping_fee: Money::new(shipping_fee),
            low_stock_threshold: parse_or(get("LOW_STOCK_THRESHOLD"), "LOW_STOCK_THRESHOLD", LOW_STOCK_THRESHOLD)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::from(([0, 0, 0, 0], self.port)) }

    pub fn settings(&self) -> StoreSettings {
        StoreSettings { shipping_fee: self.shipping_fee, low_stock_threshold: self.low_stock_threshold }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
