//! Configuration management for the FarmFresh platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARMFRESH_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::alerts::{SafeRanges, SensorRange};
use shared::settlement::Fees;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Safe storage ranges for sensor alerting
    pub safe_ranges: SafeRangesConfig,

    /// Settlement fee schedule
    pub fees: FeesConfig,

    /// External payment gateway
    pub payment_gateway: PaymentGatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SafeRangesConfig {
    pub temp_min: Decimal,
    pub temp_max: Decimal,
    pub humidity_min: Decimal,
    pub humidity_max: Decimal,
}

impl SafeRangesConfig {
    pub fn to_ranges(&self) -> SafeRanges {
        SafeRanges {
            temp: SensorRange {
                min: self.temp_min,
                max: self.temp_max,
            },
            humidity: SensorRange {
                min: self.humidity_min,
                max: self.humidity_max,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeesConfig {
    pub commission_rate: Decimal,
    pub logistics_fee: Decimal,
}

impl FeesConfig {
    pub fn to_fees(&self) -> Fees {
        Fees {
            commission_rate: self.commission_rate,
            logistics_fee: self.logistics_fee,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentGatewayConfig {
    /// Gateway API endpoint
    pub endpoint: String,

    /// Gateway key id
    pub key_id: String,

    /// Gateway key secret
    pub key_secret: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARMFRESH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("safe_ranges.temp_min", "2")?
            .set_default("safe_ranges.temp_max", "8")?
            .set_default("safe_ranges.humidity_min", "60")?
            .set_default("safe_ranges.humidity_max", "85")?
            .set_default("fees.commission_rate", "0.07")?
            .set_default("fees.logistics_fee", "50")?
            .set_default("payment_gateway.endpoint", "https://api.razorpay.com/v1")?
            .set_default("payment_gateway.key_id", "")?
            .set_default("payment_gateway.key_secret", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARMFRESH_ prefix)
            .add_source(
                Environment::with_prefix("FARMFRESH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
