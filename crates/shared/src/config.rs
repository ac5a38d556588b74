//! Application configuration management.
//!
//! Configuration is loaded once at startup and passed explicitly to the
//! components that need it; nothing in the workspace reads it from globals.

use std::time::Duration;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Validation thresholds.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Store read retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Reference number allocation.
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Dashboard statistics.
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Thresholds applied by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Hard ceiling for any single request.
    #[serde(default = "default_max_amount")]
    pub max_amount: Decimal,
    /// Smallest accepted cash courier deposit.
    #[serde(default = "default_cash_courier_min")]
    pub cash_courier_min: Decimal,
    /// Largest accepted cash courier deposit.
    #[serde(default = "default_cash_courier_max")]
    pub cash_courier_max: Decimal,
    /// Largest accepted debit card withdrawal.
    #[serde(default = "default_debit_card_max")]
    pub debit_card_max: Decimal,
    /// Minimum length of a crypto wallet address.
    #[serde(default = "default_crypto_address_min_len")]
    pub crypto_address_min_len: usize,
}

fn default_max_amount() -> Decimal {
    Decimal::from(1_000_000)
}

fn default_cash_courier_min() -> Decimal {
    Decimal::from(10_000)
}

fn default_cash_courier_max() -> Decimal {
    Decimal::from(500_000)
}

fn default_debit_card_max() -> Decimal {
    Decimal::from(10_000)
}

fn default_crypto_address_min_len() -> usize {
    26
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_amount: default_max_amount(),
            cash_courier_min: default_cash_courier_min(),
            cash_courier_max: default_cash_courier_max(),
            debit_card_max: default_debit_card_max(),
            crypto_address_min_len: default_crypto_address_min_len(),
        }
    }
}

/// Backoff policy for idempotent store reads.
///
/// Writes are never retried through this policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for a single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    50
}

fn default_max_delay_ms() -> u64 {
    1_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Returns the delay to wait after the given failed attempt (1-indexed).
    ///
    /// The delay doubles with each attempt and is capped at `max_delay_ms`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay_ms.saturating_mul(1_u64 << exponent);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Reference number allocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferenceConfig {
    /// Attempts to allocate a unique reference before giving up.
    #[serde(default = "default_reference_attempts")]
    pub max_attempts: u32,
}

fn default_reference_attempts() -> u32 {
    5
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_reference_attempts(),
        }
    }
}

/// Dashboard statistics settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatisticsConfig {
    /// Time zone whose midnight starts the "today" window.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    Tz::UTC
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`, `config/{RUN_MODE}`,
    /// then `FUNDFLOW__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FUNDFLOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
