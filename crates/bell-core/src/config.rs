//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use crate::format::CurrencyFormat;
use crate::models::{FeeSchedule, Tier};
use crate::AppResult;
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use tracing::info;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub fees: FeesConfig,
    #[serde(default)]
    pub currency: CurrencyFormat,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Allowed CORS origins, comma separated
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply embedded migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_run_migrations() -> bool {
    true
}

/// Fee schedule as read from configuration
///
/// Turned into a validated [`FeeSchedule`] with [`FeesConfig::schedule`].
#[derive(Debug, Deserialize, Clone)]
pub struct FeesConfig {
    pub standard: Tier,
    pub reduced: Tier,
}

impl FeesConfig {
    /// Validate the configured tiers into an immutable schedule
    pub fn schedule(&self) -> AppResult<FeeSchedule> {
        let schedule = FeeSchedule::new(self.standard.clone(), self.reduced.clone())?;
        info!(
            "Fee schedule loaded: standard {} to {} ({} + {}/min), reduced {} to {} ({} + {}/min)",
            self.standard.starts_at,
            self.standard.ends_at,
            self.standard.flat_charge,
            self.standard.per_minute_charge,
            self.reduced.starts_at,
            self.reduced.ends_at,
            self.reduced.flat_charge,
            self.reduced.per_minute_charge
        );
        Ok(schedule)
    }
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            standard: Tier {
                flat_charge: decimal("0.36"),
                per_minute_charge: decimal("0.09"),
                starts_at: time_of_day(6, 0, 0),
                ends_at: time_of_day(21, 59, 59),
            },
            reduced: Tier {
                flat_charge: decimal("0.36"),
                per_minute_charge: decimal("0.00"),
                starts_at: time_of_day(22, 0, 0),
                ends_at: time_of_day(5, 59, 59),
            },
        }
    }
}

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

fn time_of_day(hour: u32, min: u32, sec: u32) -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(hour, min, sec).unwrap_or_default()
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::with_defaults(Config::builder())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with BELL_ prefix
            .add_source(
                Environment::with_prefix("BELL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("BELL").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("server.cors_origins", default_cors_origins())?
            .set_default("database.max_connections", 10)?
            .set_default("database.run_migrations", true)?
            .set_default("fees.standard.flat_charge", "0.36")?
            .set_default("fees.standard.per_minute_charge", "0.09")?
            .set_default("fees.standard.starts_at", "06:00:00")?
            .set_default("fees.standard.ends_at", "21:59:59")?
            .set_default("fees.reduced.flat_charge", "0.36")?
            .set_default("fees.reduced.per_minute_charge", "0.00")?
            .set_default("fees.reduced.starts_at", "22:00:00")?
            .set_default("fees.reduced.ends_at", "05:59:59")?
            .set_default("currency.symbol", "R$")?
            .set_default("currency.decimal_separator", ",")?
            .set_default("currency.thousands_separator", ".")
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TierKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_fees_form_valid_schedule() {
        let schedule = FeesConfig::default().schedule().unwrap();
        assert_eq!(schedule.standard().per_minute_charge, dec!(0.09));
        assert_eq!(schedule.reduced().per_minute_charge, dec!(0.00));
        assert_eq!(
            schedule.tier_at(chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap()),
            TierKind::Reduced
        );
    }

    #[test]
    fn test_defaults_deserialize() {
        let config = AppConfig::with_defaults(Config::builder())
            .unwrap()
            .set_override("database.url", "postgresql://localhost/bell")
            .unwrap()
            .build()
            .unwrap();
        let app: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(app.server.port, 8080);
        assert_eq!(app.fees.standard.flat_charge, dec!(0.36));
        assert_eq!(app.currency, CurrencyFormat::default());
        assert!(app.fees.schedule().is_ok());
        assert_eq!(app.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_gapped_fees_rejected() {
        let mut fees = FeesConfig::default();
        fees.reduced.starts_at = chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert!(fees.schedule().is_err());
    }
}
