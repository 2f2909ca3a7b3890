// src/config.rs

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub port: u16,
    /// development | staging | production
    pub environment: String,

    pub db_max_connections: u32,
    /// Deadline applied to every comment store operation.
    pub db_timeout_secs: u64,

    pub limiter_enabled: bool,
    pub limiter_rps: u32,
    pub limiter_burst: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let environment = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            rust_log,
            port: parse_or("PORT", 4000)?,
            environment,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 25)?,
            db_timeout_secs: parse_or("DB_TIMEOUT_SECS", 3)?,
            limiter_enabled: parse_or("LIMITER_ENABLED", true)?,
            limiter_rps: parse_or("LIMITER_RPS", 2)?,
            limiter_burst: parse_or("LIMITER_BURST", 5)?,
        })
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
