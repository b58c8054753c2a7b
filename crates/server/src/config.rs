//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODGRAM_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `FOODGRAM_HOST` - Bind address (default: 127.0.0.1)
//! - `FOODGRAM_PORT` - Listen port (default: 8000)
//! - `FOODGRAM_FONT_PATH` - TrueType font for shopping list exports (default: builtin
//!   Helvetica, which cannot draw non-Latin text such as Cyrillic)
//! - `FOODGRAM_PAGE_CAPACITY` - Rows per exported page (default: 40, range: 2-60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::services::shopping_list::{FontSource, PageCapacity};

const DEFAULT_PAGE_CAPACITY: &str = "40";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopping list export settings
    pub export: ExportConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Shopping list export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Where the export font comes from.
    pub font: FontSource,
    /// Maximum number of lines on one page.
    pub page_capacity: PageCapacity,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FOODGRAM_DATABASE_URL")?;
        let host = get_env_or_default("FOODGRAM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOODGRAM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FOODGRAM_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOODGRAM_PORT".to_string(), e.to_string()))?;

        let export = ExportConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            export,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ExportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let font = get_optional_env("FOODGRAM_FONT_PATH")
            .filter(|path| !path.trim().is_empty())
            .map_or(FontSource::Builtin, |path| FontSource::File(PathBuf::from(path)));

        let page_capacity = parse_page_capacity(&get_env_or_default(
            "FOODGRAM_PAGE_CAPACITY",
            DEFAULT_PAGE_CAPACITY,
        ))?;

        Ok(Self {
            font,
            page_capacity,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_page_capacity(raw: &str) -> Result<PageCapacity, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("FOODGRAM_PAGE_CAPACITY".to_string(), reason);
    let lines = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(e.to_string()))?;
    PageCapacity::new(lines).map_err(|e| invalid(e.to_string()))
}

fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = get_env_or_default(key, default)
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}
