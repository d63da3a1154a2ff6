//! Configuration management for the restock service
//!
//! This module handles loading and validating configuration from environment
//! variables, TOML files, and command-line overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::i18n;
use crate::models::DuplicatePolicy;

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 10000;

/// Client polling interval for the queue fragments
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Lower bound on the polling interval
pub const MIN_POLL_INTERVAL_MS: u64 = 500;

/// Barcode height in pixels
pub const DEFAULT_BARCODE_HEIGHT: u32 = 60;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Report handling configuration
    pub reports: ReportsConfig,

    /// Barcode rendering configuration
    pub barcode: BarcodeConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Language configuration
    pub i18n: I18nConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Enable per-request tracing spans
    pub enable_request_logging: bool,
}

/// Report handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Handling of a report for a bin that is already pending
    pub duplicate_policy: DuplicatePolicy,

    /// How often the pages refresh their queue fragment
    pub poll_interval_ms: u64,
}

/// Barcode rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Bar height in pixels
    pub height: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

/// Language configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale for messages and pages (en, zh-TW)
    pub lang: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// Environment variables that are set take precedence over file values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;
        config.i18n.lang = i18n::normalize_locale(&config.i18n.lang);
        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Overwrite fields whose environment variable is set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("RESTOCK_HOST") {
            self.server.host = host;
        }

        if let Ok(v) = std::env::var("PORT") {
            self.server.port = v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {v}"))?;
        }

        if let Ok(v) = std::env::var("RESTOCK_DUPLICATE_POLICY") {
            self.reports.duplicate_policy = DuplicatePolicy::parse(&v)
                .with_context(|| format!("Invalid RESTOCK_DUPLICATE_POLICY value: {v}"))?;
        }

        if let Ok(v) = std::env::var("RESTOCK_POLL_INTERVAL_MS") {
            self.reports.poll_interval_ms = v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid RESTOCK_POLL_INTERVAL_MS value: {v}"))?;
        }

        if let Ok(v) = std::env::var("RESTOCK_BARCODE_HEIGHT") {
            self.barcode.height = v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid RESTOCK_BARCODE_HEIGHT value: {v}"))?;
        }

        if let Ok(level) = std::env::var("RESTOCK_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = std::env::var("RESTOCK_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Ok(lang) = std::env::var("RESTOCK_LANG") {
            self.i18n.lang = i18n::normalize_locale(&lang);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.reports.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            anyhow::bail!("poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}");
        }

        if self.barcode.height == 0 {
            anyhow::bail!("barcode height must be greater than 0");
        }

        self.bind_address()?;

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid bind address: {}:{}", self.server.host, self.server.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_BARCODE_HEIGHT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            lang: i18n::DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            reports: ReportsConfig::default(),
            barcode: BarcodeConfig::default(),
            logging: LoggingConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}
