//! Worker configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{bail, Context, Result};
use shared::config::InsightConfig;
use std::net::SocketAddr;

/// Where insight records are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBackend {
    /// In-process store, empty at startup.
    Memory,
    /// `ClickHouse` `ad_insights` table.
    ClickHouse,
}

impl std::str::FromStr for SourceBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" => Ok(Self::Memory),
            "clickhouse" => Ok(Self::ClickHouse),
            other => bail!("Unknown insight source '{other}', expected 'memory' or 'clickhouse'"),
        }
    }
}

/// Worker configuration.
///
/// Configuration values can be set via environment variables:
/// - `ADINSIGHT_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `ADINSIGHT_PORT`: The port to listen on (default: 8080)
/// - `ADINSIGHT_SOURCE`: `memory` or `clickhouse` (default: `memory`)
/// - `ADINSIGHT_NOTIFICATION_QUEUE_URL`: SQS queue for notifications (optional)
/// - `ADINSIGHT_PLATFORM`: Platform tag for account aggregates (default: "pinterest")
/// - `ADINSIGHT_REQUEST_ID`: Correlation id for requests without one (default: "insight-request")
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// The insight record backend.
    pub source: SourceBackend,
    /// The notification queue URL; notifications stay in memory when unset.
    pub notification_queue_url: Option<String>,
    /// Rollup and notification settings.
    pub insight: InsightConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ADINSIGHT_PORT` is set but cannot be parsed as a valid port number
    /// - `ADINSIGHT_SOURCE` names an unknown backend
    /// - The resulting insight settings are invalid
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("ADINSIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("ADINSIGHT_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("ADINSIGHT_PORT is not a valid port")?
            .unwrap_or(8080);

        let source = std::env::var("ADINSIGHT_SOURCE")
            .ok()
            .map(|s| s.parse::<SourceBackend>())
            .transpose()?
            .unwrap_or(SourceBackend::Memory);

        let notification_queue_url = std::env::var("ADINSIGHT_NOTIFICATION_QUEUE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let mut insight = InsightConfig::default();
        if let Ok(platform) = std::env::var("ADINSIGHT_PLATFORM") {
            insight = insight.with_platform(platform);
        }
        if let Ok(request_id) = std::env::var("ADINSIGHT_REQUEST_ID") {
            insight = insight.with_default_request_id(request_id);
        }
        insight.validate().map_err(anyhow::Error::msg)?;

        Ok(Self {
            host,
            port,
            source,
            notification_queue_url,
            insight,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port combination is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            source: SourceBackend::Memory,
            notification_queue_url: None,
            insight: InsightConfig::default(),
        }
    }
}
