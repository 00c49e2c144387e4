//! Database connection module for `ClickHouse`.
//!
//! Provides the connection the insight source reads from. The connection is
//! created once at startup, checked with [`Database::ping`], and handed to the
//! source explicitly; nothing is cached in global state.

use anyhow::{Context, Result};
use clickhouse::Client;
use std::sync::Arc;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `ClickHouse` database URL (e.g., <http://localhost:8123>)
    pub url: String,
    /// Database name to use
    pub database: String,
    /// Username for authentication
    pub user: String,
    /// Password for authentication
    pub password: String,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ADINSIGHT_DB_URL`: Database URL (default: <http://localhost:8123>)
    /// - `ADINSIGHT_DB_NAME`: Database name (default: "adinsight")
    /// - `ADINSIGHT_DB_USER`: Database user (default: "adinsight")
    /// - `ADINSIGHT_DB_PASSWORD`: Database password (default: "`adinsight_dev`")
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("ADINSIGHT_DB_URL")
                .unwrap_or_else(|_| "http://localhost:8123".to_string()),
            database: std::env::var("ADINSIGHT_DB_NAME")
                .unwrap_or_else(|_| "adinsight".to_string()),
            user: std::env::var("ADINSIGHT_DB_USER").unwrap_or_else(|_| "adinsight".to_string()),
            password: std::env::var("ADINSIGHT_DB_PASSWORD")
                .unwrap_or_else(|_| "adinsight_dev".to_string()),
        }
    }
}

/// Shared `ClickHouse` connection.
#[derive(Clone)]
pub struct Database {
    client: Arc<Client>,
}

impl Database {
    /// Create a new database client from configuration.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        let client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database)
            .with_user(&config.user)
            .with_password(&config.password);

        Self {
            client: Arc::new(client),
        }
    }

    /// Create a client and verify the server answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db = Self::new(config);
        db.ping()
            .await
            .with_context(|| format!("Can not reach ClickHouse at {}", config.url))?;
        Ok(db)
    }

    /// Get a reference to the underlying `ClickHouse` client.
    #[must_use]
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }

    /// Test database connectivity by executing a simple query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or the query fails.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .query("SELECT 1")
            .fetch_one::<u8>()
            .await
            .context("Failed to ping database")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_with_custom_values() {
        let config = DatabaseConfig {
            url: "http://custom:8123".to_string(),
            database: "test_db".to_string(),
            user: "test_user".to_string(),
            password: "test_pass".to_string(),
        };

        let db = Database::new(&config);
        assert_eq!(Arc::strong_count(&db.client()), 2);
    }

    #[tokio::test]
    #[ignore = "requires running ClickHouse instance"]
    async fn test_database_connect() {
        let config = DatabaseConfig::from_env();
        let result = Database::connect(&config).await;
        assert!(
            result.is_ok(),
            "Database ping failed. Make sure ClickHouse is running"
        );
    }
}
