//! Insight rollup and notification settings.

use serde::{Deserialize, Serialize};

use crate::rollup::DEFAULT_PLATFORM;

/// Correlation id used when a request does not carry one.
pub const DEFAULT_REQUEST_ID: &str = "insight-request";

/// Human-readable message attached to successful notifications.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Settings for producing and publishing insight rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Platform tag attached to every account aggregate.
    pub platform: String,
    /// Correlation id for requests without `request_id`.
    pub default_request_id: String,
    /// Message text of successful notifications.
    pub success_message: String,
}

impl InsightConfig {
    /// Creates a configuration with the default settings.
    ///
    /// - platform: `pinterest`
    /// - default request id: `insight-request`
    /// - success message: `Success`
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: DEFAULT_PLATFORM.to_string(),
            default_request_id: DEFAULT_REQUEST_ID.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Sets the platform tag.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Sets the default correlation id.
    #[must_use]
    pub fn with_default_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.default_request_id = request_id.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform or default request id is blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.platform.trim().is_empty() {
            return Err("Platform cannot be empty".to_string());
        }
        if self.default_request_id.trim().is_empty() {
            return Err("Default request id cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_config_default() {
        let config = InsightConfig::default();
        assert_eq!(config.platform, "pinterest");
        assert_eq!(config.default_request_id, "insight-request");
        assert_eq!(config.success_message, "Success");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_insight_config_builders() {
        let config = InsightConfig::new()
            .with_platform("meta")
            .with_default_request_id("nightly");
        assert_eq!(config.platform, "meta");
        assert_eq!(config.default_request_id, "nightly");
    }

    #[test]
    fn test_insight_config_validate_blank_platform() {
        let config = InsightConfig::new().with_platform("  ");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Platform"));
    }

    #[test]
    fn test_insight_config_validate_blank_request_id() {
        let config = InsightConfig::new().with_default_request_id("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_insight_config_serialization() {
        let config = InsightConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: InsightConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
