//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::Url;
use tracing_subscriber::EnvFilter;

use crate::config::error::ConfigError;
use crate::config::settings::{
    BingSettings, FileSettings, GoogleSettings, HttpSettings, LoggerSettings, Settings,
};

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Check that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!("URL must use http or https, got '{}'", url.scheme()),
        });
    }

    Ok(())
}

impl HttpSettings {
    /// Validate HTTP client settings
    ///
    /// # Validation Rules
    /// - Timeouts must be greater than 0
    /// - Connect timeout must not exceed the request timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds > self.timeout_seconds {
            return Err(ConfigError::ValidationError {
                field: "http.connect_timeout_seconds".to_string(),
                message: format!(
                    "Connect timeout ({}) cannot exceed request timeout ({}).",
                    self.connect_timeout_seconds, self.timeout_seconds
                ),
            });
        }

        Ok(())
    }
}

impl GoogleSettings {
    /// Validate Google settings
    ///
    /// # Validation Rules
    /// - Endpoint must be an http(s) URL
    /// - Scope must not be empty
    /// - A required backend must be enabled and have a credential file
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("google.endpoint", &self.endpoint)?;

        if self.scope.trim().is_empty() {
            return Err(ConfigError::validation(
                "google.scope",
                "OAuth2 scope cannot be empty.",
            ));
        }

        if self.required {
            if !self.enabled {
                return Err(ConfigError::validation(
                    "google.required",
                    "Google cannot be both required and disabled.",
                ));
            }

            let has_file = self
                .credentials_file
                .as_deref()
                .is_some_and(|path| !path.trim().is_empty());
            if !has_file {
                return Err(ConfigError::validation(
                    "google.credentials_file",
                    "A service-account key file is required when google.required is set.",
                ));
            }
        }

        Ok(())
    }
}

impl BingSettings {
    /// Validate Bing settings
    ///
    /// The API host is checked even when no key is configured so that a
    /// typo surfaces before the key is added.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("bing.api_host", &self.api_host)
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        // If file logging is enabled, path must not be empty
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Level must be a valid `EnvFilter` directive list (`info`, `warn,index_notify=debug`)
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.trim();
        let parsed = if level.is_empty() {
            Err("filter is empty".to_string())
        } else {
            EnvFilter::try_new(level).map(drop).map_err(|e| e.to_string())
        };
        if let Err(reason) = parsed {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!("Invalid log filter '{}': {}", self.level, reason),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.http.validate()?;
        self.google.validate()?;
        self.bing.validate()?;
        Ok(())
    }
}
