//! Configuration settings structures for index-notify
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::indexing::google::{DEFAULT_GOOGLE_ENDPOINT, INDEXING_SCOPE};
use crate::indexing::{
    BingConfig, CredentialSource, DEFAULT_BING_API_HOST, GoogleConfig, NotifierConfig,
};
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "index-notify".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/index-notify.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("index-notify/{}", crate::pkg_version())
}

fn default_google_endpoint() -> String {
    DEFAULT_GOOGLE_ENDPOINT.to_string()
}

fn default_google_scope() -> String {
    INDEXING_SCOPE.to_string()
}

fn default_bing_api_host() -> String {
    DEFAULT_BING_API_HOST.to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Outbound HTTP client configuration shared by all backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TCP/TLS connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Google Indexing API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleSettings {
    /// Set to false to skip Google even when a credential file is configured
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path to the service-account JSON key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,

    /// Fail startup when the credential is missing or unusable
    #[serde(default)]
    pub required: bool,

    /// `urlNotifications:publish` endpoint
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// OAuth2 scope requested for the access token
    #[serde(default = "default_google_scope")]
    pub scope: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            credentials_file: None,
            required: false,
            endpoint: default_google_endpoint(),
            scope: default_google_scope(),
        }
    }
}

impl GoogleSettings {
    /// Convert GoogleSettings to the runtime GoogleConfig
    pub fn to_google_config(&self) -> GoogleConfig {
        let credentials = match (&self.credentials_file, self.enabled) {
            (Some(path), true) if !path.trim().is_empty() => {
                CredentialSource::File(PathBuf::from(path))
            }
            _ => CredentialSource::None,
        };

        GoogleConfig {
            credentials,
            required: self.required,
            endpoint: self.endpoint.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Bing Webmaster API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingSettings {
    /// Webmaster API key; empty disables Bing
    #[serde(default)]
    pub api_key: String,

    /// Webmaster API host
    #[serde(default = "default_bing_api_host")]
    pub api_host: String,

    /// Report non-2xx responses as errors instead of notifications
    #[serde(default = "default_true")]
    pub strict_status: bool,
}

impl Default for BingSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: default_bing_api_host(),
            strict_status: default_true(),
        }
    }
}

impl BingSettings {
    /// Convert BingSettings to the runtime BingConfig
    pub fn to_bing_config(&self) -> BingConfig {
        BingConfig {
            api_key: self.api_key.trim().to_string(),
            api_host: self.api_host.clone(),
            strict_status: self.strict_status,
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Filter directives, e.g. "info" or "info,reqwest=warn"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    /// Parse the format string into LogFormat enum
    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Outbound HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Google Indexing API configuration
    #[serde(default)]
    pub google: GoogleSettings,

    /// Bing Webmaster API configuration
    #[serde(default)]
    pub bing: BingSettings,
}

impl Settings {
    /// Build the notifier configuration from these settings
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            google: self.google.to_google_config(),
            bing: self.bing.to_bing_config(),
        }
    }
}
