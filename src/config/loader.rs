//! Configuration loader for index-notify
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "INDEX_NOTIFY_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "INDEX_NOTIFY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "INDEX_NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local overrides (optional)
/// 4. `INDEX_NOTIFY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    /// Current application environment
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`INDEX_NOTIFY_CONFIG_DIR`)
    /// - Specific configuration file (`INDEX_NOTIFY_CONFIG_FILE`)
    /// - Application environment (`INDEX_NOTIFY_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `INDEX_NOTIFY_CONFIG_DIR` and
    /// `INDEX_NOTIFY_CONFIG_FILE` are set, as they are mutually exclusive,
    /// or if `INDEX_NOTIFY_APP_ENV` names an unknown environment.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::mutual_exclusivity(
                "INDEX_NOTIFY_CONFIG_DIR and INDEX_NOTIFY_CONFIG_FILE cannot both be set. \
                 Use INDEX_NOTIFY_CONFIG_DIR for layered configuration or \
                 INDEX_NOTIFY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Load a single configuration file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment read from `INDEX_NOTIFY_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Get the current application environment
    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// If a configuration file is set, loads only that file.
    /// Otherwise, performs layered loading from the configuration directory.
    /// When the directory does not exist at all, built-in defaults plus
    /// environment variables are used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found in an existing configuration directory
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Build the config::Config instance from all sources
    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else if self.config_dir.is_dir() {
            self.build_layered_config(builder)?
        } else {
            tracing::debug!(
                config_dir = %self.config_dir.display(),
                "Configuration directory not found, using defaults"
            );
            builder
        };

        // INDEX_NOTIFY_BING__API_KEY -> bing.api_key
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    /// Build layered configuration from multiple files
    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self.config_dir.join(self.environment.config_file_name());
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    /// Add a file source to the config builder
    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// Add environment variable source to the config builder
    ///
    /// Examples:
    /// - `INDEX_NOTIFY_BING__API_KEY` -> `bing.api_key`
    /// - `INDEX_NOTIFY_GOOGLE__CREDENTIALS_FILE` -> `google.credentials_file`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Global mutex to ensure tests run sequentially to avoid env var conflicts
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const MANAGED_VARS: &[&str] = &[
        "INDEX_NOTIFY_CONFIG_DIR",
        "INDEX_NOTIFY_CONFIG_FILE",
        "INDEX_NOTIFY_APP_ENV",
        "INDEX_NOTIFY_BING__API_KEY",
        "INDEX_NOTIFY_HTTP__TIMEOUT_SECONDS",
    ];

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Starts from a clean slate for every variable the loader reads
        fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for key in MANAGED_VARS {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[application]
name = "test-app"
version = "1.0.0"

[logger]
level = "info"

[http]
timeout_seconds = 30
connect_timeout_seconds = 10

[google]
credentials_file = "/keys/default.json"

[bing]
api_key = "default-key"
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        env.set("INDEX_NOTIFY_CONFIG_DIR", "/custom/config");
        env.set("INDEX_NOTIFY_CONFIG_FILE", "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("INDEX_NOTIFY_CONFIG_DIR"));
                assert!(msg.contains("INDEX_NOTIFY_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[]);
        env.set("INDEX_NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let loader = ConfigLoader::new().expect("Should create loader");
        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_without_config_dir_uses_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        env.set("INDEX_NOTIFY_CONFIG_DIR", missing.to_str().unwrap());
        env.set("INDEX_NOTIFY_BING__API_KEY", "from-env");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load defaults");
        assert_eq!(settings.bing.api_key, "from-env");
        assert_eq!(settings.bing.api_host, "https://ssl.bing.com");
        assert!(settings.google.credentials_file.is_none());
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let production = r#"
[application]
name = "prod-app"

[http]
timeout_seconds = 60

[bing]
api_key = "prod-key"
"#;
        let local = r#"
[http]
timeout_seconds = 45
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", production),
            ("local.toml", local),
        ]);

        env.set("INDEX_NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("INDEX_NOTIFY_APP_ENV", "production");
        env.set("INDEX_NOTIFY_BING__API_KEY", "env-key");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        // Environment variable has highest priority
        assert_eq!(settings.bing.api_key, "env-key");
        // local.toml overrides production.toml
        assert_eq!(settings.http.timeout_seconds, 45);
        // production.toml overrides default.toml
        assert_eq!(settings.application.name, "prod-app");
        // default.toml provides base values
        assert_eq!(
            settings.google.credentials_file.as_deref(),
            Some("/keys/default.json")
        );
        assert_eq!(settings.application.version, "1.0.0");
    }

    #[test]
    fn test_load_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let single = r#"
[bing]
api_key = "single"
api_host = "https://bing.internal.test"
strict_status = false
"#;
        let temp_dir = setup_config_dir(&[("single.toml", single)]);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("single.toml"))
            .load()
            .expect("Should load settings");

        assert_eq!(settings.bing.api_key, "single");
        assert_eq!(settings.bing.api_host, "https://bing.internal.test");
        assert!(!settings.bing.strict_status);
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set("INDEX_NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("INDEX_NOTIFY_HTTP__TIMEOUT_SECONDS", "0");

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "http.timeout_seconds")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_with_environment_overrides_env_var() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set("INDEX_NOTIFY_APP_ENV", "production");

        let loader = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Staging);
        assert_eq!(loader.environment(), AppEnvironment::Staging);
    }

    #[test]
    fn test_new_rejects_unknown_app_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set("INDEX_NOTIFY_APP_ENV", "prodution");

        match ConfigLoader::new() {
            Err(ConfigError::EnvVarError(msg)) => assert!(msg.contains("prodution")),
            other => panic!("Expected EnvVarError, got {:?}", other),
        }
    }
}
