//! CLI module for index-notify
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command execution and result reporting

pub mod executor;
pub mod parser;
pub mod report;
pub mod validation;

// Re-export public types for convenience
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, OutputFormat};

use crate::config::{ConfigError, ConfigLoader, Settings};
use crate::logger::init_logger;

/// Load configuration, honouring `--config` and `--env`
///
/// # Errors
/// Returns error if configuration loading or validation fails
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut loader = ConfigLoader::new()?;

    if let Some(path) = &cli.config {
        loader = loader.with_config_file(path.clone());
    }
    if let Some(env) = cli.env {
        loader = loader.with_environment(env.into());
    }

    loader.load()
}

/// Initialize logging from settings, applying `--verbose` / `--quiet`
///
/// # Errors
/// Returns error if the logger configuration is invalid or a global
/// subscriber is already installed
pub fn init_logging(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let mut logger_config = settings.logger.clone().into_logger_config()?;

    if let Some(level) = cli.log_level_override() {
        logger_config = logger_config.with_level(level);
    }

    init_logger(logger_config)
}
