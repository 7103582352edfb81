//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;
use crate::config::Environment as AppEnvironment;

/// Notify search engines about created, updated and deleted URLs
#[derive(Parser, Debug)]
#[command(name = "index-notify")]
#[command(about = "Notify Google and Bing indexing APIs about changed URLs")]
#[command(long_about = "
index-notify submits URL notifications to the Google Indexing API and the
Bing Webmaster URL submission API. Each backend is enabled by its
configuration: a Google service-account key file and/or a Bing API key.

EXAMPLES:
    # Notify every enabled backend that a page was updated
    index-notify publish https://example.com/blog/new-post

    # Notify that pages were removed
    index-notify remove https://example.com/old https://example.com/older

    # Show which backends the current configuration enables
    index-notify check

    # Use a single configuration file and JSON output
    index-notify --config /etc/index-notify.toml --output json publish https://example.com/

Configuration is read from config/default.toml, config/{env}.toml and
config/local.toml, then INDEX_NOTIFY_* environment variables
(e.g. INDEX_NOTIFY_BING__API_KEY).
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered config directory.
    /// The file must exist and be readable.
    #[arg(short, long, value_name = "FILE", env = "INDEX_NOTIFY_CONFIG_FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which {env}.toml is layered over default.toml.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Result output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Notify that URLs were created or updated (URL_UPDATED)
    Publish {
        /// Absolute http(s) URLs to submit
        #[arg(required = true, value_name = "URL", value_parser = super::validation::validate_page_url)]
        urls: Vec<String>,
    },
    /// Notify that URLs were deleted (URL_DELETED)
    Remove {
        /// Absolute http(s) URLs to submit
        #[arg(required = true, value_name = "URL", value_parser = super::validation::validate_page_url)]
        urls: Vec<String>,
    },
    /// Validate configuration and list enabled backends
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}

/// How results are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Log level implied by `--verbose` / `--quiet`, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
