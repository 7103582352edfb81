//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use reqwest::Url;
use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Validate that a URL is absolute, http(s) and has a host
pub fn validate_page_url(url_str: &str) -> Result<String, String> {
    let url = Url::parse(url_str.trim())
        .map_err(|e| format!("Invalid URL '{}': {}", url_str, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "URL must use http or https, got '{}': '{}'",
            url.scheme(),
            url_str
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("URL has no host: '{}'", url_str));
    }

    Ok(url_str.trim().to_string())
}
