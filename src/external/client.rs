use std::time::Duration;

use crate::config::HttpSettings;
use crate::error::{AppError, AppResult};

/// Builds the HTTP client shared by every backend
///
/// One client per notifier keeps connection pools and TLS sessions shared
/// between the token exchange and the publish calls.
///
/// # Features
/// - **Timeouts**: whole-request and connect timeouts from `HttpSettings`
/// - **Compression**: gzip, deflate, brotli and zstd responses
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client(settings: &HttpSettings) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| AppError::Configuration {
            key: "http".to_string(),
            source: e.into(),
        })
}
