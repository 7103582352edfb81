//! Bing Webmaster URL submission backend.
//!
//! Submits URLs through `/webmaster/api.svc/json/SubmitUrl` authenticated
//! with the webmaster API key passed as the `apikey` query parameter.

use super::backend::IndexingBackend;
use super::types::{Notification, NotifyType, Provider};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

pub const DEFAULT_BING_API_HOST: &str = "https://ssl.bing.com";

const SUBMIT_URL_PATH: &str = "/webmaster/api.svc/json/SubmitUrl";

/// Bing backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingConfig {
    /// Webmaster API key; empty disables the backend
    pub api_key: String,
    /// Scheme and host of the webmaster API
    pub api_host: String,
    /// Treat non-2xx responses as provider errors
    pub strict_status: bool,
}

impl BingConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Builds the full SubmitUrl endpoint including the `apikey` parameter
    pub fn submit_url(&self) -> AppResult<Url> {
        let base = format!("{}{}", self.api_host.trim_end_matches('/'), SUBMIT_URL_PATH);
        let mut url = Url::parse(&base).map_err(|e| AppError::Validation {
            field: "bing.api_host".to_string(),
            reason: format!("Invalid Bing API host '{}': {}", self.api_host, e),
        })?;
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }
}

impl Default for BingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_BING_API_HOST.to_string(),
            strict_status: true,
        }
    }
}

/// SubmitUrl request body
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitUrlRequest<'a> {
    pub site_url: String,
    pub url: &'a str,
}

/// Derives the `siteUrl` Bing expects (`scheme://host[:port]`) from a page URL
///
/// Host and port are taken as written, so `https://Example.com:443/a` yields
/// `https://Example.com:443`; Bing matches `siteUrl` against the verified site.
pub fn site_url(url: &str) -> AppResult<String> {
    let parsed = Url::parse(url).map_err(|e| AppError::MalformedUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::MalformedUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        })?;

    let site = match raw_authority(url) {
        Some(authority) => format!("{}://{}", parsed.scheme(), authority),
        None => match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        },
    };
    Ok(site)
}

/// `host[:port]` exactly as it appears in `url`, without userinfo
fn raw_authority(url: &str) -> Option<&str> {
    let (_, rest) = url.trim().split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    (!host_port.is_empty()).then_some(host_port)
}

pub struct BingBackend {
    config: BingConfig,
    client: reqwest::Client,
}

impl BingBackend {
    pub fn new(config: BingConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn make_error(
        message: impl Into<String>,
        status: Option<u16>,
        source: Option<anyhow::Error>,
    ) -> AppError {
        AppError::provider(Provider::Bing, message, status, source)
    }
}

#[async_trait]
impl IndexingBackend for BingBackend {
    fn provider(&self) -> Provider {
        Provider::Bing
    }

    /// Submits the URL to Bing
    ///
    /// Bing has no removal endpoint; deletions are submitted the same way so
    /// the crawler revisits the page and sees it gone.
    async fn notify(&self, url: &str, notify_type: NotifyType) -> AppResult<Notification> {
        let body = SubmitUrlRequest {
            site_url: site_url(url)?,
            url,
        };
        let endpoint = self.config.submit_url()?;

        tracing::debug!(provider = %Provider::Bing, url, site_url = %body.site_url, "Submitting URL");

        let resp = self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("SubmitUrl({}) request failed: {}", url, e), None, Some(e.into()))
            })?;

        let status = resp.status();
        let notify_time = jiff::Timestamp::now();

        if self.config.strict_status && !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(provider = %Provider::Bing, url, status = status.as_u16(), body = %text, "SubmitUrl rejected");
            return Err(Self::make_error(
                format!("SubmitUrl({}) HTTP status {}: {}", url, status.as_u16(), text.trim()),
                Some(status.as_u16()),
                None,
            ));
        }

        tracing::info!(provider = %Provider::Bing, url, status = status.as_u16(), "URL submitted");

        Ok(Notification::new(
            Provider::Bing,
            url,
            notify_type,
            notify_time,
            status.as_u16(),
        ))
    }
}
