//! OAuth2 access tokens for a service account (JWT-bearer grant).

use super::credentials::ServiceAccountCredentials;
use crate::error::{AppError, AppResult};
use crate::indexing::Provider;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens are refreshed this long before the reported expiry
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Exchanges signed assertions for access tokens and caches the result
pub struct ServiceAccountAuth {
    credentials: ServiceAccountCredentials,
    scope: String,
    client: reqwest::Client,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        credentials: ServiceAccountCredentials,
        scope: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            scope: scope.into(),
            client,
            cache: Mutex::new(None),
        }
    }

    /// Returns a bearer token, fetching a new one when the cached token is stale
    pub async fn access_token(&self) -> AppResult<String> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref()
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.token.clone());
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    async fn fetch_token(&self) -> AppResult<CachedToken> {
        let issued_at = jiff::Timestamp::now().as_second();
        let assertion = self
            .credentials
            .sign_assertion(&self.scope, issued_at)
            .map_err(assertion_error)?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT)
            .append_pair("assertion", &assertion)
            .finish();

        tracing::debug!(
            provider = %Provider::Google,
            client_email = self.credentials.client_email(),
            token_uri = self.credentials.token_uri(),
            "Requesting access token"
        );

        let resp = self
            .client
            .post(self.credentials.token_uri())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                token_error(format!("token request failed: {}", e), None, Some(e.into()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(token_error(
                format!("token endpoint returned {}: {}", status.as_u16(), text.trim()),
                Some(status.as_u16()),
                None,
            ));
        }

        let data: TokenResponse = resp.json().await.map_err(|e: reqwest::Error| {
            token_error(format!("invalid token response: {}", e), None, Some(e.into()))
        })?;

        let lifetime = Duration::from_secs(data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN));

        Ok(CachedToken {
            token: data.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_SKEW),
        })
    }
}

fn token_error(message: String, status: Option<u16>, source: Option<anyhow::Error>) -> AppError {
    AppError::provider(Provider::Google, message, status, source)
}

/// Signing happens per token fetch, so its failure belongs to the Google call
fn assertion_error(error: AppError) -> AppError {
    token_error(
        format!("cannot sign token assertion: {}", error),
        None,
        Some(error.into()),
    )
}
