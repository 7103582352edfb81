//! Google Indexing API backend.
//!
//! Authenticates with a service-account key via the OAuth2 JWT-bearer grant
//! and publishes `URL_UPDATED` / `URL_DELETED` notifications.

mod auth;
mod client;
mod credentials;
mod types;

pub use auth::ServiceAccountAuth;
pub use client::GoogleBackend;
pub use credentials::{
    AssertionClaims, DEFAULT_TOKEN_URI, ServiceAccountCredentials, ServiceAccountKey,
};
pub use types::{PublishUrlNotificationResponse, UrlNotificationMetadata, UrlNotificationRequest};

#[cfg(test)]
pub(crate) use credentials::test_support;

use crate::error::AppResult;
use std::path::PathBuf;

pub const DEFAULT_GOOGLE_ENDPOINT: &str =
    "https://indexing.googleapis.com/v3/urlNotifications:publish";

pub const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";

/// Where the service-account key comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CredentialSource {
    /// No credential configured; the backend stays disabled
    #[default]
    None,
    /// Raw JSON key contents
    Json(Vec<u8>),
    /// Path to a JSON key file, read at construction
    File(PathBuf),
}

/// Google backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub credentials: CredentialSource,
    /// Fail notifier construction instead of disabling the backend
    pub required: bool,
    pub endpoint: String,
    pub scope: String,
}

impl GoogleConfig {
    /// Loads the configured credential
    ///
    /// # Returns
    /// `Ok(None)` when no credential is configured, `Ok(Some(..))` for a
    /// usable key, `Err(AppError::Credential)` when it cannot be read or parsed.
    pub fn load_credentials(&self) -> AppResult<Option<ServiceAccountCredentials>> {
        match &self.credentials {
            CredentialSource::None => Ok(None),
            CredentialSource::Json(bytes) if bytes.is_empty() => Ok(None),
            CredentialSource::Json(bytes) => ServiceAccountCredentials::from_json(bytes).map(Some),
            CredentialSource::File(path) => ServiceAccountCredentials::from_file(path).map(Some),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials: CredentialSource::None,
            required: false,
            endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string(),
            scope: INDEXING_SCOPE.to_string(),
        }
    }
}
