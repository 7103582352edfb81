//! Google service-account credentials.
//!
//! Parses the JSON key file downloaded from the Cloud console and signs the
//! RS256 assertions exchanged for OAuth2 access tokens.

use crate::error::{AppError, AppResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each signed assertion, in seconds
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service-account key file contents (only the fields the token flow uses)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("account_type", &self.account_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// JWT-bearer assertion claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Parsed key plus its ready-to-use signing key
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
}

impl ServiceAccountCredentials {
    /// Parses a service-account JSON document
    ///
    /// # Errors
    /// Returns `AppError::Credential` if the JSON is invalid, the account is
    /// not a service account, or the private key is not a usable RSA PEM.
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let key: ServiceAccountKey = serde_json::from_slice(bytes).map_err(|e| {
            AppError::credential(
                format!("Invalid service-account JSON: {}", e),
                Some(e.into()),
            )
        })?;

        if let Some(account_type) = key.account_type.as_deref()
            && account_type != "service_account"
        {
            return Err(AppError::credential(
                format!("Expected a service_account credential, got '{}'", account_type),
                None,
            ));
        }

        if key.client_email.trim().is_empty() {
            return Err(AppError::credential("client_email cannot be empty", None));
        }

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::credential(
                format!("Invalid service-account private key: {}", e),
                Some(e.into()),
            )
        })?;

        Ok(Self { key, encoding_key })
    }

    /// Reads and parses a service-account key file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::credential(
                format!("Cannot read credential file {}: {}", path.display(), e),
                Some(e.into()),
            )
        })?;
        Self::from_json(&bytes)
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.key.token_uri
    }

    /// Signs a JWT-bearer assertion for `scope`, issued at `issued_at` (unix seconds)
    pub fn sign_assertion(&self, scope: &str, issued_at: i64) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: scope.to_string(),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            AppError::credential(format!("Failed to sign assertion: {}", e), Some(e.into()))
        })
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
