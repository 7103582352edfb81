use crate::indexing::Provider;
use thiserror::Error;

/// Crate-wide error type.
///
/// Per-backend failures travel inside a [`crate::indexing::PublishOutcome`]
/// rather than being returned from `publish_url`, so most variants here are
/// observed by callers through the outcome list.
#[derive(Error, Debug)]
pub enum AppError {
    /// Google service-account credential could not be loaded or used
    #[error("Credential error: {message}")]
    Credential {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A single backend call failed (transport, token, status or body)
    #[error("{provider} provider error: {message}")]
    Provider {
        provider: Provider,
        message: String,
        /// HTTP status reported by the provider, when a response was received
        status: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// URL could not be split into scheme and host
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn credential(message: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        AppError::Credential {
            message: message.into(),
            source,
        }
    }

    pub fn provider(
        provider: Provider,
        message: impl Into<String>,
        status: Option<u16>,
        source: Option<anyhow::Error>,
    ) -> Self {
        AppError::Provider {
            provider,
            message: message.into(),
            status,
            source,
        }
    }

    /// Provider this error is attributed to, if any
    pub fn provider_kind(&self) -> Option<Provider> {
        match self {
            AppError::Provider { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    /// HTTP status carried by a provider error
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
