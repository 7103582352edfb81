use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Search-index provider a backend talks to.
///
/// The derived ordering is the fan-out order of [`super::Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Bing,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Bing => "bing",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// URL life cycle event a provider is being told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotifyType {
    #[serde(rename = "URL_UPDATED")]
    Updated,
    #[serde(rename = "URL_DELETED")]
    Deleted,
}

impl NotifyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyType::Updated => "URL_UPDATED",
            NotifyType::Deleted => "URL_DELETED",
        }
    }
}

impl fmt::Display for NotifyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Normalized record of one accepted URL submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub url: String,
    #[serde(rename = "type")]
    pub notify_type: NotifyType,
    /// Serialized as an RFC3339 string
    #[serde(rename = "notifyTime")]
    pub notify_time: jiff::Timestamp,
    #[serde(rename = "http_status_code")]
    pub status_code: u16,
    #[serde(rename = "platform")]
    pub provider: Provider,
}

impl Notification {
    pub fn new(
        provider: Provider,
        url: impl Into<String>,
        notify_type: NotifyType,
        notify_time: jiff::Timestamp,
        status_code: u16,
    ) -> Self {
        Self {
            url: url.into(),
            notify_type,
            notify_time,
            status_code,
            provider,
        }
    }
}

/// Result of one backend call inside a single publish request.
#[derive(Debug)]
pub enum PublishOutcome {
    Delivered(Notification),
    Failed { provider: Provider, error: AppError },
}

impl PublishOutcome {
    pub fn from_result(provider: Provider, result: Result<Notification, AppError>) -> Self {
        match result {
            Ok(notification) => PublishOutcome::Delivered(notification),
            Err(error) => PublishOutcome::Failed { provider, error },
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            PublishOutcome::Delivered(notification) => notification.provider,
            PublishOutcome::Failed { provider, .. } => *provider,
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            PublishOutcome::Delivered(notification) => Some(notification),
            PublishOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            PublishOutcome::Delivered(_) => None,
            PublishOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Delivered(_))
    }

    pub fn into_result(self) -> Result<Notification, AppError> {
        match self {
            PublishOutcome::Delivered(notification) => Ok(notification),
            PublishOutcome::Failed { error, .. } => Err(error),
        }
    }
}
