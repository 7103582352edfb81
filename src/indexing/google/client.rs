use super::auth::ServiceAccountAuth;
use super::types::{GoogleErrorResponse, PublishUrlNotificationResponse, UrlNotificationRequest};
use crate::error::{AppError, AppResult};
use crate::indexing::backend::IndexingBackend;
use crate::indexing::types::{Notification, NotifyType, Provider};
use async_trait::async_trait;

/// Google Indexing API backend
pub struct GoogleBackend {
    auth: ServiceAccountAuth,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleBackend {
    pub fn new(auth: ServiceAccountAuth, endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            auth,
            endpoint: endpoint.into(),
            client,
        }
    }

    fn make_error(
        message: impl Into<String>,
        status: Option<u16>,
        source: Option<anyhow::Error>,
    ) -> AppError {
        AppError::provider(Provider::Google, message, status, source)
    }

    /// Pulls a readable message out of a non-2xx body
    fn describe_failure(body: &str) -> String {
        match serde_json::from_str::<GoogleErrorResponse>(body) {
            Ok(err) => match (err.error.status, err.error.message) {
                (Some(status), Some(message)) => format!("{}: {}", status, message),
                (None, Some(message)) => message,
                (Some(status), None) => status,
                (None, None) => body.trim().to_string(),
            },
            Err(_) => body.trim().to_string(),
        }
    }
}

#[async_trait]
impl IndexingBackend for GoogleBackend {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn notify(&self, url: &str, notify_type: NotifyType) -> AppResult<Notification> {
        let token = self.auth.access_token().await?;
        let notify_time = jiff::Timestamp::now();

        let request = UrlNotificationRequest {
            url: url.to_string(),
            notify_type,
            notify_time: notify_time.to_string(),
        };

        tracing::debug!(provider = %Provider::Google, url, %notify_type, "Publishing URL notification");

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(format!("publish({}) request failed: {}", url, e), None, Some(e.into()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(provider = %Provider::Google, url, status = status.as_u16(), "Publish rejected");
            return Err(Self::make_error(
                format!(
                    "publish({}) HTTP status {}: {}",
                    url,
                    status.as_u16(),
                    Self::describe_failure(&text)
                ),
                Some(status.as_u16()),
                None,
            ));
        }

        let data: PublishUrlNotificationResponse =
            resp.json().await.map_err(|e: reqwest::Error| {
                Self::make_error(format!("publish({}) invalid JSON: {}", url, e), Some(status.as_u16()), Some(e.into()))
            })?;

        if let Some(reported) = data
            .url_notification_metadata
            .as_ref()
            .and_then(|meta| meta.url.as_deref())
            && reported != url
        {
            tracing::debug!(provider = %Provider::Google, url, reported, "Provider normalized URL");
        }

        tracing::info!(provider = %Provider::Google, url, status = status.as_u16(), "URL notification published");

        Ok(Notification::new(
            Provider::Google,
            url,
            notify_type,
            notify_time,
            status.as_u16(),
        ))
    }
}
