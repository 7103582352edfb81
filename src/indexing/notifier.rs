//! Fan-out of URL notifications to every enabled backend.

use super::backend::IndexingBackend;
use super::bing::{BingBackend, BingConfig};
use super::google::{GoogleBackend, GoogleConfig, ServiceAccountAuth};
use super::types::{NotifyType, Provider, PublishOutcome};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::build_http_client;
use futures::future::join_all;

/// Configuration consumed by [`Notifier::new`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierConfig {
    pub google: GoogleConfig,
    pub bing: BingConfig,
}

/// Routes each URL notification to every enabled backend
///
/// Outcomes always come back in provider order (Google, then Bing), one per
/// enabled backend. A failing backend never prevents the others from running.
pub struct Notifier {
    backends: Vec<Box<dyn IndexingBackend>>,
}

impl Notifier {
    /// Builds the notifier and its backends
    ///
    /// A backend without configuration is skipped. A Google credential that
    /// fails to load disables Google, unless `google.required` is set, in
    /// which case construction fails. An unparsable Bing API host disables
    /// Bing.
    ///
    /// # Errors
    /// Returns `AppError::Credential` in strict mode when the Google
    /// credential is missing or unusable.
    pub fn new(config: NotifierConfig, client: reqwest::Client) -> AppResult<Self> {
        let mut backends: Vec<Box<dyn IndexingBackend>> = Vec::new();

        match config.google.load_credentials() {
            Ok(Some(credentials)) => {
                tracing::debug!(
                    provider = %Provider::Google,
                    client_email = credentials.client_email(),
                    "Backend enabled"
                );
                let auth = ServiceAccountAuth::new(credentials, &config.google.scope, client.clone());
                backends.push(Box::new(GoogleBackend::new(
                    auth,
                    &config.google.endpoint,
                    client.clone(),
                )));
            }
            Ok(None) if config.google.required => {
                return Err(AppError::credential(
                    "Google credential is required but none is configured",
                    None,
                ));
            }
            Ok(None) => {
                tracing::debug!(provider = %Provider::Google, "No credential configured, backend disabled");
            }
            Err(e) if config.google.required => return Err(e),
            Err(e) => {
                tracing::warn!(provider = %Provider::Google, error = %e, "Credential unusable, backend disabled");
            }
        }

        if !config.bing.is_enabled() {
            tracing::debug!(provider = %Provider::Bing, "No API key configured, backend disabled");
        } else if let Err(e) = config.bing.submit_url() {
            tracing::warn!(provider = %Provider::Bing, error = %e, "API host unusable, backend disabled");
        } else {
            tracing::debug!(provider = %Provider::Bing, api_host = %config.bing.api_host, "Backend enabled");
            backends.push(Box::new(BingBackend::new(config.bing, client)));
        }

        Ok(Self { backends })
    }

    /// Builds the shared HTTP client and the notifier from loaded settings
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let client = build_http_client(&settings.http)?;
        Self::new(settings.notifier_config(), client)
    }

    /// Builds a notifier from explicit backends, ordered by provider
    pub fn with_backends(mut backends: Vec<Box<dyn IndexingBackend>>) -> Self {
        backends.sort_by_key(|backend| backend.provider());
        Self { backends }
    }

    pub fn enabled_providers(&self) -> Vec<Provider> {
        self.backends.iter().map(|backend| backend.provider()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Notifies every enabled backend that `url` was created or updated
    pub async fn publish_url(&self, url: &str) -> Vec<PublishOutcome> {
        self.notify_url(url, NotifyType::Updated).await
    }

    /// Notifies every enabled backend that `url` was deleted
    pub async fn remove_url(&self, url: &str) -> Vec<PublishOutcome> {
        self.notify_url(url, NotifyType::Deleted).await
    }

    /// Sends one notification per enabled backend and collects the outcomes
    pub async fn notify_url(&self, url: &str, notify_type: NotifyType) -> Vec<PublishOutcome> {
        let calls = self.backends.iter().map(|backend| async move {
            let provider = backend.provider();
            let result = backend.notify(url, notify_type).await;
            if let Err(e) = &result {
                tracing::warn!(%provider, url, error = %e, "Notification failed");
            }
            PublishOutcome::from_result(provider, result)
        });

        // join_all yields results in input order
        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::google::{CredentialSource, test_support};
    use crate::indexing::types::Notification;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        provider: Provider,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IndexingBackend for StubBackend {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn notify(&self, url: &str, notify_type: NotifyType) -> AppResult<Notification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::provider(
                    self.provider,
                    "connection refused",
                    None,
                    None,
                ));
            }
            Ok(Notification::new(
                self.provider,
                url,
                notify_type,
                jiff::Timestamp::now(),
                200,
            ))
        }
    }

    fn stub(provider: Provider, fail: bool, calls: &Arc<AtomicUsize>) -> Box<dyn IndexingBackend> {
        Box::new(StubBackend {
            provider,
            fail,
            calls: Arc::clone(calls),
        })
    }

    #[tokio::test]
    async fn test_outcomes_follow_provider_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::with_backends(vec![
            stub(Provider::Bing, false, &calls),
            stub(Provider::Google, false, &calls),
        ]);

        let outcomes = notifier.publish_url("https://example.com/page").await;
        let providers: Vec<_> = outcomes.iter().map(|o| o.provider()).collect();
        assert_eq!(providers, vec![Provider::Google, Provider::Bing]);
        assert_eq!(notifier.enabled_providers(), providers);
    }

    #[tokio::test]
    async fn test_failure_does_not_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::with_backends(vec![
            stub(Provider::Google, true, &calls),
            stub(Provider::Bing, false, &calls),
        ]);

        let outcomes = notifier.publish_url("https://example.com/page").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0].error().and_then(|e| e.provider_kind()),
            Some(Provider::Google)
        );
        assert_eq!(
            outcomes[1].notification().map(|n| n.status_code),
            Some(200)
        );
    }

    #[tokio::test]
    async fn test_remove_url_uses_deleted_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::with_backends(vec![stub(Provider::Google, false, &calls)]);

        let outcomes = notifier.remove_url("https://example.com/gone").await;
        assert_eq!(
            outcomes[0].notification().map(|n| n.notify_type),
            Some(NotifyType::Deleted)
        );
    }

    #[tokio::test]
    async fn test_no_backends_yields_no_outcomes() {
        let notifier = Notifier::new(NotifierConfig::default(), reqwest::Client::new()).unwrap();
        assert!(notifier.is_empty());
        assert!(notifier.publish_url("https://example.com").await.is_empty());
    }

    #[test]
    fn test_bad_google_credential_disables_backend_by_default() {
        let config = NotifierConfig {
            google: GoogleConfig {
                credentials: CredentialSource::Json(b"{broken".to_vec()),
                ..GoogleConfig::default()
            },
            bing: BingConfig {
                api_key: "k".to_string(),
                ..BingConfig::default()
            },
        };
        let notifier = Notifier::new(config, reqwest::Client::new()).unwrap();
        assert_eq!(notifier.enabled_providers(), vec![Provider::Bing]);
    }

    #[test]
    fn test_bad_google_credential_is_fatal_when_required() {
        let config = NotifierConfig {
            google: GoogleConfig {
                credentials: CredentialSource::Json(b"{broken".to_vec()),
                required: true,
                ..GoogleConfig::default()
            },
            bing: BingConfig {
                api_key: "k".to_string(),
                ..BingConfig::default()
            },
        };
        let err = Notifier::new(config, reqwest::Client::new()).err().unwrap();
        assert!(matches!(err, AppError::Credential { .. }));
    }

    #[test]
    fn test_missing_google_credential_is_fatal_when_required() {
        let config = NotifierConfig {
            google: GoogleConfig {
                required: true,
                ..GoogleConfig::default()
            },
            bing: BingConfig::default(),
        };
        assert!(matches!(
            Notifier::new(config, reqwest::Client::new()).err().unwrap(),
            AppError::Credential { .. }
        ));
    }

    #[test]
    fn test_google_only_when_bing_key_empty() {
        let config = NotifierConfig {
            google: GoogleConfig {
                credentials: CredentialSource::Json(test_support::service_account_json(
                    "https://oauth2.googleapis.com/token",
                )),
                ..GoogleConfig::default()
            },
            bing: BingConfig::default(),
        };
        let notifier = Notifier::new(config, reqwest::Client::new()).unwrap();
        assert_eq!(notifier.enabled_providers(), vec![Provider::Google]);
    }

    #[test]
    fn test_bad_bing_host_disables_only_bing() {
        let config = NotifierConfig {
            google: GoogleConfig {
                credentials: CredentialSource::Json(test_support::service_account_json(
                    "https://oauth2.googleapis.com/token",
                )),
                ..GoogleConfig::default()
            },
            bing: BingConfig {
                api_key: "k".to_string(),
                api_host: "ssl.bing.com".to_string(),
                strict_status: true,
            },
        };
        let notifier = Notifier::new(config, reqwest::Client::new()).unwrap();
        assert_eq!(notifier.enabled_providers(), vec![Provider::Google]);
    }
}
