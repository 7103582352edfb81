//! Rendering of publish outcomes for the terminal.

use serde::Serialize;

use crate::indexing::{Notification, NotifyType, Provider, PublishOutcome};

/// Outcomes of one URL across all enabled backends
#[derive(Debug, Serialize)]
pub struct UrlReport {
    pub url: String,
    #[serde(rename = "type")]
    pub notify_type: NotifyType,
    pub outcomes: Vec<OutcomeReport>,
}

/// Serializable view of a [`PublishOutcome`]
#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub provider: Provider,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PublishOutcome> for OutcomeReport {
    fn from(outcome: PublishOutcome) -> Self {
        let provider = outcome.provider();
        match outcome.into_result() {
            Ok(notification) => OutcomeReport {
                provider,
                success: true,
                status: Some(notification.status_code),
                notification: Some(notification),
                error: None,
            },
            Err(error) => OutcomeReport {
                provider,
                success: false,
                notification: None,
                status: error.status(),
                error: Some(error_chain(&error)),
            },
        }
    }
}

impl UrlReport {
    pub fn new(url: &str, notify_type: NotifyType, outcomes: Vec<PublishOutcome>) -> Self {
        Self {
            url: url.to_string(),
            notify_type,
            outcomes: outcomes.into_iter().map(OutcomeReport::from).collect(),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    /// One line per backend, e.g. `google  ok    200  https://example.com/ URL_UPDATED`
    pub fn to_text(&self) -> String {
        self.outcomes
            .iter()
            .map(|o| {
                let status = o.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                match (&o.notification, &o.error) {
                    (Some(n), _) => format!(
                        "{:<7} ok    {:>3}  {} {} {}",
                        o.provider, status, self.url, self.notify_type, n.notify_time
                    ),
                    (None, error) => format!(
                        "{:<7} FAIL  {:>3}  {} {}",
                        o.provider,
                        status,
                        self.url,
                        error.as_deref().unwrap_or("unknown error")
                    ),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flattens an error and its sources into one line
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
