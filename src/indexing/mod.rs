//! Search-engine indexing notifications.
//!
//! [`Notifier`] fans a URL notification out to the Google Indexing API and
//! Bing Webmaster backends and returns one [`PublishOutcome`] per enabled
//! backend.

mod backend;
pub mod bing;
pub mod google;
mod notifier;
mod types;

pub use backend::IndexingBackend;
pub use bing::{BingBackend, BingConfig, DEFAULT_BING_API_HOST};
pub use google::{CredentialSource, GoogleBackend, GoogleConfig};
pub use notifier::{Notifier, NotifierConfig};
pub use types::{Notification, NotifyType, Provider, PublishOutcome};
