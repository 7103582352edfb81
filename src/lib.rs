//! index-notify library
//!
//! Notifies the Google Indexing API and Bing Webmaster URL submission API
//! that pages were created, updated or deleted.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod indexing;
pub mod logger;

pub use error::{AppError, AppResult};
pub use indexing::{Notification, Notifier, NotifierConfig, NotifyType, Provider, PublishOutcome};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
