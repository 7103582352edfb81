//! Core backend trait.
//!
//! One implementation per search-index provider. The notifier only sees
//! backends through this trait, which keeps the fan-out independent of how
//! each provider authenticates or shapes its request.

use super::types::{Notification, NotifyType, Provider};
use crate::error::AppResult;
use async_trait::async_trait;

/// Trait for search-index providers (Google, Bing)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All backends must be Send + Sync so the notifier can drive them
/// concurrently.
#[async_trait]
pub trait IndexingBackend: Send + Sync {
    /// Provider this backend submits to
    fn provider(&self) -> Provider;

    /// Submits a single URL notification
    ///
    /// # Returns
    /// A [`Notification`] describing the accepted submission, or a
    /// provider/URL error. Implementations never retry.
    async fn notify(&self, url: &str, notify_type: NotifyType) -> AppResult<Notification>;
}
