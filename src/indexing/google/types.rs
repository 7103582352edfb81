//! Indexing API wire types.

use crate::indexing::NotifyType;
use serde::{Deserialize, Serialize};

/// `UrlNotification` as sent to `urlNotifications:publish`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlNotificationRequest {
    pub url: String,
    #[serde(rename = "type")]
    pub notify_type: NotifyType,
    pub notify_time: String,
}

/// Latest update/remove notification the API has on record
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlNotificationRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub notify_type: Option<String>,
    #[serde(default)]
    pub notify_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlNotificationMetadata {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub latest_update: Option<UrlNotificationRecord>,
    #[serde(default)]
    pub latest_remove: Option<UrlNotificationRecord>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublishUrlNotificationResponse {
    #[serde(default)]
    pub url_notification_metadata: Option<UrlNotificationMetadata>,
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
