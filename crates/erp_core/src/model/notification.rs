//! Notification record shown in the dashboard bell menu.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NotificationId = String;

/// Severity bucket used for icon and color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub read: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl Notification {
    /// Sets `read`; returns `true` when the flag actually changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}
