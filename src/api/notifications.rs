//! Notifications and notification plans: delivery channels and the
//! severity-grouped escalation policies that reference them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::manager::{ApiResource, ResourceId};
use crate::validate;

/// Supported delivery channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Webhook,
    Email,
}

impl FromStr for NotificationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webhook" => Ok(Self::Webhook),
            "email" => Ok(Self::Email),
            other => Err(ValidationError::InvalidNotificationType(other.to_string())),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => f.write_str("webhook"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// A delivery channel.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    #[serde(default)]
    pub details: HashMap<String, Value>,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for Notification {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &Notification {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// An escalation policy grouping notifications by alert severity.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NotificationPlan {
    pub id: String,
    pub label: Option<String>,
    #[serde(default)]
    pub critical_state: Vec<String>,
    #[serde(default)]
    pub ok_state: Vec<String>,
    #[serde(default)]
    pub warning_state: Vec<String>,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for NotificationPlan {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &NotificationPlan {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Validated body for notification creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNotificationRequest {
    pub label: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub details: HashMap<String, Value>,
}

impl CreateNotificationRequest {
    pub fn new(
        label: impl Into<String>,
        notification_type: NotificationType,
        details: HashMap<String, Value>,
    ) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        validate::check_entries("details", details.len(), validate::DETAILS_MAX_ENTRIES)?;
        Ok(Self {
            label,
            notification_type,
            details,
        })
    }

    /// Webhook channel posting to `url`.
    pub fn webhook(
        label: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let details = HashMap::from([("url".to_string(), Value::String(url.into()))]);
        Self::new(label, NotificationType::Webhook, details)
    }

    /// Email channel delivering to `address`.
    pub fn email(
        label: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let details = HashMap::from([("address".to_string(), Value::String(address.into()))]);
        Self::new(label, NotificationType::Email, details)
    }
}

/// Validated body for notification plan creation. The state lists hold
/// notification ids to fire for each alert severity.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNotificationPlanRequest {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub critical_state: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ok_state: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warning_state: Vec<String>,
}

impl CreateNotificationPlanRequest {
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        Ok(Self {
            label,
            critical_state: Vec::new(),
            ok_state: Vec::new(),
            warning_state: Vec::new(),
        })
    }

    pub fn with_critical_state(mut self, notification_ids: Vec<String>) -> Self {
        self.critical_state = notification_ids;
        self
    }

    pub fn with_ok_state(mut self, notification_ids: Vec<String>) -> Self {
        self.ok_state = notification_ids;
        self
    }

    pub fn with_warning_state(mut self, notification_ids: Vec<String>) -> Self {
        self.warning_state = notification_ids;
        self
    }
}
