//! Alarms: rules mapping check results to notification delivery.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::manager::{ApiResource, ResourceId};
use crate::validate;

/// An alert rule bound to a check and a notification plan.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Alarm {
    pub id: String,
    pub entity_id: Option<String>,
    pub check_id: Option<String>,
    pub notification_plan_id: Option<String>,
    pub criteria: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for Alarm {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &Alarm {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Validated body for alarm creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAlarmRequest {
    pub check_id: String,
    pub notification_plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl CreateAlarmRequest {
    pub fn new(check: impl ResourceId, notification_plan: impl ResourceId) -> Self {
        Self {
            check_id: check.resource_id().to_string(),
            notification_plan_id: notification_plan.resource_id().to_string(),
            criteria: None,
            label: None,
            metadata: None,
            disabled: false,
        }
    }

    /// Alert criteria DSL text, 1..=16384 characters.
    pub fn with_criteria(mut self, criteria: impl Into<String>) -> Result<Self, ValidationError> {
        let criteria = criteria.into();
        validate::check_length(
            "criteria",
            &criteria,
            validate::CRITERIA_MIN,
            validate::CRITERIA_MAX,
        )?;
        self.criteria = Some(criteria);
        Ok(self)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        self.label = Some(label);
        Ok(self)
    }

    pub fn with_metadata(
        mut self,
        metadata: HashMap<String, String>,
    ) -> Result<Self, ValidationError> {
        validate::check_entries("metadata", metadata.len(), validate::METADATA_MAX_ENTRIES)?;
        self.metadata = Some(metadata);
        Ok(self)
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}
