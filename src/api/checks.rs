//! Checks: health probes configured against an entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::manager::{ApiResource, ResourceId};
use crate::validate;

/// Sentinel alias for checks that run on the host itself.
pub const LOCAL_TARGET_ALIAS: &str = "default";

/// A configured probe.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Check {
    pub id: String,
    pub entity_id: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub check_type: Option<String>,
    #[serde(default)]
    pub details: HashMap<String, Value>,
    pub period: Option<u32>,
    pub timeout: Option<u32>,
    pub target_alias: Option<String>,
    pub target_hostname: Option<String>,
    pub target_resolver: Option<String>,
    #[serde(default)]
    pub monitoring_zones_poll: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for Check {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &Check {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Server-defined catalog entry describing a kind of probe. Read-only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckType {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<CheckTypeField>,
    #[serde(skip)]
    pub loaded: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckTypeField {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl ApiResource for CheckType {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &CheckType {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Where a check probes from: on the monitored host itself, or remotely from
/// the service's polling zones against a named target.
#[derive(Debug, Clone)]
pub enum CheckKind {
    Local,
    Remote {
        target_alias: Option<String>,
        target_hostname: Option<String>,
        target_resolver: Option<String>,
    },
}

/// Validated body for check creation.
///
/// Local checks fix `target_alias` to the sentinel and omit
/// hostname/resolver; remote checks require at least one of alias/hostname.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckRequest {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resolver: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monitoring_zones_poll: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl CreateCheckRequest {
    pub fn new(check_type: impl Into<String>, kind: CheckKind) -> Result<Self, ValidationError> {
        let check_type = check_type.into();
        validate::check_length(
            "type",
            &check_type,
            validate::CHECK_TYPE_MIN,
            validate::CHECK_TYPE_MAX,
        )?;

        let (target_alias, target_hostname, target_resolver) = match kind {
            CheckKind::Local => (Some(LOCAL_TARGET_ALIAS.to_string()), None, None),
            CheckKind::Remote {
                target_alias,
                target_hostname,
                target_resolver,
            } => {
                if target_alias.is_none() && target_hostname.is_none() {
                    // Remote probes need something to aim at.
                    return Err(ValidationError::InvalidSize {
                        field: "target_alias",
                        actual: 0,
                        min: validate::TARGET_ALIAS_MIN,
                        max: validate::TARGET_ALIAS_MAX,
                    });
                }
                if let Some(ref alias) = target_alias {
                    validate::check_length(
                        "target_alias",
                        alias,
                        validate::TARGET_ALIAS_MIN,
                        validate::TARGET_ALIAS_MAX,
                    )?;
                }
                if let Some(ref hostname) = target_hostname {
                    validate::check_length(
                        "target_hostname",
                        hostname,
                        validate::TARGET_HOSTNAME_MIN,
                        validate::TARGET_HOSTNAME_MAX,
                    )?;
                }
                if let Some(ref resolver) = target_resolver {
                    validate::check_length(
                        "target_resolver",
                        resolver,
                        validate::TARGET_RESOLVER_MIN,
                        validate::TARGET_RESOLVER_MAX,
                    )?;
                }
                (target_alias, target_hostname, target_resolver)
            }
        };

        Ok(Self {
            check_type,
            label: None,
            details: HashMap::new(),
            period: None,
            timeout: None,
            target_alias,
            target_hostname,
            target_resolver,
            monitoring_zones_poll: Vec::new(),
            disabled: false,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        self.label = Some(label);
        Ok(self)
    }

    pub fn with_details(mut self, details: HashMap<String, Value>) -> Result<Self, ValidationError> {
        validate::check_entries("details", details.len(), validate::DETAILS_MAX_ENTRIES)?;
        self.details = details;
        Ok(self)
    }

    /// Seconds between probe runs, 30..=1800.
    pub fn with_period(mut self, period: u32) -> Result<Self, ValidationError> {
        validate::check_range(
            "period",
            i64::from(period),
            validate::PERIOD_MIN,
            validate::PERIOD_MAX,
        )?;
        self.period = Some(period);
        Ok(self)
    }

    /// Seconds before a probe run is abandoned, 2..=1800.
    pub fn with_timeout(mut self, timeout: u32) -> Result<Self, ValidationError> {
        validate::check_range(
            "timeout",
            i64::from(timeout),
            validate::TIMEOUT_MIN,
            validate::TIMEOUT_MAX,
        )?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_monitoring_zones(mut self, zones: Vec<String>) -> Self {
        self.monitoring_zones_poll = zones;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Fields a caller wants changed on a check; the client layer merges unset
/// fields from the current check into the full replacement body.
#[derive(Debug, Clone, Default)]
pub struct UpdateCheckRequest {
    pub label: Option<String>,
    pub details: Option<HashMap<String, Value>>,
    pub period: Option<u32>,
    pub timeout: Option<u32>,
    pub monitoring_zones_poll: Option<Vec<String>>,
    pub disabled: Option<bool>,
}

impl UpdateCheckRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        self.label = Some(label);
        Ok(self)
    }

    pub fn with_details(mut self, details: HashMap<String, Value>) -> Result<Self, ValidationError> {
        validate::check_entries("details", details.len(), validate::DETAILS_MAX_ENTRIES)?;
        self.details = Some(details);
        Ok(self)
    }

    pub fn with_period(mut self, period: u32) -> Result<Self, ValidationError> {
        validate::check_range(
            "period",
            i64::from(period),
            validate::PERIOD_MIN,
            validate::PERIOD_MAX,
        )?;
        self.period = Some(period);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: u32) -> Result<Self, ValidationError> {
        validate::check_range(
            "timeout",
            i64::from(timeout),
            validate::TIMEOUT_MIN,
            validate::TIMEOUT_MAX,
        )?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_monitoring_zones(mut self, zones: Vec<String>) -> Self {
        self.monitoring_zones_poll = Some(zones);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_local_check_body_uses_sentinel_alias() {
        let request = CreateCheckRequest::new("remote.http", CheckKind::Local)
            .unwrap()
            .with_period(60)
            .unwrap()
            .with_timeout(10)
            .unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["target_alias"], json!("default"));
        assert_eq!(body["period"], json!(60));
        assert_eq!(body["timeout"], json!(10));
        assert!(body.get("target_hostname").is_none());
        assert!(body.get("target_resolver").is_none());
        assert!(body.get("disabled").is_none());
    }

    #[test]
    fn test_remote_check_requires_alias_or_hostname() {
        let err = CreateCheckRequest::new(
            "remote.ping",
            CheckKind::Remote {
                target_alias: None,
                target_hostname: None,
                target_resolver: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSize { .. }));
    }

    #[test]
    fn test_remote_check_with_hostname() {
        let request = CreateCheckRequest::new(
            "remote.ping",
            CheckKind::Remote {
                target_alias: None,
                target_hostname: Some("web1.example.com".to_string()),
                target_resolver: Some("IPv4".to_string()),
            },
        )
        .unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["target_hostname"], json!("web1.example.com"));
        assert_eq!(body["target_resolver"], json!("IPv4"));
        assert!(body.get("target_alias").is_none());
    }

    #[test]
    fn test_remote_check_rejects_oversized_hostname() {
        let result = CreateCheckRequest::new(
            "remote.ping",
            CheckKind::Remote {
                target_alias: None,
                target_hostname: Some("h".repeat(257)),
                target_resolver: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_check_type_length_bounds() {
        assert!(CreateCheckRequest::new("", CheckKind::Local).is_err());
        assert!(CreateCheckRequest::new("a".repeat(26), CheckKind::Local).is_err());
        assert!(CreateCheckRequest::new("a".repeat(25), CheckKind::Local).is_ok());
    }

    #[test]
    fn test_period_and_timeout_bounds() {
        let base = || CreateCheckRequest::new("remote.http", CheckKind::Local).unwrap();
        assert!(base().with_period(29).is_err());
        assert!(base().with_period(30).is_ok());
        assert!(base().with_period(1800).is_ok());
        assert!(base().with_period(1801).is_err());
        assert!(base().with_timeout(1).is_err());
        assert!(base().with_timeout(2).is_ok());
        assert!(base().with_timeout(1800).is_ok());
        assert!(base().with_timeout(1801).is_err());
    }

    #[test]
    fn test_disabled_flag_serialized_when_set() {
        let request = CreateCheckRequest::new("remote.http", CheckKind::Local)
            .unwrap()
            .disabled();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["disabled"], json!(true));
    }

    #[test]
    fn test_check_type_deserializes_fields() {
        let check_type: CheckType = serde_json::from_value(json!({
            "id": "remote.http",
            "fields": [
                {"name": "url", "description": "Target URL", "optional": false}
            ]
        }))
        .unwrap();
        assert_eq!(check_type.fields.len(), 1);
        assert_eq!(check_type.fields[0].name, "url");
        assert!(!check_type.fields[0].optional);
    }
}
