//! Entities: monitored host records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::manager::{ApiResource, ResourceId};
use crate::validate;

/// A monitored host as the server describes it.
///
/// Instances are only ever built from server responses; `loaded` is false for
/// list results until the entity is individually fetched. Server-managed
/// entities (`managed`) accept only metadata/agent_id changes on update.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Entity {
    pub id: String,
    pub label: Option<String>,
    #[serde(default)]
    pub ip_addresses: HashMap<String, String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub agent_id: Option<String>,
    #[serde(default)]
    pub managed: bool,
    pub uri: Option<String>,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for Entity {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &Entity {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Validated body for entity creation.
///
/// `ip_addresses` and `metadata` default to empty maps and are always
/// serialized, matching the server's expected body shape.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEntityRequest {
    pub label: String,
    pub ip_addresses: HashMap<String, String>,
    pub metadata: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl CreateEntityRequest {
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        Ok(Self {
            label,
            ip_addresses: HashMap::new(),
            metadata: HashMap::new(),
            agent_id: None,
        })
    }

    /// At most 64 entries.
    pub fn with_ip_addresses(
        mut self,
        ip_addresses: HashMap<String, String>,
    ) -> Result<Self, ValidationError> {
        validate::check_entries(
            "ip_addresses",
            ip_addresses.len(),
            validate::IP_ADDRESSES_MAX_ENTRIES,
        )?;
        self.ip_addresses = ip_addresses;
        Ok(self)
    }

    /// At most 256 entries.
    pub fn with_metadata(
        mut self,
        metadata: HashMap<String, String>,
    ) -> Result<Self, ValidationError> {
        validate::check_entries("metadata", metadata.len(), validate::METADATA_MAX_ENTRIES)?;
        self.metadata = metadata;
        Ok(self)
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Result<Self, ValidationError> {
        let agent_id = agent_id.into();
        validate::check_agent_id(&agent_id)?;
        self.agent_id = Some(agent_id);
        Ok(self)
    }
}

/// Fields a caller wants changed on an entity. Unset fields keep their
/// current server-side values; the client layer performs the merge.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntityRequest {
    pub label: Option<String>,
    pub ip_addresses: Option<HashMap<String, String>>,
    pub metadata: Option<HashMap<String, String>>,
    pub agent_id: Option<String>,
}

impl UpdateEntityRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        self.label = Some(label);
        Ok(self)
    }

    pub fn with_ip_addresses(
        mut self,
        ip_addresses: HashMap<String, String>,
    ) -> Result<Self, ValidationError> {
        validate::check_entries(
            "ip_addresses",
            ip_addresses.len(),
            validate::IP_ADDRESSES_MAX_ENTRIES,
        )?;
        self.ip_addresses = Some(ip_addresses);
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

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Result<Self, ValidationError> {
        let agent_id = agent_id.into();
        validate::check_agent_id(&agent_id)?;
        self.agent_id = Some(agent_id);
        Ok(self)
    }
}
