//! Agent tokens: credentials used by local monitoring agents to authenticate.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::manager::{ApiResource, ResourceId};
use crate::validate;

/// A monitoring agent credential. The `token` field carries the credential
/// string the server generated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AgentToken {
    pub id: String,
    pub label: Option<String>,
    pub token: Option<String>,
    #[serde(skip)]
    pub loaded: bool,
}

impl ApiResource for AgentToken {
    fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl ResourceId for &AgentToken {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Validated body for agent token creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentTokenRequest {
    pub label: String,
}

impl CreateAgentTokenRequest {
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        validate::check_length("label", &label, validate::LABEL_MIN, validate::LABEL_MAX)?;
        Ok(Self { label })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_body_shape() {
        let request = CreateAgentTokenRequest::new("web-fleet").unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"label": "web-fleet"})
        );
    }

    #[test]
    fn test_label_bounds() {
        assert!(CreateAgentTokenRequest::new("").is_err());
        assert!(CreateAgentTokenRequest::new("a".repeat(255)).is_ok());
        assert!(CreateAgentTokenRequest::new("a".repeat(256)).is_err());
    }

    #[test]
    fn test_deserializes_credential() {
        let token: AgentToken = serde_json::from_value(json!({
            "id": "at1",
            "label": "web-fleet",
            "token": "0941274034c89719"
        }))
        .unwrap();
        assert_eq!(token.token.as_deref(), Some("0941274034c89719"));
    }
}
