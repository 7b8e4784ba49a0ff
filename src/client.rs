//! Public client surface: one manager per resource type, operations mapped
//! 1:1 onto the service's URI templates.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::api::{
    AgentToken, Alarm, Check, CheckType, CreateAgentTokenRequest, CreateAlarmRequest,
    CreateCheckRequest, CreateEntityRequest, CreateNotificationPlanRequest,
    CreateNotificationRequest, Entity, Notification, NotificationPlan, UpdateCheckRequest,
    UpdateEntityRequest,
};
use crate::config::Config;
use crate::error::ApiError;
use crate::manager::{ResourceId, ResourceManager};
use crate::transport::{RestTransport, Transport};

/// Client for the cloud monitoring service.
///
/// Holds immutable configuration and one stateless manager per resource type;
/// every call is an independent request/response round trip.
pub struct MonitoringClient {
    config: Config,
    entities: ResourceManager<Entity>,
    checks: ResourceManager<Check>,
    check_types: ResourceManager<CheckType>,
    alarms: ResourceManager<Alarm>,
    notification_plans: ResourceManager<NotificationPlan>,
    notifications: ResourceManager<Notification>,
    agent_tokens: ResourceManager<AgentToken>,
}

impl MonitoringClient {
    /// Create a client backed by the default HTTP transport.
    ///
    /// # Errors
    /// Returns `ApiError::HttpClientInit` if the HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let transport: Arc<dyn Transport> = Arc::new(RestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let base_url = config.api_base_url();
        Self {
            entities: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            checks: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            check_types: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            alarms: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            notification_plans: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            notifications: ResourceManager::new(Arc::clone(&transport), base_url.clone()),
            agent_tokens: ResourceManager::new(transport, base_url),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- Entities ----

    /// List all entities on the account.
    pub async fn list_entities(&self) -> Result<Vec<Entity>, ApiError> {
        self.entities.list("/entities", None).await
    }

    /// List entities matching a server-side filter body.
    pub async fn list_entities_matching(&self, filter: Value) -> Result<Vec<Entity>, ApiError> {
        self.entities.list("/entities", Some(filter)).await
    }

    /// Fetch one entity, fully populated.
    pub async fn get_entity(&self, entity: impl ResourceId) -> Result<Entity, ApiError> {
        self.entities
            .get(&format!("/entities/{}", entity.resource_id()))
            .await
    }

    /// Create an entity and fetch its full form.
    pub async fn create_entity(&self, request: &CreateEntityRequest) -> Result<Entity, ApiError> {
        self.entities.create("/entities", request).await
    }

    /// Update an entity, merging unspecified fields from its current values.
    ///
    /// Server-managed entities accept only metadata/agent_id changes; label
    /// and ip_addresses changes are dropped from the body.
    pub async fn update_entity(
        &self,
        entity: &Entity,
        changes: &UpdateEntityRequest,
    ) -> Result<(), ApiError> {
        let body = entity_update_body(entity, changes);
        self.entities
            .update(&format!("/entities/{}", entity.id), &body)
            .await
    }

    /// Delete an entity.
    pub async fn delete_entity(&self, entity: impl ResourceId) -> Result<(), ApiError> {
        self.entities
            .delete(&format!("/entities/{}", entity.resource_id()))
            .await
    }

    // ---- Checks ----

    /// List the checks configured against an entity.
    pub async fn list_checks(&self, entity: impl ResourceId) -> Result<Vec<Check>, ApiError> {
        self.checks
            .list(&format!("/entities/{}/checks", entity.resource_id()), None)
            .await
    }

    /// Fetch one check, fully populated.
    pub async fn get_check(
        &self,
        entity: impl ResourceId,
        check: impl ResourceId,
    ) -> Result<Check, ApiError> {
        self.checks
            .get(&format!(
                "/entities/{}/checks/{}",
                entity.resource_id(),
                check.resource_id()
            ))
            .await
    }

    /// Create a check against an entity and fetch its full form.
    pub async fn create_check(
        &self,
        entity: impl ResourceId,
        request: &CreateCheckRequest,
    ) -> Result<Check, ApiError> {
        self.checks
            .create(&format!("/entities/{}/checks", entity.resource_id()), request)
            .await
    }

    /// Update a check, merging unspecified fields from its current values.
    pub async fn update_check(
        &self,
        entity: impl ResourceId,
        check: &Check,
        changes: &UpdateCheckRequest,
    ) -> Result<(), ApiError> {
        let body = check_update_body(check, changes);
        self.checks
            .update(
                &format!("/entities/{}/checks/{}", entity.resource_id(), check.id),
                &body,
            )
            .await
    }

    /// Delete a check.
    pub async fn delete_check(
        &self,
        entity: impl ResourceId,
        check: impl ResourceId,
    ) -> Result<(), ApiError> {
        self.checks
            .delete(&format!(
                "/entities/{}/checks/{}",
                entity.resource_id(),
                check.resource_id()
            ))
            .await
    }

    /// List the server-defined catalog of check types.
    pub async fn list_check_types(&self) -> Result<Vec<CheckType>, ApiError> {
        self.check_types.list("/check_types", None).await
    }

    // ---- Alarms ----

    /// List the alarms configured against an entity.
    pub async fn list_alarms(&self, entity: impl ResourceId) -> Result<Vec<Alarm>, ApiError> {
        self.alarms
            .list(&format!("/entities/{}/alarms", entity.resource_id()), None)
            .await
    }

    /// Fetch one alarm, fully populated.
    pub async fn get_alarm(
        &self,
        entity: impl ResourceId,
        alarm: impl ResourceId,
    ) -> Result<Alarm, ApiError> {
        self.alarms
            .get(&format!(
                "/entities/{}/alarms/{}",
                entity.resource_id(),
                alarm.resource_id()
            ))
            .await
    }

    /// Create an alarm against an entity and fetch its full form.
    pub async fn create_alarm(
        &self,
        entity: impl ResourceId,
        request: &CreateAlarmRequest,
    ) -> Result<Alarm, ApiError> {
        self.alarms
            .create(&format!("/entities/{}/alarms", entity.resource_id()), request)
            .await
    }

    /// Delete an alarm.
    pub async fn delete_alarm(
        &self,
        entity: impl ResourceId,
        alarm: impl ResourceId,
    ) -> Result<(), ApiError> {
        self.alarms
            .delete(&format!(
                "/entities/{}/alarms/{}",
                entity.resource_id(),
                alarm.resource_id()
            ))
            .await
    }

    // ---- Notification plans ----

    /// List notification plans.
    pub async fn list_notification_plans(&self) -> Result<Vec<NotificationPlan>, ApiError> {
        self.notification_plans.list("/notification_plans", None).await
    }

    /// Fetch one notification plan, fully populated.
    pub async fn get_notification_plan(
        &self,
        plan: impl ResourceId,
    ) -> Result<NotificationPlan, ApiError> {
        self.notification_plans
            .get(&format!("/notification_plans/{}", plan.resource_id()))
            .await
    }

    /// Create a notification plan and fetch its full form.
    pub async fn create_notification_plan(
        &self,
        request: &CreateNotificationPlanRequest,
    ) -> Result<NotificationPlan, ApiError> {
        self.notification_plans
            .create("/notification_plans", request)
            .await
    }

    /// Delete a notification plan.
    pub async fn delete_notification_plan(&self, plan: impl ResourceId) -> Result<(), ApiError> {
        self.notification_plans
            .delete(&format!("/notification_plans/{}", plan.resource_id()))
            .await
    }

    // ---- Notifications ----

    /// List notification channels.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.notifications.list("/notifications", None).await
    }

    /// Create a notification channel and fetch its full form.
    pub async fn create_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<Notification, ApiError> {
        self.notifications.create("/notifications", request).await
    }

    /// Delete a notification channel.
    pub async fn delete_notification(
        &self,
        notification: impl ResourceId,
    ) -> Result<(), ApiError> {
        self.notifications
            .delete(&format!("/notifications/{}", notification.resource_id()))
            .await
    }

    // ---- Agent tokens ----

    /// List agent tokens.
    pub async fn list_agent_tokens(&self) -> Result<Vec<AgentToken>, ApiError> {
        self.agent_tokens.list("/agent_tokens", None).await
    }

    /// Fetch one agent token, fully populated.
    pub async fn get_agent_token(&self, token: impl ResourceId) -> Result<AgentToken, ApiError> {
        self.agent_tokens
            .get(&format!("/agent_tokens/{}", token.resource_id()))
            .await
    }

    /// Create an agent token and fetch its full form, credential included.
    pub async fn create_agent_token(
        &self,
        request: &CreateAgentTokenRequest,
    ) -> Result<AgentToken, ApiError> {
        self.agent_tokens.create("/agent_tokens", request).await
    }
}

impl std::fmt::Debug for MonitoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringClient")
            .field("base_url", &self.config.api_base_url())
            .finish()
    }
}

impl Entity {
    /// Update this entity through `client`, honoring the managed-entity
    /// field restrictions.
    pub async fn update(
        &self,
        client: &MonitoringClient,
        changes: &UpdateEntityRequest,
    ) -> Result<(), ApiError> {
        client.update_entity(self, changes).await
    }

    /// List this entity's checks, filtering out entries whose parent-entity
    /// reference names a different entity. Entries without the reference are
    /// kept: the listing URI is already entity-scoped.
    pub async fn list_checks(&self, client: &MonitoringClient) -> Result<Vec<Check>, ApiError> {
        let mut checks = client.list_checks(self).await?;
        checks.retain(|check| check.entity_id.as_deref().map_or(true, |id| id == self.id));
        Ok(checks)
    }

    /// List this entity's alarms, with the same parent-reference filter as
    /// `list_checks`.
    pub async fn list_alarms(&self, client: &MonitoringClient) -> Result<Vec<Alarm>, ApiError> {
        let mut alarms = client.list_alarms(self).await?;
        alarms.retain(|alarm| alarm.entity_id.as_deref().map_or(true, |id| id == self.id));
        Ok(alarms)
    }
}

/// Assemble the full replacement body for an entity update. The server
/// expects every mutable field, so unspecified ones carry current values.
fn entity_update_body(entity: &Entity, changes: &UpdateEntityRequest) -> Value {
    let mut body = Map::new();

    if !entity.managed {
        let label = changes.label.clone().or_else(|| entity.label.clone());
        if let Some(label) = label {
            body.insert("label".to_string(), Value::String(label));
        }
        let ip_addresses = changes
            .ip_addresses
            .clone()
            .unwrap_or_else(|| entity.ip_addresses.clone());
        body.insert(
            "ip_addresses".to_string(),
            serde_json::to_value(ip_addresses).unwrap_or(Value::Null),
        );
    }

    let metadata = changes
        .metadata
        .clone()
        .unwrap_or_else(|| entity.metadata.clone());
    body.insert(
        "metadata".to_string(),
        serde_json::to_value(metadata).unwrap_or(Value::Null),
    );

    let agent_id = changes.agent_id.clone().or_else(|| entity.agent_id.clone());
    if let Some(agent_id) = agent_id {
        body.insert("agent_id".to_string(), Value::String(agent_id));
    }

    Value::Object(body)
}

/// Assemble the full replacement body for a check update.
fn check_update_body(check: &Check, changes: &UpdateCheckRequest) -> Value {
    let mut body = Map::new();

    if let Some(ref check_type) = check.check_type {
        body.insert("type".to_string(), Value::String(check_type.clone()));
    }
    if let Some(label) = changes.label.clone().or_else(|| check.label.clone()) {
        body.insert("label".to_string(), Value::String(label));
    }
    // Caller-supplied values are serialized even when empty, so clearing a
    // field is distinguishable from leaving it unchanged.
    if let Some(details) = changes.details.clone() {
        body.insert(
            "details".to_string(),
            serde_json::to_value(details).unwrap_or(Value::Null),
        );
    } else if !check.details.is_empty() {
        body.insert(
            "details".to_string(),
            serde_json::to_value(check.details.clone()).unwrap_or(Value::Null),
        );
    }
    if let Some(period) = changes.period.or(check.period) {
        body.insert("period".to_string(), Value::from(period));
    }
    if let Some(timeout) = changes.timeout.or(check.timeout) {
        body.insert("timeout".to_string(), Value::from(timeout));
    }
    if let Some(ref alias) = check.target_alias {
        body.insert("target_alias".to_string(), Value::String(alias.clone()));
    }
    if let Some(ref hostname) = check.target_hostname {
        body.insert(
            "target_hostname".to_string(),
            Value::String(hostname.clone()),
        );
    }
    if let Some(ref resolver) = check.target_resolver {
        body.insert(
            "target_resolver".to_string(),
            Value::String(resolver.clone()),
        );
    }
    if let Some(zones) = changes.monitoring_zones_poll.clone() {
        body.insert(
            "monitoring_zones_poll".to_string(),
            serde_json::to_value(zones).unwrap_or(Value::Null),
        );
    } else if !check.monitoring_zones_poll.is_empty() {
        body.insert(
            "monitoring_zones_poll".to_string(),
            serde_json::to_value(check.monitoring_zones_poll.clone()).unwrap_or(Value::Null),
        );
    }
    let disabled = changes.disabled.unwrap_or(check.disabled);
    body.insert("disabled".to_string(), Value::Bool(disabled));

    Value::Object(body)
}
