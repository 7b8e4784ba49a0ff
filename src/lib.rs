//! Client library for a cloud monitoring REST API.
//!
//! Resources (entities, checks, alarms, notification plans, notifications,
//! agent tokens) follow a uniform list/get/create/update/delete pattern.
//! Request bodies are validated client-side by typed constructors before any
//! network call; a generic manager translates each operation into an HTTP
//! request against fixed URI templates and instantiates resources from the
//! server's JSON. The HTTP boundary is a trait, so the transport can be
//! swapped out wholesale in tests.
//!
//! ```no_run
//! use cloudmon::{Config, CreateEntityRequest, MonitoringClient};
//!
//! # async fn run() -> Result<(), cloudmon::ApiError> {
//! let config = Config::new("https://monitoring.example.com", "hkst4Y", "abc123");
//! let client = MonitoringClient::new(config)?;
//!
//! let request = CreateEntityRequest::new("web1")?;
//! let entity = client.create_entity(&request).await?;
//! let checks = entity.list_checks(&client).await?;
//! # let _ = checks;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
mod config;
mod error;
mod manager;
mod transport;
mod validate;

pub use api::{
    AgentToken, Alarm, Check, CheckKind, CheckType, CheckTypeField, CreateAgentTokenRequest,
    CreateAlarmRequest, CreateCheckRequest, CreateEntityRequest, CreateNotificationPlanRequest,
    CreateNotificationRequest, Entity, Notification, NotificationPlan, NotificationType,
    UpdateCheckRequest, UpdateEntityRequest, LOCAL_TARGET_ALIAS,
};
pub use client::MonitoringClient;
pub use config::Config;
pub use error::{ApiError, ConfigError, ValidationError};
pub use manager::{ApiResource, ResourceId, ResourceManager};
pub use transport::{ApiResponse, RestTransport, Transport};
