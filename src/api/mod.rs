//! Resource types and validated request bodies.

pub mod agent_tokens;
pub mod alarms;
pub mod checks;
pub mod entities;
pub mod notifications;

// Re-export commonly used types
pub use agent_tokens::{AgentToken, CreateAgentTokenRequest};
pub use alarms::{Alarm, CreateAlarmRequest};
pub use checks::{
    Check, CheckKind, CheckType, CheckTypeField, CreateCheckRequest, UpdateCheckRequest,
    LOCAL_TARGET_ALIAS,
};
pub use entities::{CreateEntityRequest, Entity, UpdateEntityRequest};
pub use notifications::{
    CreateNotificationPlanRequest, CreateNotificationRequest, Notification, NotificationPlan,
    NotificationType,
};
