//! Generic CRUD dispatch shared by every resource type.
//!
//! A `ResourceManager<T>` turns logical list/get/create/update/delete
//! operations into HTTP calls against fixed URI templates, unwraps the list
//! envelope, and instantiates resources from the server's JSON. It holds no
//! state beyond the transport and the account-scoped base URL.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{ApiResponse, Transport};

/// Envelope key under which list responses nest their payload.
const LIST_ENVELOPE_KEY: &str = "values";

/// A server-defined resource the manager can instantiate.
///
/// Resources are only ever constructed from server responses. List results are
/// marked not fully loaded; a follow-up `get` yields the loaded form.
pub trait ApiResource: DeserializeOwned {
    fn set_loaded(&mut self, loaded: bool);
}

/// Extract an identifier from either a bare id string or a fetched resource.
pub trait ResourceId {
    fn resource_id(&self) -> &str;
}

impl ResourceId for &str {
    fn resource_id(&self) -> &str {
        self
    }
}

impl ResourceId for String {
    fn resource_id(&self) -> &str {
        self
    }
}

impl ResourceId for &String {
    fn resource_id(&self) -> &str {
        self
    }
}

/// Generic CRUD dispatcher for one resource type.
pub struct ResourceManager<T> {
    transport: Arc<dyn Transport>,
    base_url: String,
    _resource: PhantomData<fn() -> T>,
}

impl<T: ApiResource> ResourceManager<T> {
    pub fn new(transport: Arc<dyn Transport>, base_url: String) -> Self {
        Self {
            transport,
            base_url,
            _resource: PhantomData,
        }
    }

    fn url(&self, uri: &str) -> String {
        format!("{}{}", self.base_url, uri)
    }

    /// List resources at `uri`.
    ///
    /// GET by default; POST when a filter body is supplied. The response is
    /// either a bare array or a mapping with the list nested under `"values"`;
    /// a mapping without that key unwraps to an empty list. Null and empty
    /// entries are skipped. Results are flagged as not fully populated.
    pub async fn list(&self, uri: &str, filter: Option<Value>) -> Result<Vec<T>, ApiError> {
        let url = self.url(uri);
        let response = match filter {
            Some(body) => {
                self.transport
                    .request(Method::POST, &url, Some(&body))
                    .await?
            }
            None => self.transport.request(Method::GET, &url, None).await?,
        };

        let mut resources = Vec::new();
        for item in unwrap_list_envelope(response.body.unwrap_or(Value::Null)) {
            if item.is_null() || item.as_object().is_some_and(|m| m.is_empty()) {
                continue;
            }
            let mut resource: T = serde_json::from_value(item)?;
            resource.set_loaded(false);
            resources.push(resource);
        }
        Ok(resources)
    }

    /// Fetch a single, fully populated resource.
    pub async fn get(&self, uri: &str) -> Result<T, ApiError> {
        let url = self.url(uri);
        let response = self.transport.request(Method::GET, &url, None).await?;
        let body = response.body.ok_or(ApiError::EmptyResponse)?;
        let mut resource: T = serde_json::from_value(body)?;
        resource.set_loaded(true);
        Ok(resource)
    }

    /// Create a resource and fetch its full form.
    ///
    /// The creation response carries only a Location identifier, not the
    /// object, so a follow-up GET against `{uri}/{id}` completes the call.
    pub async fn create<B: Serialize>(&self, uri: &str, body: &B) -> Result<T, ApiError> {
        let response = self.post(uri, body).await?;
        let id = location_id(&response)?;
        self.get(&format!("{}/{}", uri, id)).await
    }

    /// Create a resource when the caller does not need the object back.
    pub async fn create_only<B: Serialize>(&self, uri: &str, body: &B) -> Result<(), ApiError> {
        self.post(uri, body).await.map(|_| ())
    }

    /// Create a resource and return the raw server payload instead of a
    /// resource instance.
    pub async fn create_raw<B: Serialize>(&self, uri: &str, body: &B) -> Result<Value, ApiError> {
        let response = self.post(uri, body).await?;
        Ok(response.body.unwrap_or(Value::Null))
    }

    /// PUT a full replacement body. Merging unspecified fields with current
    /// values happens at the client layer, which holds the fetched resource.
    pub async fn update<B: Serialize>(&self, uri: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(uri);
        let body = serde_json::to_value(body)?;
        self.transport
            .request(Method::PUT, &url, Some(&body))
            .await?;
        Ok(())
    }

    /// Delete the resource at `uri`.
    pub async fn delete(&self, uri: &str) -> Result<(), ApiError> {
        let url = self.url(uri);
        self.transport.request(Method::DELETE, &url, None).await?;
        Ok(())
    }

    async fn post<B: Serialize>(&self, uri: &str, body: &B) -> Result<ApiResponse, ApiError> {
        let url = self.url(uri);
        let body = serde_json::to_value(body)?;
        self.transport
            .request(Method::POST, &url, Some(&body))
            .await
    }
}

impl<T> std::fmt::Debug for ResourceManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Unwrap a list response body: a mapping nests the list under `"values"`, a
/// bare array is already the list. A mapping without the key is tolerated and
/// yields nothing.
fn unwrap_list_envelope(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove(LIST_ENVELOPE_KEY) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Pull the trailing identifier out of a create response's Location header.
fn location_id(response: &ApiResponse) -> Result<&str, ApiError> {
    response
        .location
        .as_deref()
        .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingLocation)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::transport::testing::MockTransport;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(skip)]
        loaded: bool,
    }

    impl ApiResource for Widget {
        fn set_loaded(&mut self, loaded: bool) {
            self.loaded = loaded;
        }
    }

    fn manager(transport: Arc<MockTransport>) -> ResourceManager<Widget> {
        ResourceManager::new(transport, "https://monitoring.example.com/v1.0/acct".to_string())
    }

    #[tokio::test]
    async fn test_list_unwraps_values_envelope() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({
            "values": [{"id": "w1", "label": "first"}, {"id": "w2"}],
            "metadata": {"count": 2}
        }));

        let widgets = manager(Arc::clone(&transport))
            .list("/widgets", None)
            .await
            .unwrap();
        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].id, "w1");
        assert!(!widgets[0].loaded);

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url,
            "https://monitoring.example.com/v1.0/acct/widgets"
        );
    }

    #[tokio::test]
    async fn test_list_envelope_equivalent_to_bare_array() {
        let items = json!([{"id": "w1", "label": "first"}, {"id": "w2"}]);

        let enveloped = Arc::new(MockTransport::new());
        enveloped.push_json(json!({ "values": items.clone() }));
        let from_envelope = manager(enveloped).list("/widgets", None).await.unwrap();

        let bare = Arc::new(MockTransport::new());
        bare.push_json(items);
        let from_array = manager(bare).list("/widgets", None).await.unwrap();

        assert_eq!(from_envelope, from_array);
    }

    #[tokio::test]
    async fn test_list_tolerates_missing_envelope_key() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"metadata": {"count": 0}}));

        let widgets = manager(transport).list("/widgets", None).await.unwrap();
        assert!(widgets.is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_null_and_empty_entries() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!([{"id": "w1"}, null, {}, {"id": "w2"}]));

        let widgets = manager(transport).list("/widgets", None).await.unwrap();
        assert_eq!(widgets.len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_filter_posts_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"values": []}));

        let filter = json!({"label": "web1"});
        manager(Arc::clone(&transport))
            .list("/widgets", Some(filter.clone()))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].body, Some(filter));
    }

    #[tokio::test]
    async fn test_get_marks_resource_loaded() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"id": "w1", "label": "first"}));

        let widget = manager(transport).get("/widgets/w1").await.unwrap();
        assert_eq!(widget.id, "w1");
        assert!(widget.loaded);
    }

    #[tokio::test]
    async fn test_create_follows_location_to_fetch() {
        let transport = Arc::new(MockTransport::new());
        transport.push_created("https://monitoring.example.com/v1.0/acct/widgets/w9");
        transport.push_json(json!({"id": "w9", "label": "fresh"}));

        let body = HashMap::from([("label", "fresh")]);
        let widget = manager(Arc::clone(&transport))
            .create("/widgets", &body)
            .await
            .unwrap();
        assert_eq!(widget.id, "w9");
        assert_eq!(widget.label.as_deref(), Some("fresh"));
        assert!(widget.loaded);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(
            requests[1].url,
            "https://monitoring.example.com/v1.0/acct/widgets/w9"
        );
    }

    #[tokio::test]
    async fn test_create_without_location_fails() {
        let transport = Arc::new(MockTransport::new());
        transport.push_empty();

        let body = HashMap::from([("label", "fresh")]);
        let err = manager(transport).create("/widgets", &body).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingLocation));
    }

    #[tokio::test]
    async fn test_create_only_skips_follow_up_fetch() {
        let transport = Arc::new(MockTransport::new());
        transport.push_created("https://monitoring.example.com/v1.0/acct/widgets/w9");

        let body = HashMap::from([("label", "fresh")]);
        manager(Arc::clone(&transport))
            .create_only("/widgets", &body)
            .await
            .unwrap();
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_raw_returns_server_payload() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(json!({"token": "tok-123"}));

        let body = HashMap::from([("label", "agent")]);
        let raw = manager(transport).create_raw("/widgets", &body).await.unwrap();
        assert_eq!(raw, json!({"token": "tok-123"}));
    }

    #[tokio::test]
    async fn test_update_puts_full_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push_empty();

        let body = json!({"label": "renamed"});
        manager(Arc::clone(&transport))
            .update("/widgets/w1", &body)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].body, Some(body));
    }

    #[tokio::test]
    async fn test_delete_issues_delete() {
        let transport = Arc::new(MockTransport::new());
        transport.push_empty();

        manager(Arc::clone(&transport))
            .delete("/widgets/w1")
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(
            requests[0].url,
            "https://monitoring.example.com/v1.0/acct/widgets/w1"
        );
    }

    #[test]
    fn test_location_id_handles_trailing_slash() {
        let response = ApiResponse {
            status: reqwest::StatusCode::CREATED,
            location: Some("https://example.com/v1.0/acct/widgets/w42/".to_string()),
            body: None,
        };
        assert_eq!(location_id(&response).unwrap(), "w42");
    }
}
