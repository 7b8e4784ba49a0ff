//! HTTP transport boundary.
//!
//! The manager layer treats the transport as opaque: four verbs in, a decoded
//! JSON body and response metadata out. The default implementation wraps
//! `reqwest`; tests substitute an in-memory implementation.

use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;

/// Decoded HTTP response: status, the Location header when present, and the
/// JSON body when one was returned.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Option<Value>,
}

/// Opaque HTTP collaborator used by the manager layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and decode the response.
    ///
    /// Transport and HTTP-status failures surface as `ApiError`; success
    /// responses are returned as-is with no interpretation of the body.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError>;
}

/// Service error envelope, e.g. `{"type": "badRequest", "code": 400, "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    #[allow(dead_code)]
    code: Option<i64>,
    message: String,
}

/// Byte budget for response bodies echoed into debug logs.
const LOG_BODY_LIMIT: usize = 500;

/// Cut `text` at the largest char boundary not past `limit`, so bodies with
/// multi-byte characters never panic the logging path.
fn truncate_on_char_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// `reqwest`-backed transport carrying the account token.
#[derive(Clone)]
pub struct RestTransport {
    http_client: Client,
    token: String,
    debug: bool,
}

impl RestTransport {
    /// Create a transport from client configuration.
    ///
    /// # Errors
    /// Returns `ApiError::HttpClientInit` if the HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            http_client,
            token: config.token.clone(),
            debug: config.debug,
        })
    }

    /// Parse an error response body, preferring the service envelope.
    fn parse_error_response(&self, status: StatusCode, body: &str) -> ApiError {
        if let Ok(error) = serde_json::from_str::<ServiceErrorBody>(body) {
            ApiError::Service {
                status,
                error_type: error.error_type,
                message: error.message,
            }
        } else {
            ApiError::HttpError {
                status,
                body: body.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        if self.debug {
            tracing::debug!(method = %method, url = %url, "monitoring API request");
        }

        let mut request = self
            .http_client
            .request(method, url)
            .header("X-Auth-Token", &self.token)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status.is_success() {
            let text = response.text().await?;
            if self.debug {
                let truncated = if text.len() > LOG_BODY_LIMIT {
                    format!("{}...(truncated)", truncate_on_char_boundary(&text, LOG_BODY_LIMIT))
                } else {
                    text.clone()
                };
                tracing::debug!(%status, body = %truncated, "monitoring API response");
            }
            let body = if text.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text)?)
            };
            Ok(ApiResponse {
                status,
                location,
                body,
            })
        } else {
            let text = response.text().await.unwrap_or_default();
            if self.debug {
                tracing::debug!(%status, body = %text, "monitoring API error response");
            }
            Err(self.parse_error_response(status, &text))
        }
    }
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("debug", &self.debug)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> RestTransport {
        let config = Config::new("https://monitoring.example.com", "hkst4Y", "abc123");
        RestTransport::new(&config).unwrap()
    }

    #[test]
    fn test_parse_error_response_service_envelope() {
        let err = transport().parse_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"type": "badRequest", "code": 400, "message": "label too long"}"#,
        );
        match err {
            ApiError::Service {
                status,
                error_type,
                message,
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(error_type, "badRequest");
                assert_eq!(message, "label too long");
            }
            other => panic!("expected Service error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncation_lands_on_char_boundary() {
        // 200 euro signs: 600 bytes, and byte 500 falls inside a character.
        let body = "€".repeat(200);
        let truncated = truncate_on_char_boundary(&body, LOG_BODY_LIMIT);
        assert_eq!(truncated.len(), 498);
        assert_eq!(truncated.chars().count(), 166);
        assert!(body.starts_with(truncated));
    }

    #[test]
    fn test_truncation_returns_short_text_whole() {
        assert_eq!(truncate_on_char_boundary("short", LOG_BODY_LIMIT), "short");
        let exactly = "a".repeat(LOG_BODY_LIMIT);
        assert_eq!(truncate_on_char_boundary(&exactly, LOG_BODY_LIMIT), exactly);
    }

    #[test]
    fn test_truncation_on_ascii_cuts_at_limit() {
        let body = "x".repeat(LOG_BODY_LIMIT + 100);
        assert_eq!(
            truncate_on_char_boundary(&body, LOG_BODY_LIMIT).len(),
            LOG_BODY_LIMIT
        );
    }

    #[test]
    fn test_parse_error_response_plain_body() {
        let err = transport().parse_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected HttpError, got {:?}", other),
        }
    }
}
