//! Outbound HTTP: the `Transport` capability and its `reqwest` implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::infomaniak::request::Method;
use crate::params::scalar_to_string;
use crate::NodeError;

/// Default timeout for a whole request: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing a connection: 10 seconds.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully resolved request, ready to go on the wire.
#[derive(Clone, PartialEq, Serialize)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Map<String, Value>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case("authorization") {
                    (key.as_str(), "<redacted>")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .finish()
    }
}

/// Sends one request and returns the decoded JSON body.
///
/// Timeouts, cancellation and retries are the implementation's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Value, NodeError>;
}

// ---------------------------------------------------------------------------
// reqwest transport
// ---------------------------------------------------------------------------

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("infomaniak-node/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, NodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| NodeError::Transport(format!("cannot create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Render query values as strings; nested values are sent as JSON text.
fn query_pairs(query: &Map<String, Value>) -> Vec<(&str, String)> {
    query
        .iter()
        .map(|(key, value)| {
            let rendered = scalar_to_string(value).unwrap_or_else(|| value.to_string());
            (key.as_str(), rendered)
        })
        .collect()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, NodeError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&query_pairs(&request.query));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NodeError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| NodeError::Transport(e.to_string()))?;

        debug!(status, bytes = text.len(), "received response");
        decode_response(status, &text)
    }
}

/// Decode a response body.
///
/// Non-2xx answers that still carry the provider envelope (an object with a
/// `result` field) are returned so the normalizer can report the provider's
/// own message. Any other non-2xx answer is a transport error.
pub fn decode_response(status: u16, text: &str) -> Result<Value, NodeError> {
    let success = (200..300).contains(&status);
    if text.trim().is_empty() {
        return if success {
            Ok(Value::Null)
        } else {
            Err(NodeError::Transport(format!("HTTP {status}")))
        };
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) if success || value.get("result").is_some() => Ok(value),
        Ok(_) => Err(NodeError::Transport(format!("HTTP {status}: {text}"))),
        Err(e) if success => Err(NodeError::Transport(format!("invalid JSON response: {e}"))),
        Err(_) => Err(NodeError::Transport(format!("HTTP {status}: {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("infomaniak-node/"));
    }

    #[test]
    fn successful_json_is_decoded() {
        let value = decode_response(200, r#"{"result":"success","data":[]}"#).unwrap();
        assert_eq!(value, json!({ "result": "success", "data": [] }));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(decode_response(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn error_status_with_envelope_is_passed_through() {
        let body = r#"{"result":"error","error":{"code":"not_authorized"}}"#;
        let value = decode_response(401, body).unwrap();
        assert_eq!(value["error"]["code"], json!("not_authorized"));
    }

    #[test]
    fn error_status_without_envelope_is_a_transport_error() {
        let err = decode_response(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(
            err,
            NodeError::Transport("HTTP 502: <html>bad gateway</html>".into())
        );
    }

    #[test]
    fn invalid_json_on_success_is_a_transport_error() {
        assert!(matches!(
            decode_response(200, "not json"),
            Err(NodeError::Transport(msg)) if msg.starts_with("invalid JSON response")
        ));
    }

    #[test]
    fn query_values_are_rendered_as_strings() {
        let query = json!({ "limit": 10, "with_count": true, "order": "desc" });
        let mut pairs = query_pairs(query.as_object().unwrap());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("limit", "10".to_owned()),
                ("order", "desc".to_owned()),
                ("with_count", "true".to_owned()),
            ]
        );
    }

    #[test]
    fn debug_output_redacts_authorization() {
        let request = HttpRequest {
            method: Method::Get,
            url: "https://api.infomaniak.com/1/profile".into(),
            headers: vec![("Authorization".into(), "Bearer secret-token".into())],
            query: Map::new(),
            body: None,
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("secret-token"));
        assert_eq!(request.header("authorization"), Some("Bearer secret-token"));
    }
}
