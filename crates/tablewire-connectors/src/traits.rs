use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// HTTP verb for a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully-described REST call for the host transport to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach a bearer token `Authorization` header.
    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .push(("Authorization".to_string(), format!("Bearer {}", token)));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if the request carries it.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Failure reported by the host transport.
///
/// `status` is the HTTP status when the service answered at all; transport
/// level failures (DNS, TLS, timeouts) carry none.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "request failed with status {}: {}", status, self.message),
            None => write!(f, "request failed: {}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Credentialed HTTP transport, owned by the host runtime
///
/// Responsibilities:
/// - Perform the described REST call and decode the response body as JSON
/// - Surface non-2xx answers and connection failures as [`TransportError`]
///
/// Connectors only build requests; they never open sockets.
pub trait Transport: Send + Sync {
    fn request(&self, request: ApiRequest) -> std::result::Result<Value, TransportError>;
}

/// Workflow-scoped key-value persistence, owned by the host runtime
///
/// Holds a trigger's subscription state between activations. Scoping (one
/// namespace per workflow instance) is the host's concern.
pub trait StateStore: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str) -> Option<Value>;
}

/// Everything the host hands a trigger for one lifecycle invocation.
pub struct HookContext<'a> {
    pub transport: &'a dyn Transport,
    pub state: &'a mut dyn StateStore,
    /// Callback URL the host allocated for this trigger's webhook route.
    pub callback_url: &'a str,
}

/// Read a typed state object stored under `key`.
///
/// Unreadable state (missing key, stale shape) reads as absent; lifecycle
/// callbacks treat that as "no subscription" and re-register.
pub fn read_state<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    store
        .get(key)
        .and_then(|value| serde_json::from_value(value).ok())
}

/// Persist a typed state object under `key`.
pub fn write_state<T: Serialize>(store: &mut dyn StateStore, key: &str, state: &T) -> Result<()> {
    let value = serde_json::to_value(state).map_err(Error::from)?;
    store.set(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bearer_header_and_query_accumulate() {
        let request = ApiRequest::new(Method::Get, "https://api.example.com/v0/meta/bases")
            .bearer("key_123")
            .query("offset", "itr456");

        assert_eq!(request.method.as_str(), "GET");
        assert_eq!(
            request.headers,
            vec![("Authorization".to_string(), "Bearer key_123".to_string())]
        );
        assert_eq!(request.query_value("offset"), Some("itr456"));
        assert_eq!(request.query_value("cursor"), None);
    }

    #[test]
    fn body_is_attached_verbatim() {
        let request = ApiRequest::new(Method::Post, "https://api.example.com/hooks")
            .body(json!({ "formId": "abc" }));
        assert_eq!(request.body, Some(json!({ "formId": "abc" })));
    }
}
