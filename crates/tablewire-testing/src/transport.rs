use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use tablewire_connectors::{ApiRequest, Transport, TransportError};

/// Scripted stand-in for the host transport.
///
/// Responses are served in FIFO order and every request is recorded for
/// assertions. Running out of scripted responses is a test bug and panics
/// with the offending URL.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful JSON response.
    pub fn respond_with(self, response: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a failure, optionally carrying an HTTP status.
    pub fn fail_with(self, status: Option<u16>, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::new(status, message)));
        self
    }

    /// All requests seen so far, in call order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn request(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let response = self.responses.lock().unwrap().pop_front();
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        response.unwrap_or_else(|| panic!("no scripted response left for request to {}", url))
    }
}
