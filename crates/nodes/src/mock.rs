//! `MockTransport`: a test double for `Transport`.
//!
//! Useful in unit and integration tests where talking to the real API is
//! either impossible or irrelevant.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{HttpRequest, Transport};
use crate::NodeError;

/// Behaviour injected into `MockTransport` at construction time.
pub enum MockBehaviour {
    /// Answer every request with the same JSON value.
    Respond(Value),
    /// Fail every request with a `Transport` error.
    Fail(String),
    /// Answer requests in order; fails once the script runs out.
    Script(Mutex<VecDeque<Result<Value, NodeError>>>),
}

/// A mock transport that records every request it receives and returns a
/// programmer-specified result.
pub struct MockTransport {
    /// What the transport will do when `send` is called.
    pub behaviour: MockBehaviour,
    /// All requests seen by this transport (in call order).
    pub calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always succeeds with the given response body.
    pub fn responding(value: Value) -> Self {
        Self::with_behaviour(MockBehaviour::Respond(value))
    }

    /// Create a mock that always fails with a transport error.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::Fail(msg.into()))
    }

    /// Create a mock that replays `responses` in order.
    pub fn scripted(responses: impl IntoIterator<Item = Result<Value, NodeError>>) -> Self {
        Self::with_behaviour(MockBehaviour::Script(Mutex::new(
            responses.into_iter().collect(),
        )))
    }

    /// Number of requests sent through this transport.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, NodeError> {
        self.calls.lock().unwrap().push(request);

        match &self.behaviour {
            MockBehaviour::Respond(value) => Ok(value.clone()),
            MockBehaviour::Fail(msg) => Err(NodeError::Transport(msg.clone())),
            MockBehaviour::Script(script) => script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(NodeError::Transport("no scripted response left".into()))),
        }
    }
}
