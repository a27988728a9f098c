//! Shared test fixtures for the collection SDK integration tests.
//!
//! Provides `MockTransport`, a recording [`Transport`] that answers from a
//! queue of canned replies, plus helpers to build clients, sessions and SDKs
//! on top of it. No test touches the network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use lorcana_collection_sdk::{
    ApiClient, CollectionError, CollectionSdk, HttpRequest, HttpResponse, MemoryTokenStore,
    NoopObserver, Result, SessionManager, Transport,
};
use serde_json::Value;

pub const BASE_URL: &str = "http://backend.test/api";

enum Reply {
    Answer(HttpResponse),
    Fail(String),
}

/// Records every request and answers from a FIFO queue.
///
/// When the queue runs dry the transport fails as if the host were
/// unreachable.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a raw answer.
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Answer(HttpResponse::new(status, body)));
        self
    }

    /// Queue a JSON answer.
    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.reply(status, &body.to_string())
    }

    /// Queue a 200 answer wrapping `data` in the canonical envelope.
    pub fn reply_data(&self, data: Value) -> &Self {
        self.reply_json(200, serde_json::json!({ "data": data }))
    }

    /// Queue a connection-level failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// `"METHOD url"` for every recorded request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Answer(resp)) => Ok(resp),
            Some(Reply::Fail(msg)) => Err(CollectionError::Transport(msg)),
            None => Err(CollectionError::Transport("no reply queued".into())),
        }
    }
}

/// Parse a recorded request body back into JSON.
pub fn body_json(request: &HttpRequest) -> Value {
    serde_json::from_str(request.body.as_deref().expect("request has no body")).unwrap()
}

pub fn url(endpoint: &str) -> String {
    format!("{BASE_URL}/{endpoint}")
}

pub fn client(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::with_transport(BASE_URL, transport.clone()).with_observer(Arc::new(NoopObserver))
}

pub fn session(
    transport: &Arc<MockTransport>,
    store: &MemoryTokenStore,
) -> SessionManager<MemoryTokenStore> {
    SessionManager::new(client(transport), store.clone())
}

/// An SDK over the mock transport whose session has already been
/// authenticated with `token` (consumes one queued `/me` reply).
pub fn authenticated_sdk(transport: &Arc<MockTransport>, token: &str) -> CollectionSdk {
    let mut sdk = CollectionSdk::builder()
        .base_url(BASE_URL)
        .transport(transport.clone())
        .observer(Arc::new(NoopObserver))
        .token_store(MemoryTokenStore::new())
        .build()
        .unwrap();
    transport.reply_data(serde_json::json!({ "name": "Ariel", "email": "a@b.com" }));
    sdk.session_mut().login(token).unwrap();
    sdk
}
