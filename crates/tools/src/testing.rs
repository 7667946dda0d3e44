use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    api::ApiClient,
    args::ToolArgs,
    error::TransportError,
    transport::{HttpRequest, HttpResponse, Transport},
};

pub const STUB_BASE_URL: &str = "http://backend.test";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

/// Transport double: replays queued responses in order and records every
/// request it is handed.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        lock(&self.responses).push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn respond_json(&self, value: Value) {
        self.respond_text(200, &value.to_string());
    }

    pub fn fail(&self, err: TransportError) {
        lock(&self.responses).push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn only_request(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no stubbed response".to_string())))
    }
}

pub fn api_for(stub: &Arc<StubTransport>) -> ApiClient {
    ApiClient::new(stub.clone(), STUB_BASE_URL)
}

pub fn args(value: Value) -> ToolArgs {
    ToolArgs::from(value)
}

pub fn url(path: &str) -> String {
    format!("{STUB_BASE_URL}{path}")
}
