//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use authretry::config::ClientConfig;
use authretry::{AuthenticatingClient, Coordinator};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Router;
use tokio::net::TcpListener;

type Responder = dyn Fn(&HeaderMap) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct BackendState {
    responder: Arc<Responder>,
    seen: Arc<Mutex<Vec<HeaderMap>>>,
}

/// A mock backend bound to an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockBackend {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Headers of every request received, in arrival order.
    pub fn seen(&self) -> Vec<HeaderMap> {
        self.seen.lock().unwrap().clone()
    }
}

/// Start a programmable backend. `f` sees the request headers and returns
/// the status and body to send.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&HeaderMap) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let state = BackendState {
        responder: Arc::new(f),
        seen: seen.clone(),
    };
    let app = Router::new().fallback(respond).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, seen }
}

/// Start a backend that answers with `statuses` in order, then 404.
pub async fn start_scripted_backend(statuses: &[u16]) -> MockBackend {
    let script = Mutex::new(statuses.iter().copied().collect::<VecDeque<_>>());
    start_programmable_backend(move |_| {
        let status = script.lock().unwrap().pop_front().unwrap_or(404);
        (status, format!("status {}", status))
    })
    .await
}

/// Start a backend that returns 200 only when `header` equals `value`.
pub async fn start_guarded_backend(header: &'static str, value: &'static str) -> MockBackend {
    start_programmable_backend(move |headers| match headers.get(header) {
        Some(v) if v == value => (200, "resource".into()),
        _ => (401, "unauthorized".into()),
    })
    .await
}

/// Client config suitable for talking to local mock backends.
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.system_proxy = false;
    config.timeouts.request_secs = 5;
    config
}

pub fn client_for(coordinator: Coordinator) -> AuthenticatingClient {
    AuthenticatingClient::new(&test_config(), Arc::new(coordinator)).unwrap()
}

async fn respond(State(state): State<BackendState>, headers: HeaderMap) -> (StatusCode, String) {
    let (status, body) = (state.responder)(&headers);
    state.seen.lock().unwrap().push(headers);
    (StatusCode::from_u16(status).unwrap(), body)
}
