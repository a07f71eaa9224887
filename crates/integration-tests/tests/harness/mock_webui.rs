//! Mock host backend for integration tests
//!
//! Serves `POST /api/v1/images/generations` the way the chat host does and
//! records every request body it receives.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the mock answers generation requests
#[derive(Debug, Clone)]
pub enum Reply {
    /// Host-served file: `[{"url": "/api/v1/files/<id>/content"}]`
    HostFile(String),
    /// Image written to the local filesystem: `[{"file_path": ...}]`
    LocalFile(PathBuf),
    /// Failure with a FastAPI-style `{"detail": ...}` body
    Detail(StatusCode, String),
    /// Success status with no images
    Empty,
}

pub struct MockWebUi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    reply: Reply,
    request_count: AtomicU32,
    bodies: Mutex<Vec<Value>>,
    authorizations: Mutex<Vec<Option<String>>>,
}

impl MockWebUi {
    /// Start a mock that serves a host file URL
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Reply::HostFile("mock-1".to_owned())).await
    }

    pub async fn start_with(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            request_count: AtomicU32::new(0),
            bodies: Mutex::new(Vec::new()),
            authorizations: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/v1/images/generations", routing::post(handle_generations))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the backend
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent generation request
    pub fn last_body(&self) -> Option<Value> {
        self.state.bodies.lock().unwrap().last().cloned()
    }

    /// `Authorization` header of the most recent generation request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.authorizations.lock().unwrap().last().cloned().flatten()
    }
}

impl Drop for MockWebUi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generations(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.bodies.lock().unwrap().push(body);
    state.authorizations.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    );

    match &state.reply {
        Reply::HostFile(id) => Json(json!([{ "url": format!("/api/v1/files/{id}/content") }])).into_response(),
        Reply::LocalFile(path) => Json(json!([{ "file_path": path }])).into_response(),
        Reply::Detail(status, detail) => (*status, Json(json!({ "detail": detail }))).into_response(),
        Reply::Empty => Json(json!([])).into_response(),
    }
}
