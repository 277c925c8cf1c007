//! Shared fixtures for HTTP-level tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use address_validator::address::{Address, AddressSchema};
use address_validator::client::AddressValidationService;
use address_validator::error::UpstreamError;
use address_validator::normalize::AliasTable;
use address_validator::router::{build_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// In-memory validation service: returns a canned answer and records the
/// addresses it was asked about.
pub struct StubService {
    answer: Option<Value>,
    seen: Mutex<Vec<(Address, u64)>>,
}

impl StubService {
    pub fn answering(answer: Value) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<(Address, u64)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressValidationService for StubService {
    async fn validate(&self, address: &Address, timeout_ms: u64) -> Result<Value, UpstreamError> {
        self.seen.lock().unwrap().push((address.clone(), timeout_ms));
        self.answer
            .clone()
            .ok_or(UpstreamError::Status(reqwest::StatusCode::GATEWAY_TIMEOUT))
    }
}

pub fn sample_aliases() -> AliasTable {
    let mut table = AliasTable::new();
    table.insert(4000, "Glain", "Luik");
    table.insert(4000, "Luik", "Luik");
    table.insert(7170, "Bois-d'Haine", "Manage");
    table
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn build_test_app(service: Arc<dyn AddressValidationService>, timeout_ms: u64) -> Router {
    let state = AppState {
        aliases: Arc::new(sample_aliases()),
        schema: Arc::new(AddressSchema::new().unwrap()),
        client: service,
        timeout_ms,
        include_raw_response: false,
    };
    build_router(state, &static_dir())
}

pub async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

/// POST `body` to /validate and return status plus decoded body.
pub async fn post_validate(app: Router, body: impl Into<String>) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/validate")
                .header("content-type", "application/json")
                .body(Body::from(body.into()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

/// Serve `app` on an ephemeral local port; returns the `/validate` URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/validate", addr)
}
