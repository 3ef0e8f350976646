#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use url_guard::config::Config;
use url_guard::form::UrlCheckForm;
use url_guard::threat::ThreatClient;

/// Canned answer plus a record of what the fake threat API received.
#[derive(Clone)]
pub struct MockApi {
    pub calls: Arc<AtomicUsize>,
    pub last_body: Arc<Mutex<Option<Value>>>,
    pub last_key: Arc<Mutex<Option<String>>>,
    status: StatusCode,
    reply: Value,
}

impl MockApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn find(
    State(api): State<MockApi>,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    api.calls.fetch_add(1, Ordering::SeqCst);
    *api.last_body.lock().unwrap() = Some(body);
    *api.last_key.lock().unwrap() = q.get("key").cloned();
    (api.status, Json(api.reply.clone()))
}

/// Start a fake `threatMatches:find` endpoint on an ephemeral port.
pub async fn spawn_mock(status: StatusCode, reply: Value) -> (MockApi, SocketAddr) {
    let api = MockApi {
        calls: Arc::new(AtomicUsize::new(0)),
        last_body: Arc::new(Mutex::new(None)),
        last_key: Arc::new(Mutex::new(None)),
        status,
        reply,
    };
    let app = Router::new()
        .route("/v4/find", post(find))
        .with_state(api.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (api, addr)
}

pub fn config_for(addr: SocketAddr) -> Config {
    Config::new("test-key").with_endpoint(format!("http://{addr}/v4/find"))
}

pub fn form_for(addr: SocketAddr) -> UrlCheckForm {
    let client = ThreatClient::new(&config_for(addr)).unwrap();
    UrlCheckForm::new(client)
}
