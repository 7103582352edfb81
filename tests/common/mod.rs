//! Mock Google and Bing endpoints served by axum on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_key.pem");
pub const ACCESS_TOKEN: &str = "ya29.mock-access-token";
pub const BING_SUBMIT_PATH: &str = "/webmaster/api.svc/json/SubmitUrl";

/// Request captured by a mock route
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: Option<String>,
    pub body: String,
}

#[derive(Debug)]
pub struct MockState {
    pub token_calls: AtomicUsize,
    pub token_status: AtomicU16,
    pub token_expires_in: AtomicU64,
    pub publish_status: AtomicU16,
    pub bing_status: AtomicU16,
    pub token_requests: Mutex<Vec<Captured>>,
    pub publish_requests: Mutex<Vec<Captured>>,
    pub bing_requests: Mutex<Vec<Captured>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            token_calls: AtomicUsize::new(0),
            token_status: AtomicU16::new(200),
            token_expires_in: AtomicU64::new(3599),
            publish_status: AtomicU16::new(200),
            bing_status: AtomicU16::new(200),
            token_requests: Mutex::new(Vec::new()),
            publish_requests: Mutex::new(Vec::new()),
            bing_requests: Mutex::new(Vec::new()),
        }
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/token", post(token))
            .route("/publish", post(publish))
            .route(BING_SUBMIT_PATH, post(bing_submit))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_uri(&self) -> String {
        format!("{}/token", self.base_url())
    }

    pub fn publish_endpoint(&self) -> String {
        format!("{}/publish", self.base_url())
    }

    pub fn set_publish_status(&self, status: u16) {
        self.state.publish_status.store(status, Ordering::SeqCst);
    }

    pub fn set_bing_status(&self, status: u16) {
        self.state.bing_status.store(status, Ordering::SeqCst);
    }

    pub fn set_token_status(&self, status: u16) {
        self.state.token_status.store(status, Ordering::SeqCst);
    }

    pub fn set_token_expires_in(&self, seconds: u64) {
        self.state.token_expires_in.store(seconds, Ordering::SeqCst);
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn publish_requests(&self) -> Vec<Captured> {
        self.state.publish_requests.lock().unwrap().clone()
    }

    pub fn bing_requests(&self) -> Vec<Captured> {
        self.state.bing_requests.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<Captured> {
        self.state.token_requests.lock().unwrap().clone()
    }
}

/// Client that never routes loopback traffic through a system proxy
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn service_account_json(token_uri: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": "service_account",
        "project_id": "index-notify-test",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "publisher@index-notify-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    }))
    .unwrap()
}

fn capture(headers: &HeaderMap, query: Option<String>, body: String) -> Captured {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Captured {
        authorization: header("authorization"),
        content_type: header("content-type"),
        query,
        body,
    }
}

fn status_of(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    state
        .token_requests
        .lock()
        .unwrap()
        .push(capture(&headers, None, body));

    let status = status_of(&state.token_status);
    if !status.is_success() {
        return (
            status,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid JWT Signature."})),
        );
    }
    (
        status,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": state.token_expires_in.load(Ordering::SeqCst),
            "token_type": "Bearer"
        })),
    )
}

async fn publish(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state
        .publish_requests
        .lock()
        .unwrap()
        .push(capture(&headers, None, body));

    let status = status_of(&state.publish_status);
    if !status.is_success() {
        return (
            status,
            Json(json!({
                "error": {
                    "code": status.as_u16(),
                    "message": "Permission denied. Failed to verify the URL ownership.",
                    "status": "PERMISSION_DENIED"
                }
            })),
        );
    }

    let record = json!({
        "url": request["url"],
        "type": request["type"],
        "notifyTime": request["notifyTime"],
    });
    let latest = if request["type"] == "URL_DELETED" {
        "latestRemove"
    } else {
        "latestUpdate"
    };
    let mut metadata = json!({ "url": request["url"] });
    metadata[latest] = record;
    (status, Json(json!({ "urlNotificationMetadata": metadata })))
}

async fn bing_submit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> (StatusCode, Json<Value>) {
    state
        .bing_requests
        .lock()
        .unwrap()
        .push(capture(&headers, query, body));

    let status = status_of(&state.bing_status);
    if !status.is_success() {
        return (
            status,
            Json(json!({"ErrorCode": 14, "Message": "ERROR!!! NotAuthorized"})),
        );
    }
    (status, Json(json!({"d": null})))
}
