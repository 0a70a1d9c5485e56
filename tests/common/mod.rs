#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;

use bookpal::{ApiClient, ClientConfig, SessionHandle};

pub const PREFIX: &str = "/book-api";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub token: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("recorded body is JSON")
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Duration,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    calls: Arc<Mutex<Vec<Recorded>>>,
    canned: Arc<Mutex<HashMap<(String, String), Canned>>>,
}

impl MockBackend {
    /// Answer `method path` (path below the API prefix) with a JSON body.
    pub fn json(&self, method: &str, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.put(method, path, Canned { status, content_type: "application/json", body: body.to_string(), delay: Duration::ZERO })
    }

    pub fn text(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.put(method, path, Canned { status, content_type: "text/plain; charset=utf-8", body: body.to_string(), delay: Duration::ZERO })
    }

    pub fn slow(&self, method: &str, path: &str, delay: Duration) -> &Self {
        self.put(method, path, Canned { status: 200, content_type: "application/json", body: "{}".into(), delay })
    }

    fn put(&self, method: &str, path: &str, c: Canned) -> &Self {
        self.canned.lock().insert((method.to_string(), format!("{}{}", PREFIX, path)), c);
        self
    }

    pub fn calls(&self) -> Vec<Recorded> { self.calls.lock().clone() }

    pub fn last(&self) -> Recorded { self.calls().last().cloned().expect("no request recorded") }
}

async fn record(State(mock): State<MockBackend>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let rec = Recorded {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(|q| q.to_string()),
        token: headers.get("token").and_then(|v| v.to_str().ok()).map(|s| s.to_string()),
        body: body.to_vec(),
    };
    let canned = mock.canned.lock().get(&(rec.method.clone(), rec.path.clone())).cloned();
    mock.calls.lock().push(rec);
    match canned {
        Some(c) => {
            if !c.delay.is_zero() {
                tokio::time::sleep(c.delay).await;
            }
            let status = StatusCode::from_u16(c.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, c.content_type)], c.body).into_response()
        }
        // unconfigured routes answer 200 with an empty body, like the backend's void endpoints
        None => StatusCode::OK.into_response(),
    }
}

/// Start the mock on an ephemeral port; returns it with the base URL (including the prefix).
pub async fn start() -> (MockBackend, String) {
    let mock = MockBackend::default();
    let app = axum::Router::new().fallback(record).with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind 127.0.0.1:0");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("mock backend error: {e:?}");
        }
    });
    (mock, format!("http://{}{}", addr, PREFIX))
}

pub fn config(base: &str) -> ClientConfig {
    ClientConfig::default().with_base_url(base).with_session_file(None)
}

pub fn client(base: &str, session: SessionHandle) -> ApiClient {
    ApiClient::new(&config(base), session).expect("client")
}
