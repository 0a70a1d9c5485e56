//! HTTP transport shim.
//!
//! Wraps a `reqwest::Client` configured with a fixed base URL and deadline. Every call
//! reads the session token and sends it in the token header, strips the response down
//! to its body on success, and normalises failures into a [`ClientError`]. Nothing is
//! retried.

use std::fmt::Display;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::identity::SessionHandle;

/// One outgoing call: method, path below the base URL, query pairs and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn get<P: Into<String>>(path: P) -> Self { Self::new(Method::GET, path) }
    pub fn post<P: Into<String>>(path: P) -> Self { Self::new(Method::POST, path) }

    pub fn query<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds the pair only when a value is supplied.
    pub fn query_opt<K: Into<String>, V: Display>(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn json_value(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone)]
pub struct Transport {
    base: Url,
    client: reqwest::Client,
    token_header: HeaderName,
    timeout_ms: u128,
    session: SessionHandle,
}

impl Transport {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        let base = config.parsed_base()?;
        let token_header = HeaderName::from_bytes(config.token_header.as_bytes())
            .map_err(|e| ClientError::request("invalid_token_header", format!("'{}': {}", config.token_header, e)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { base, client, token_header, timeout_ms: config.timeout_ms(), session })
    }

    pub fn base(&self) -> &Url { &self.base }

    pub fn session(&self) -> &SessionHandle { &self.session }

    /// Absolute URL for `path`; the path is appended to the base, never resolved against it,
    /// so a base of `http://host/book-api` keeps its prefix.
    pub fn url_for(&self, path: &str) -> ClientResult<Url> {
        let mut s = self.base.as_str().trim_end_matches('/').to_string();
        if !path.starts_with('/') { s.push('/'); }
        s.push_str(path);
        Url::parse(&s).map_err(|e| ClientError::request("invalid_path", format!("'{}': {}", path, e)))
    }

    /// Call and deserialize the body into `T`.
    pub async fn call<T: DeserializeOwned>(&self, spec: RequestSpec) -> ClientResult<T> {
        let value = self.call_value(spec).await?;
        serde_json::from_value(value).map_err(|e| ClientError::decode(format!("unexpected response shape: {}", e)))
    }

    /// Call and return the body as JSON. Non-JSON bodies become a JSON string, empty bodies `null`.
    pub async fn call_value(&self, spec: RequestSpec) -> ClientResult<Value> {
        let bytes = self.execute(spec).await?;
        Ok(body_to_value(&bytes))
    }

    /// Call and return the raw body as text (exports).
    pub async fn call_text(&self, spec: RequestSpec) -> ClientResult<String> {
        let bytes = self.execute(spec).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn execute(&self, spec: RequestSpec) -> ClientResult<Vec<u8>> {
        let url = self.url_for(&spec.path)?;
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.token() {
            let v = HeaderValue::from_str(&token)
                .map_err(|e| ClientError::request("invalid_token", e.to_string()))?;
            headers.insert(self.token_header.clone(), v);
        }
        debug!(target: "bookpal::transport", "{} {} query={:?} body={}", spec.method, url.path(), spec.query, spec.body.is_some());

        let mut req = self.client.request(spec.method.clone(), url).headers(headers);
        if !spec.query.is_empty() {
            req = req.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(self.network_error(e), &spec)),
        };
        let status = resp.status();
        let bytes = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => return Err(self.fail(self.network_error(e), &spec)),
        };
        if status.is_success() {
            return Ok(bytes.to_vec());
        }
        Err(self.fail(normalize_error(status, &bytes), &spec))
    }

    fn network_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            return ClientError::network("timeout", format!("timeout of {}ms exceeded", self.timeout_ms));
        }
        ClientError::from(err)
    }

    fn fail(&self, err: ClientError, spec: &RequestSpec) -> ClientError {
        warn!(target: "bookpal::transport", "request failed: {} {} -> {}", spec.method, spec.path, err.message());
        err
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base", &self.base.as_str())
            .field("timeout_ms", &self.timeout_ms)
            .field("token_header", &self.token_header.as_str())
            .finish()
    }
}

fn body_to_value(bytes: &[u8]) -> Value {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Value::Null;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(v) => v,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Build the error for a non-success response. Preference: a JSON `message` field, then
/// a plain-string body, then the bare status line.
pub fn normalize_error(status: StatusCode, body: &[u8]) -> ClientError {
    let code = status.as_u16();
    match body_to_value(body) {
        Value::Object(map) => {
            if let Some(Value::String(m)) = map.get("message") {
                if !m.is_empty() {
                    return ClientError::ServerStructured { status: code, message: m.clone() };
                }
            }
        }
        Value::String(s) if !s.trim().is_empty() => {
            return ClientError::ServerPlain { status: code, message: s };
        }
        _ => {}
    }
    ClientError::ServerStatus { status: code, message: format!("Request failed with status code {}", code) }
}
