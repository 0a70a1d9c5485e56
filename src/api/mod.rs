//! Typed client for the marketplace backend.
//!
//! [`ApiClient`] owns a [`Transport`] and exposes one async method per backend call,
//! grouped by resource in the sibling modules. Every method resolves to the decoded
//! body or a [`ClientError`](crate::error::ClientError); none of them retry.
//!
//! [`ApiClient::invoke`] drives any manifest entry by name, which is what the CLI's
//! `call` command uses.

pub mod endpoints;
pub mod models;

mod admin;
mod appeals;
mod books;
mod cart;
mod chat;
mod complaints;
mod favorites;
mod notifications;
mod orders;
mod reviews;
mod users;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::identity::SessionHandle;
use crate::transport::{RequestSpec, Transport};

pub use endpoints::{Endpoint, Verb};

#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        Ok(Self { transport: Transport::new(config, session)? })
    }

    pub fn from_transport(transport: Transport) -> Self { Self { transport } }

    pub fn transport(&self) -> &Transport { &self.transport }

    pub fn session(&self) -> &SessionHandle { self.transport.session() }

    /// Call a manifest entry by name. Params whose key matches a path placeholder fill
    /// it; the rest are sent as query pairs in the given order.
    pub async fn invoke(&self, name: &str, params: &[(String, String)], body: Option<Value>) -> ClientResult<Value> {
        let spec = prepare(name, params, body)?;
        self.transport.call_value(spec).await
    }
}

/// Build the request for `invoke` without sending it.
pub fn prepare(name: &str, params: &[(String, String)], body: Option<Value>) -> ClientResult<RequestSpec> {
    let endpoint = endpoints::find(name)
        .ok_or_else(|| ClientError::request("unknown_endpoint", format!("no endpoint named '{}'", name)))?;
    let placeholders = endpoint.params();
    let bound: Vec<(&str, String)> = params
        .iter()
        .filter(|(k, _)| placeholders.contains(&k.as_str()))
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    let mut spec = endpoint.bind(&bound)?;
    for (k, v) in params.iter().filter(|(k, _)| !placeholders.contains(&k.as_str())) {
        spec = spec.query(k.clone(), v);
    }
    if let Some(body) = body {
        spec = spec.json_value(body);
    }
    Ok(spec)
}
