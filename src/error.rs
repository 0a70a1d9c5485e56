//! Unified client error model.
//! Every wrapper call resolves to either its payload or one of these variants; the
//! variant says where the failure came from and `message()` is the single display
//! string a front end shows to the user.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientError {
    /// No response arrived: deadline elapsed, connection refused, or the request died mid-flight.
    Network { code: String, message: String },
    /// Error status with a JSON body carrying a `message` field.
    ServerStructured { status: u16, message: String },
    /// Error status with a plain-string body.
    ServerPlain { status: u16, message: String },
    /// Error status without a usable body.
    ServerStatus { status: u16, message: String },
    /// Success status but the payload did not have the expected shape.
    Decode { message: String },
    /// The request could not be built.
    Request { code: String, message: String },
    /// Session storage could not be read or written.
    Session { code: String, message: String },
}

impl ClientError {
    pub fn code_str(&self) -> &str {
        match self {
            ClientError::Network { code, .. }
            | ClientError::Request { code, .. }
            | ClientError::Session { code, .. } => code.as_str(),
            ClientError::ServerStructured { .. } => "server_structured",
            ClientError::ServerPlain { .. } => "server_plain",
            ClientError::ServerStatus { .. } => "server_status",
            ClientError::Decode { .. } => "decode",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClientError::Network { message, .. }
            | ClientError::ServerStructured { message, .. }
            | ClientError::ServerPlain { message, .. }
            | ClientError::ServerStatus { message, .. }
            | ClientError::Decode { message }
            | ClientError::Request { message, .. }
            | ClientError::Session { message, .. } => message.as_str(),
        }
    }

    /// HTTP status of the failed response, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ServerStructured { status, .. }
            | ClientError::ServerPlain { status, .. }
            | ClientError::ServerStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network { code, .. } if code == "timeout")
    }

    pub fn network<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ClientError::Network { code: code.into(), message: msg.into() } }
    pub fn request<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ClientError::Request { code: code.into(), message: msg.into() } }
    pub fn session<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ClientError::Session { code: code.into(), message: msg.into() } }
    pub fn decode<S: Into<String>>(msg: S) -> Self { ClientError::Decode { message: msg.into() } }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for ClientError {}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ClientError::network("timeout", "request timed out");
        }
        if err.is_connect() {
            return ClientError::Network { code: "connect".into(), message: err.to_string() };
        }
        if err.is_builder() {
            return ClientError::Request { code: "invalid_request".into(), message: err.to_string() };
        }
        ClientError::Network { code: "request".into(), message: err.to_string() }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode { message: err.to_string() }
    }
}
