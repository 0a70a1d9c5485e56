//! Client configuration: defaults, then environment overrides, then whatever the
//! caller (usually the CLI flag parser) sets explicitly.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/book-api";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_TOKEN_HEADER: &str = "token";
pub const DEFAULT_SESSION_FILE: &str = "bookpal-session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub token_header: String,
    /// `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
    /// Render results as raw JSON instead of tables.
    pub json_output: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            session_file: Some(PathBuf::from(DEFAULT_SESSION_FILE)),
            json_output: false,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `BOOKPAL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable lookup so tests do not
    /// have to mutate the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("BOOKPAL_BASE_URL").filter(|v| !v.trim().is_empty()) {
            cfg.base_url = v.trim().to_string();
        }
        if let Some(v) = lookup("BOOKPAL_TIMEOUT_MS") {
            match v.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => cfg.timeout = Duration::from_millis(ms),
                _ => tracing::warn!(target: "bookpal::config", "ignoring invalid BOOKPAL_TIMEOUT_MS='{}'", v),
            }
        }
        if let Some(v) = lookup("BOOKPAL_TOKEN_HEADER").filter(|v| !v.trim().is_empty()) {
            cfg.token_header = v.trim().to_string();
        }
        if let Some(v) = lookup("BOOKPAL_SESSION_FILE") {
            let v = v.trim();
            // "memory" (or empty) disables persistence
            cfg.session_file = if v.is_empty() || v.eq_ignore_ascii_case("memory") { None } else { Some(PathBuf::from(v)) };
        }
        if let Some(v) = lookup("BOOKPAL_OUTPUT") {
            cfg.json_output = v.eq_ignore_ascii_case("json");
        }
        cfg
    }

    pub fn with_base_url<S: Into<String>>(mut self, base: S) -> Self { self.base_url = base.into(); self }
    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }
    pub fn with_session_file(mut self, path: Option<PathBuf>) -> Self { self.session_file = path; self }

    /// Parsed base URL without a trailing slash, so endpoint paths append verbatim.
    pub fn parsed_base(&self) -> ClientResult<Url> {
        let trimmed = self.base_url.trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| ClientError::request("invalid_base_url", &format!("invalid base URL '{}': {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::request("invalid_base_url", &format!("'{}' cannot be used as a base URL", self.base_url)));
        }
        Ok(url)
    }

    pub fn timeout_ms(&self) -> u128 { self.timeout.as_millis() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = ClientConfig::from_lookup(|_| None);
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.token_header, "token");
    }

    #[test]
    fn env_overrides() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            ("BOOKPAL_BASE_URL", "https://books.example.edu/book-api/"),
            ("BOOKPAL_TIMEOUT_MS", "1500"),
            ("BOOKPAL_SESSION_FILE", "memory"),
            ("BOOKPAL_OUTPUT", "JSON"),
        ]));
        assert_eq!(cfg.base_url, "https://books.example.edu/book-api/");
        assert_eq!(cfg.timeout, Duration::from_millis(1500));
        assert_eq!(cfg.session_file, None);
        assert!(cfg.json_output);
        assert_eq!(cfg.parsed_base().unwrap().as_str(), "https://books.example.edu/book-api");
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[("BOOKPAL_TIMEOUT_MS", "soon")]));
        assert_eq!(cfg.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        let cfg = ClientConfig::from_lookup(lookup_from(&[("BOOKPAL_TIMEOUT_MS", "0")]));
        assert_eq!(cfg.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn bad_base_url_is_request_error() {
        let cfg = ClientConfig::default().with_base_url("not a url");
        let err = cfg.parsed_base().unwrap_err();
        assert_eq!(err.code_str(), "invalid_base_url");
    }
}
