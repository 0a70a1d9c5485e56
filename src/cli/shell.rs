use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use crate::api::endpoints;
use crate::api::models::{BookQuery, LoginRequest};
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::identity::{FileStorage, MemoryStorage, SessionHandle, SessionStorage};
use crate::router::{Resolution, Router};

use super::command::{Command, COMMAND_HELP};

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Value(Value),
    Text(String),
    Quit,
}

/// One terminal session: the API client and the router share the same session handle.
#[derive(Debug, Clone)]
pub struct Shell {
    api: ApiClient,
    router: Router,
    json_output: bool,
}

impl Shell {
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = match &config.session_file {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };
        let session = SessionHandle::load(storage)?;
        Self::with_session(config, session)
    }

    pub fn with_session(config: &ClientConfig, session: SessionHandle) -> Result<Self> {
        let api = ApiClient::new(config, session.clone())?;
        let router = Router::new(session)?;
        Ok(Self { api, router, json_output: config.json_output })
    }

    pub fn api(&self) -> &ApiClient { &self.api }

    pub fn json_output(&self) -> bool { self.json_output }

    pub async fn execute(&self, cmd: Command) -> Result<Reply> {
        let reply = match cmd {
            Command::Login { username, password, role } => {
                let resp = self.api.login(&LoginRequest { username, password, role }).await?;
                let role = self.api.session().role().map(|r| r.as_str()).unwrap_or("(none)");
                let home = self.router.resolve("/login")?;
                let mut text = format!("logged in as {} (role: {})", resp.username.as_deref().unwrap_or("?"), role);
                if let Some(m) = resp.message.filter(|m| !m.is_empty()) {
                    text.push_str(&format!("\n{}", m));
                }
                text.push_str(&format!("\nhome: {}", home.path));
                Reply::Text(text)
            }
            Command::Logout => {
                let outcome = self.api.logout().await;
                match outcome {
                    Ok(()) => Reply::Text("logged out".to_string()),
                    Err(e @ ClientError::Session { .. }) => {
                        return Err(anyhow::anyhow!("local session could not be cleared: {}", e));
                    }
                    Err(e) => Reply::Text(format!("session cleared; backend logout failed: {}", e)),
                }
            }
            Command::Session => {
                let s = self.api.session().snapshot();
                Reply::Value(json!({
                    "authenticated": s.is_authenticated(),
                    "role": s.role.map(|r| r.as_str()),
                    "storage": self.api.session().storage_description(),
                }))
            }
            Command::Whoami => Reply::Value(serde_json::to_value(self.api.user_info().await?)?),
            Command::Go(path) => Reply::Text(describe_resolution(&path, &self.router.resolve(&path)?)),
            Command::Routes => Reply::Value(Value::Array(
                self.router
                    .routes()
                    .map(|r| json!({
                        "name": r.name,
                        "path": r.pattern,
                        "auth": r.requires_auth,
                        "roles": r.allowed_roles.iter().map(|x| x.as_str()).collect::<Vec<_>>().join(","),
                    }))
                    .collect(),
            )),
            Command::Endpoints => Reply::Value(Value::Array(
                endpoints::ALL
                    .iter()
                    .map(|e| json!({"name": e.name, "method": e.verb.as_str(), "path": e.path}))
                    .collect(),
            )),
            Command::Call { endpoint, params, body } => Reply::Value(self.api.invoke(&endpoint, &params, body).await?),
            Command::Books(keyword) => {
                let query = keyword.map(BookQuery::keyword).unwrap_or_default();
                Reply::Value(serde_json::to_value(self.api.books(&query).await?)?)
            }
            Command::Book(id) => Reply::Value(serde_json::to_value(self.api.book(id).await?)?),
            Command::Hot(limit) => Reply::Value(serde_json::to_value(self.api.hot_books(limit).await?)?),
            Command::Cart => Reply::Value(Value::Array(self.api.cart().await?)),
            Command::Orders => Reply::Value(serde_json::to_value(self.api.orders().await?)?),
            Command::Help => Reply::Text(COMMAND_HELP.to_string()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}

/// `target -> hop -> ... => route` with the guard's reasons.
pub fn describe_resolution(target: &str, res: &Resolution) -> String {
    let mut lines = Vec::new();
    for hop in &res.hops {
        match &hop.reason {
            Some(reason) => lines.push(format!("  {} -> {} ({})", hop.from, hop.to, reason)),
            None => lines.push(format!("  {} -> {}", hop.from, hop.to)),
        }
    }
    let params = if res.params.is_empty() {
        String::new()
    } else {
        let p: Vec<String> = res.params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!(" [{}]", p.join(", "))
    };
    let mut out = format!("{} => {} ({}){}", target, res.path, res.route, params);
    if !lines.is_empty() {
        out.push('\n');
        out.push_str(&lines.join("\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Role, Session};

    fn shell(session: Session) -> Shell {
        let cfg = ClientConfig::default().with_session_file(None);
        Shell::with_session(&cfg, SessionHandle::with_session(session)).unwrap()
    }

    #[tokio::test]
    async fn go_prints_redirect_chain() {
        let sh = shell(Session::new("abc", Some(Role::Buyer)));
        match sh.execute(Command::Go("/admin/dashboard".into())).await.unwrap() {
            Reply::Text(t) => {
                assert!(t.starts_with("/admin/dashboard => /buyer/home (BuyerHome)"), "{}", t);
                assert!(t.contains("role 'buyer' may not open this page"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn local_commands_need_no_backend() {
        let sh = shell(Session::anonymous());
        assert_eq!(sh.execute(Command::Quit).await.unwrap(), Reply::Quit);
        match sh.execute(Command::Session).await.unwrap() {
            Reply::Value(v) => assert_eq!(v["authenticated"], json!(false)),
            other => panic!("unexpected {:?}", other),
        }
        match sh.execute(Command::Endpoints).await.unwrap() {
            Reply::Value(Value::Array(a)) => assert_eq!(a.len(), endpoints::ALL.len()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn resolution_text_lists_params() {
        let sh = shell(Session::new("abc", Some(Role::Seller)));
        let res = sh.router.resolve("/seller/detail/alice").unwrap();
        assert_eq!(describe_resolution("/seller/detail/alice", &res), "/seller/detail/alice => /seller/detail/alice (SellerDetail) [name=alice]");
    }
}
