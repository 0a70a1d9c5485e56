use serde_json::{json, Value};
use tracing::{info, warn};

use super::endpoints::*;
use super::models::{Address, ChangePassword, LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, UserInfo};
use super::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::identity::{Role, Session};

impl ApiClient {
    /// Authenticate and write the returned token and role into the session.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let spec = USER_LOGIN.spec()?.json(request)?;
        let resp: LoginResponse = self.transport().call(spec).await?;
        if resp.token.trim().is_empty() {
            return Err(ClientError::decode("login response carried no token"));
        }
        let role = resp.role.as_deref().and_then(Role::parse);
        if role.is_none() {
            warn!(target: "bookpal::session", "login for '{}' returned no usable role ({:?})", request.username, resp.role);
        }
        self.session().establish(Session::new(resp.token.clone(), role))?;
        info!(target: "bookpal::session", "logged in as '{}' role={:?}", request.username, role);
        Ok(resp)
    }

    /// Tell the backend to drop the token, then clear the local session whatever the
    /// outcome. A storage failure while clearing takes precedence over a failed call,
    /// since the token is then still on disk.
    pub async fn logout(&self) -> ClientResult<()> {
        let outcome = match USER_LOGOUT.spec() {
            Ok(spec) => self.transport().call_value(spec).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = self.session().clear() {
            if let Err(call) = &outcome {
                warn!(target: "bookpal::session", "backend logout also failed: {}", call);
            }
            return Err(e);
        }
        info!(target: "bookpal::session", "logged out (backend ok: {})", outcome.is_ok());
        outcome
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Value> {
        let spec = USER_REGISTER.spec()?.json(request)?;
        self.transport().call_value(spec).await
    }

    pub async fn user_info(&self) -> ClientResult<UserInfo> {
        self.transport().call(USER_INFO.spec()?).await
    }

    pub async fn profile(&self) -> ClientResult<Value> {
        self.transport().call_value(USER_PROFILE.spec()?).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<()> {
        let spec = USER_PROFILE_UPDATE.spec()?.json(update)?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn change_password(&self, change: &ChangePassword) -> ClientResult<()> {
        let spec = USER_CHANGE_PASSWORD.spec()?.json(change)?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn addresses(&self) -> ClientResult<Vec<Address>> {
        self.transport().call(USER_ADDRESSES.spec()?).await
    }

    pub async fn add_address(&self, address: &Address) -> ClientResult<Value> {
        let spec = USER_ADDRESS_ADD.spec()?.json(address)?;
        self.transport().call_value(spec).await
    }

    pub async fn update_address(&self, id: i64, address: &Address) -> ClientResult<()> {
        let spec = USER_ADDRESS_UPDATE.bind(&[("id", id.to_string())])?.json(address)?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn delete_address(&self, id: i64) -> ClientResult<()> {
        let spec = USER_ADDRESS_DELETE.bind(&[("id", id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    /// Ask to become a seller; `payment_code_file_id` references an uploaded payment QR code.
    pub async fn apply_seller(&self, payment_code_file_id: Option<i64>) -> ClientResult<()> {
        let mut spec = USER_APPLY_SELLER.spec()?;
        if let Some(id) = payment_code_file_id {
            spec = spec.json_value(json!({ "paymentCodeFileId": id }));
        }
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn seller_stats(&self, username: &str) -> ClientResult<Value> {
        let spec = USER_SELLER_STATS.bind(&[("username", username.to_string())])?;
        self.transport().call_value(spec).await
    }
}
