use serde_json::Value;

use super::endpoints::*;
use super::models::{AppealSubmission, AppealVerdict, Page};
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// Appeal a blacklisting. Works without a usable session for accounts that can no longer log in.
    pub async fn submit_appeal(&self, appeal: &AppealSubmission) -> ClientResult<Value> {
        let spec = APPEAL_SUBMIT.spec()?.json(appeal)?;
        self.transport().call_value(spec).await
    }

    pub async fn appeals(&self, status: Option<&str>, page: Option<u32>, size: Option<u32>) -> ClientResult<Page<Value>> {
        let spec = APPEAL_ADMIN_LIST.spec()?
            .query_opt("status", status)
            .query_opt("page", page)
            .query_opt("size", size);
        self.transport().call(spec).await
    }

    pub async fn audit_appeal(&self, id: i64, verdict: &AppealVerdict) -> ClientResult<Value> {
        let spec = APPEAL_ADMIN_AUDIT.bind(&[("id", id.to_string())])?.json(verdict)?;
        self.transport().call_value(spec).await
    }
}
