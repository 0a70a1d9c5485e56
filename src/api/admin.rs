//! Administrator endpoints: seller and listing moderation, user management, complaint
//! and review arbitration, announcements and the statistics dashboard.

use serde_json::{json, Value};

use super::endpoints::*;
use super::models::{Announcement, AuditVerdict, Book, Complaint, LogQuery, OperationLog, Review, UserStatusChange};
use super::ApiClient;
use crate::error::ClientResult;
use crate::transport::RequestSpec;

impl LogQuery {
    pub fn apply(&self, spec: RequestSpec) -> RequestSpec {
        spec.query_opt("keyword", self.keyword.as_deref())
            .query_opt("targetUser", self.target_user.as_deref())
            .query_opt("operator", self.operator.as_deref())
            .query_opt("startTime", self.start_time)
            .query_opt("endTime", self.end_time)
            .query_opt("action", self.action.as_deref())
    }
}

fn user_path(username: &str) -> [(&'static str, String); 1] {
    [("username", username.to_string())]
}

fn id_path(id: i64) -> [(&'static str, String); 1] {
    [("id", id.to_string())]
}

impl ApiClient {
    pub async fn seller_applications(&self) -> ClientResult<Vec<Value>> {
        self.transport().call(ADMIN_SELLER_APPLICATIONS.spec()?).await
    }

    pub async fn approve_seller(&self, username: &str) -> ClientResult<()> {
        let spec = ADMIN_APPROVE_SELLER.bind(&user_path(username))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn reject_seller(&self, username: &str) -> ClientResult<()> {
        let spec = ADMIN_REJECT_SELLER.bind(&user_path(username))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    /// Listings waiting for moderation.
    pub async fn books_for_review(&self) -> ClientResult<Vec<Book>> {
        self.transport().call(ADMIN_REVIEW_BOOKS.spec()?).await
    }

    pub async fn approve_book(&self, id: i64) -> ClientResult<()> {
        let spec = ADMIN_APPROVE_BOOK.bind(&id_path(id))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    /// The reason, when given, is sent as `{"reason": ...}`; otherwise no body.
    pub async fn reject_book(&self, id: i64, reason: Option<&str>) -> ClientResult<()> {
        let mut spec = ADMIN_REJECT_BOOK.bind(&id_path(id))?;
        if let Some(r) = reason {
            spec = spec.json_value(json!({ "reason": r }));
        }
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn users(&self, keyword: Option<&str>) -> ClientResult<Vec<Value>> {
        let spec = ADMIN_USERS.spec()?.query_opt("keyword", keyword);
        self.transport().call(spec).await
    }

    pub async fn user_detail(&self, username: &str) -> ClientResult<Value> {
        self.transport().call_value(ADMIN_USER_DETAIL.bind(&user_path(username))?).await
    }

    pub async fn set_user_role(&self, username: &str, role: &str) -> ClientResult<()> {
        let spec = ADMIN_USER_ROLE.bind(&user_path(username))?.query("role", role);
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn delete_user(&self, username: &str) -> ClientResult<()> {
        let spec = ADMIN_USER_DELETE.bind(&user_path(username))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn set_user_status(&self, username: &str, change: &UserStatusChange) -> ClientResult<Value> {
        let spec = ADMIN_USER_STATUS.bind(&user_path(username))?.json(change)?;
        self.transport().call_value(spec).await
    }

    pub async fn undo_blacklist(&self, username: &str, reason: Option<&str>) -> ClientResult<Value> {
        let mut spec = ADMIN_USER_UNDO_BLACKLIST.bind(&user_path(username))?;
        if let Some(r) = reason {
            spec = spec.json_value(json!({ "reason": r }));
        }
        self.transport().call_value(spec).await
    }

    /// Overwrite profile fields of `username`; `fields` uses the backend's user field names.
    pub async fn update_user(&self, username: &str, fields: &Value) -> ClientResult<Value> {
        let spec = ADMIN_USER_UPDATE.bind(&user_path(username))?.json(fields)?;
        self.transport().call_value(spec).await
    }

    pub async fn operation_logs(&self, query: &LogQuery) -> ClientResult<Vec<OperationLog>> {
        let spec = query.apply(ADMIN_OPERATION_LOGS.spec()?);
        self.transport().call(spec).await
    }

    pub async fn complaints(&self) -> ClientResult<Vec<Complaint>> {
        self.transport().call(ADMIN_COMPLAINTS.spec()?).await
    }

    pub async fn approve_complaint(&self, id: i64) -> ClientResult<()> {
        let spec = ADMIN_APPROVE_COMPLAINT.bind(&id_path(id))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn reject_complaint(&self, id: i64) -> ClientResult<()> {
        let spec = ADMIN_REJECT_COMPLAINT.bind(&id_path(id))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn announce(&self, announcement: &Announcement) -> ClientResult<Value> {
        let spec = ADMIN_ANNOUNCE.spec()?.json(announcement)?;
        self.transport().call_value(spec).await
    }

    pub async fn pending_reviews(&self) -> ClientResult<Vec<Review>> {
        self.transport().call(ADMIN_PENDING_REVIEWS.spec()?).await
    }

    pub async fn audit_review(&self, id: i64, verdict: &AuditVerdict) -> ClientResult<Value> {
        let spec = ADMIN_AUDIT_REVIEW.bind(&id_path(id))?.json(verdict)?;
        self.transport().call_value(spec).await
    }

    pub async fn undo_review_audit(&self, id: i64) -> ClientResult<()> {
        let spec = ADMIN_UNDO_REVIEW_AUDIT.bind(&id_path(id))?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn dashboard_stats(&self, days: Option<u32>) -> ClientResult<Value> {
        let spec = ADMIN_DASHBOARD_STATS.spec()?.query_opt("days", days);
        self.transport().call_value(spec).await
    }

    /// The export comes back as CSV text, not JSON.
    pub async fn export_stats(&self, days: Option<u32>) -> ClientResult<String> {
        let spec = ADMIN_EXPORT_STATS.spec()?.query_opt("days", days);
        self.transport().call_text(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_query_keeps_filter_order_and_skips_unset() {
        let q = LogQuery { target_user: Some("alice".into()), start_time: Some(1_700_000_000_000), ..Default::default() };
        let spec = q.apply(ADMIN_OPERATION_LOGS.spec().unwrap());
        assert_eq!(spec.path, "/admin/users/logs");
        assert_eq!(
            spec.query,
            vec![("targetUser".to_string(), "alice".to_string()), ("startTime".to_string(), "1700000000000".to_string())]
        );
    }
}
