//! Wire models for the marketplace API (camelCase on the wire).
//! Fields the backend may omit are `Option` or defaulted; responses whose shape is an
//! open map stay as `serde_json::Value` at the call site.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Kept as text; an unknown role yields a session without a role.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub seller_status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default, alias = "isVerified")]
    pub verified: bool,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub seller_status: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub sell_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub condition_level: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub seller_type: Option<String>,
    #[serde(default)]
    pub audit_reason: Option<String>,
    #[serde(default)]
    pub audit_time: Option<i64>,
}

/// Paged listing as returned by `/books/page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// Filters for `/books/page`; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub book_name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub condition_level: Option<String>,
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
}

impl BookQuery {
    pub fn keyword<S: Into<String>>(kw: S) -> Self {
        Self { book_name: Some(kw.into()), ..Default::default() }
    }

    pub fn page(mut self, num: u32, size: u32) -> Self {
        self.page_num = Some(num);
        self.page_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Serialized by the backend as an ISO local datetime.
    #[serde(default)]
    pub create_time: Option<Value>,
    #[serde(default)]
    pub expire_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user: Option<String>,
    pub to_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub order_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub score_condition: i32,
    pub score_service: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub order_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub to_user: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appeal {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub proof_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub audit_reason: Option<String>,
    #[serde(default)]
    pub audit_time: Option<i64>,
    #[serde(default)]
    pub auditor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
}

/// Filters for the admin operation log; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub keyword: Option<String>,
    pub target_user: Option<String>,
    pub operator: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub action: Option<String>,
}

/// Body of `/admin/users/{username}/status`. Blacklisting needs a second admin's confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusChange {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_admin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_admin_pwd: Option<String>,
}

/// Moderation verdict body shared by review audits (`status` + `reason`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditVerdict {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealSubmission {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealVerdict {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_response_tolerates_missing_fields() {
        let r: LoginResponse = serde_json::from_value(json!({"token": "abc", "role": "seller", "isVerified": true})).unwrap();
        assert_eq!(r.token, "abc");
        assert_eq!(r.role.as_deref(), Some("seller"));
        assert!(r.verified);
        assert!(r.username.is_none());
    }

    #[test]
    fn login_request_omits_absent_role() {
        let v = serde_json::to_value(LoginRequest { username: "u".into(), password: "p".into(), role: None }).unwrap();
        assert_eq!(v, json!({"username": "u", "password": "p"}));
        let v = serde_json::to_value(LoginRequest { username: "u".into(), password: "p".into(), role: Some(Role::Buyer) }).unwrap();
        assert_eq!(v["role"], "buyer");
    }

    #[test]
    fn page_of_books() {
        let p: Page<Book> = serde_json::from_value(json!({
            "total": 2,
            "records": [
                {"id": 1, "bookName": "高等数学", "sellPrice": 12.5, "conditionLevel": "九成新"},
                {"id": 2, "bookName": "大学物理"}
            ]
        })).unwrap();
        assert_eq!(p.total, 2);
        assert_eq!(p.records[0].book_name.as_deref(), Some("高等数学"));
        assert_eq!(p.records[1].sell_price, None);
    }

    #[test]
    fn complaint_type_field_renamed() {
        let c = Complaint { order_id: 7, kind: "fake".into(), detail: "not as described".into(), ..Default::default() };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v, json!({"orderId": 7, "type": "fake", "detail": "not as described"}));
    }
}
