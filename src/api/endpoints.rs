//! The endpoint manifest. Every backend call the client makes is one entry here;
//! the typed wrappers bind these entries instead of spelling out paths themselves.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;

use crate::error::{ClientError, ClientResult};
use crate::transport::RequestSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// One backend endpoint: a stable name, the verb, and a path template whose
/// `{param}` placeholders are filled by [`Endpoint::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub verb: Verb,
    pub path: &'static str,
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

impl Endpoint {
    pub const fn new(name: &'static str, verb: Verb, path: &'static str) -> Self {
        Self { name, verb, path }
    }

    /// Placeholder names in template order.
    pub fn params(&self) -> Vec<&'static str> {
        PLACEHOLDER.captures_iter(self.path).filter_map(|c| c.get(1).map(|m| m.as_str())).collect()
    }

    /// Fill the template. Values are percent-encoded as single path segments; a placeholder
    /// without a value is an error. Extra values are ignored.
    pub fn bind(&self, values: &[(&str, String)]) -> ClientResult<RequestSpec> {
        let mut missing: Option<String> = None;
        let path = PLACEHOLDER.replace_all(self.path, |caps: &regex::Captures| {
            let key = &caps[1];
            match values.iter().find(|(k, _)| *k == key) {
                Some((_, v)) => urlencoding::encode(v).into_owned(),
                None => {
                    if missing.is_none() { missing = Some(key.to_string()); }
                    String::new()
                }
            }
        });
        if let Some(key) = missing {
            return Err(ClientError::request(
                "missing_path_param",
                format!("endpoint '{}' needs path parameter '{}'", self.name, key),
            ));
        }
        Ok(RequestSpec::new(self.verb.method(), path.into_owned()))
    }

    /// Bind a template that has no placeholders.
    pub fn spec(&self) -> ClientResult<RequestSpec> { self.bind(&[]) }
}

macro_rules! endpoints {
    ($( $konst:ident = $name:literal, $verb:ident, $path:literal; )*) => {
        $( pub const $konst: Endpoint = Endpoint::new($name, Verb::$verb, $path); )*

        /// Every endpoint, in manifest order.
        pub const ALL: &[Endpoint] = &[ $( $konst ),* ];
    };
}

endpoints! {
    // user
    USER_LOGIN = "user.login", Post, "/user/login";
    USER_LOGOUT = "user.logout", Post, "/user/logout";
    USER_REGISTER = "user.register", Post, "/user/register";
    USER_INFO = "user.info", Get, "/user/info";
    USER_PROFILE = "user.profile", Get, "/user/profile";
    USER_PROFILE_UPDATE = "user.profile.update", Put, "/user/profile";
    USER_CHANGE_PASSWORD = "user.change_password", Post, "/user/change-password";
    USER_ADDRESSES = "user.addresses", Get, "/user/addresses";
    USER_ADDRESS_ADD = "user.addresses.add", Post, "/user/addresses";
    USER_ADDRESS_UPDATE = "user.addresses.update", Put, "/user/addresses/{id}";
    USER_ADDRESS_DELETE = "user.addresses.delete", Delete, "/user/addresses/{id}";
    USER_APPLY_SELLER = "user.apply_seller", Post, "/user/apply-seller";
    USER_SELLER_STATS = "user.seller_stats", Get, "/user/{username}/stats";

    // books
    BOOK_PAGE = "books.page", Get, "/books/page";
    BOOK_DETAIL = "books.detail", Get, "/books/{id}";
    BOOK_ADD = "books.add", Post, "/books/add";
    BOOK_OWNER_LIST = "books.owner_list", Get, "/books/owner/list";
    BOOK_UPDATE = "books.update", Put, "/books/{id}";
    BOOK_OFFLINE = "books.offline", Post, "/books/offline/{id}";
    BOOK_DELETE = "books.delete", Delete, "/books/{id}";
    BOOK_HOT = "books.hot", Get, "/books/hot";
    BOOK_SUGGESTIONS = "books.suggestions", Get, "/books/suggestions";

    // cart
    CART_LIST = "cart.list", Get, "/cart/list";
    CART_ADD = "cart.add", Post, "/cart/add/{bookId}";
    CART_REMOVE = "cart.remove", Delete, "/cart/remove/{bookId}";
    CART_CLEAR = "cart.clear", Post, "/cart/clear";

    // favorites
    FAVORITE_LIST = "favorites.list", Get, "/favorites/list";
    FAVORITE_CHECK = "favorites.check", Get, "/favorites/check/{bookId}";
    FAVORITE_IDS = "favorites.ids", Get, "/favorites/ids";
    FAVORITE_ADD = "favorites.add", Post, "/favorites/add/{bookId}";
    FAVORITE_REMOVE = "favorites.remove", Delete, "/favorites/remove/{bookId}";

    // orders
    ORDER_LIST = "orders.list", Get, "/orders/list";
    ORDER_SELLER_LIST = "orders.seller_list", Get, "/orders/seller/list";
    ORDER_CREATE = "orders.create", Post, "/orders/create";
    ORDER_PAY = "orders.pay", Post, "/orders/pay/{id}";
    ORDER_CANCEL = "orders.cancel", Post, "/orders/cancel/{id}";
    ORDER_RECEIVE = "orders.receive", Post, "/orders/receive/{id}";

    // chat
    CHAT_SEND = "chat.send", Post, "/chat/send";
    CHAT_HISTORY = "chat.history", Get, "/chat/history";
    CHAT_CONVERSATIONS = "chat.conversations", Get, "/chat/conversations";
    CHAT_READ = "chat.read", Post, "/chat/read/{peer}";

    // reviews
    REVIEW_ADD = "reviews.add", Post, "/reviews/add";
    REVIEW_MY = "reviews.my", Get, "/reviews/my";
    REVIEW_DRAFT_SAVE = "reviews.draft_save", Post, "/reviews/draft/save";
    REVIEW_RECEIVED = "reviews.received", Get, "/reviews/received";
    REVIEW_BY_SELLER = "reviews.by_seller", Get, "/reviews/seller/{sellerName}";
    REVIEW_GOOD_RATE = "reviews.good_rate", Get, "/reviews/stats/good-rate";

    // complaints
    COMPLAINT_ADD = "complaints.add", Post, "/complaints/add";
    COMPLAINT_MY = "complaints.my", Get, "/complaints/my";
    COMPLAINT_RECEIVED = "complaints.received", Get, "/complaints/received";

    // notifications
    NOTIFICATION_MY = "notifications.my", Get, "/notifications/my";

    // appeals
    APPEAL_SUBMIT = "appeals.submit", Post, "/appeals/submit";
    APPEAL_ADMIN_LIST = "appeals.admin_list", Get, "/appeals/admin/list";
    APPEAL_ADMIN_AUDIT = "appeals.admin_audit", Post, "/appeals/admin/{id}/audit";

    // isbn lookup
    ISBN_INFO = "isbn.info", Get, "/isbn/info";

    // admin
    ADMIN_SELLER_APPLICATIONS = "admin.seller_applications", Get, "/admin/seller-applications";
    ADMIN_APPROVE_SELLER = "admin.approve_seller", Post, "/admin/approve-seller/{username}";
    ADMIN_REJECT_SELLER = "admin.reject_seller", Post, "/admin/reject-seller/{username}";
    ADMIN_REVIEW_BOOKS = "admin.review_books", Get, "/admin/review/books";
    ADMIN_APPROVE_BOOK = "admin.approve_book", Post, "/admin/review/books/{id}/approve";
    ADMIN_REJECT_BOOK = "admin.reject_book", Post, "/admin/review/books/{id}/reject";
    ADMIN_USERS = "admin.users", Get, "/admin/users";
    ADMIN_USER_DETAIL = "admin.user_detail", Get, "/admin/users/{username}";
    ADMIN_USER_ROLE = "admin.user_role", Post, "/admin/users/{username}/role";
    ADMIN_USER_DELETE = "admin.user_delete", Delete, "/admin/users/{username}";
    ADMIN_USER_STATUS = "admin.user_status", Post, "/admin/users/{username}/status";
    ADMIN_USER_UNDO_BLACKLIST = "admin.user_undo_blacklist", Post, "/admin/users/{username}/undo-blacklist";
    ADMIN_USER_UPDATE = "admin.user_update", Post, "/admin/users/{username}/update";
    ADMIN_OPERATION_LOGS = "admin.operation_logs", Get, "/admin/users/logs";
    ADMIN_COMPLAINTS = "admin.complaints", Get, "/admin/complaints";
    ADMIN_APPROVE_COMPLAINT = "admin.approve_complaint", Post, "/admin/complaints/{id}/approve";
    ADMIN_REJECT_COMPLAINT = "admin.reject_complaint", Post, "/admin/complaints/{id}/reject";
    ADMIN_ANNOUNCE = "admin.announce", Post, "/admin/announce";
    ADMIN_PENDING_REVIEWS = "admin.pending_reviews", Get, "/admin/reviews/pending";
    ADMIN_AUDIT_REVIEW = "admin.audit_review", Post, "/admin/reviews/{id}/audit";
    ADMIN_UNDO_REVIEW_AUDIT = "admin.undo_review_audit", Post, "/admin/reviews/{id}/undo";
    ADMIN_DASHBOARD_STATS = "admin.dashboard_stats", Get, "/admin/stats/dashboard";
    ADMIN_EXPORT_STATS = "admin.export_stats", Get, "/admin/stats/export";
}

pub fn find(name: &str) -> Option<&'static Endpoint> {
    ALL.iter().find(|e| e.name == name)
}
