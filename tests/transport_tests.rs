mod common;

use std::time::Duration;

use serde_json::json;

use bookpal::api::models::{BookQuery, ChatMessage, LogQuery};
use bookpal::{ApiClient, ClientError, Role, Session, SessionHandle};

use common::{client, config, start};

#[tokio::test]
async fn token_header_follows_the_session() {
    let (mock, base) = start().await;
    mock.json("GET", "/cart/list", 200, json!([]));

    let anon = client(&base, SessionHandle::in_memory());
    anon.cart().await.unwrap();
    assert_eq!(mock.last().token, None);

    let authed = client(&base, SessionHandle::with_session(Session::new("abc", Some(Role::Buyer))));
    authed.cart().await.unwrap();
    assert_eq!(mock.last().token.as_deref(), Some("abc"));
}

#[tokio::test]
async fn delete_book_hits_exact_path_without_body() {
    let (mock, base) = start().await;
    let api = client(&base, SessionHandle::with_session(Session::new("abc", Some(Role::Seller))));
    api.delete_book(42).await.unwrap();
    let r = mock.last();
    assert_eq!(r.method, "DELETE");
    assert_eq!(r.path, "/book-api/books/42");
    assert_eq!(r.query, None);
    assert!(r.body.is_empty());
}

#[tokio::test]
async fn optional_query_parameters_are_omitted() {
    let (mock, base) = start().await;
    mock.json("GET", "/books/page", 200, json!({"total": 0, "records": []}));
    mock.json("GET", "/books/hot", 200, json!([]));
    mock.json("GET", "/chat/history", 200, json!([]));
    let api = client(&base, SessionHandle::in_memory());

    api.books(&BookQuery::keyword("abc")).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("bookName=abc"));

    api.hot_books(None).await.unwrap();
    assert_eq!(mock.last().query, None);
    api.hot_books(Some(3)).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("limit=3"));

    api.chat_history("bob", None, Some(9)).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("peer=bob&orderId=9"));

    api.remove_from_cart(5, None).await.unwrap();
    let r = mock.last();
    assert_eq!((r.method.as_str(), r.path.as_str(), r.query.clone()), ("DELETE", "/book-api/cart/remove/5", None));
}

#[tokio::test]
async fn order_create_sends_book_id_as_query() {
    let (mock, base) = start().await;
    mock.json("POST", "/orders/create", 200, json!({"id": 1, "bookId": 7, "status": "UNPAID"}));
    let api = client(&base, SessionHandle::with_session(Session::new("abc", Some(Role::Buyer))));
    let order = api.create_order(7).await.unwrap();
    assert_eq!(order.book_id, Some(7));
    let r = mock.last();
    assert_eq!(r.query.as_deref(), Some("bookId=7"));
    assert!(r.body.is_empty());
}

#[tokio::test]
async fn error_message_preference() {
    let (mock, base) = start().await;
    mock.json("POST", "/cart/add/1", 409, json!({"message": "库存不足"}));
    mock.text("POST", "/cart/add/2", 403, "not allowed");
    mock.text("POST", "/cart/add/3", 500, "");
    let api = client(&base, SessionHandle::in_memory());

    let e = api.add_to_cart(1).await.unwrap_err();
    assert_eq!(e, ClientError::ServerStructured { status: 409, message: "库存不足".into() });
    let e = api.add_to_cart(2).await.unwrap_err();
    assert_eq!(e, ClientError::ServerPlain { status: 403, message: "not allowed".into() });
    let e = api.add_to_cart(3).await.unwrap_err();
    assert_eq!(e.message(), "Request failed with status code 500");
    assert_eq!(e.status(), Some(500));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let api = client(&format!("http://127.0.0.1:{}/book-api", port), SessionHandle::in_memory());
    let e = api.hot_books(None).await.unwrap_err();
    assert!(matches!(e, ClientError::Network { .. }), "{:?}", e);
    assert_eq!(e.status(), None);
}

#[tokio::test]
async fn deadline_elapsed_is_timeout() {
    let (mock, base) = start().await;
    mock.slow("GET", "/books/hot", Duration::from_millis(800));
    let cfg = config(&base).with_timeout(Duration::from_millis(100));
    let api = ApiClient::new(&cfg, SessionHandle::in_memory()).unwrap();
    let e = api.hot_books(None).await.unwrap_err();
    assert!(e.is_timeout(), "{:?}", e);
    assert_eq!(e.message(), "timeout of 100ms exceeded");
}

#[tokio::test]
async fn unexpected_shape_is_decode_error() {
    let (mock, base) = start().await;
    mock.text("GET", "/books/3", 200, "not a book");
    let api = client(&base, SessionHandle::in_memory());
    let e = api.book(3).await.unwrap_err();
    assert_eq!(e.code_str(), "decode");
}

#[tokio::test]
async fn text_export_and_json_bodies() {
    let (mock, base) = start().await;
    mock.text("GET", "/admin/stats/export", 200, "date,orders\n2024-05-01,3\n");
    mock.json("POST", "/chat/send", 200, json!({"id": 11, "toUser": "bob", "content": "hi", "read": false}));
    let api = client(&base, SessionHandle::with_session(Session::new("adm", Some(Role::Admin))));

    let csv = api.export_stats(Some(30)).await.unwrap();
    assert!(csv.starts_with("date,orders"));
    assert_eq!(mock.last().query.as_deref(), Some("days=30"));

    let sent = api.send_message(&ChatMessage { to_user: "bob".into(), content: "hi".into(), book_id: Some(4), ..Default::default() }).await.unwrap();
    assert_eq!(sent.id, Some(11));
    assert_eq!(mock.last().json(), json!({"toUser": "bob", "bookId": 4, "content": "hi", "read": false}));
}

#[tokio::test]
async fn log_filters_and_generic_invoke() {
    let (mock, base) = start().await;
    mock.json("GET", "/admin/users/logs", 200, json!([]));
    mock.json("POST", "/admin/users/alice/status", 200, json!({"message": "ok"}));
    let api = client(&base, SessionHandle::with_session(Session::new("adm", Some(Role::Admin))));

    api.operation_logs(&LogQuery { action: Some("BLACKLIST".into()), ..Default::default() }).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("action=BLACKLIST"));

    let v = api
        .invoke("admin.user_status", &[("username".into(), "alice".into())], Some(json!({"status": "frozen"})))
        .await
        .unwrap();
    assert_eq!(v, json!({"message": "ok"}));
    let r = mock.last();
    assert_eq!(r.path, "/book-api/admin/users/alice/status");
    assert_eq!(r.json(), json!({"status": "frozen"}));
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (mock, base) = start().await;
    mock.json("GET", "/books/1", 200, json!({"id": 1, "bookName": "A"}));
    mock.json("GET", "/books/2", 404, json!({"message": "教材不存在"}));
    mock.json("GET", "/favorites/ids", 200, json!([1, 5]));
    let api = client(&base, SessionHandle::with_session(Session::new("abc", Some(Role::Buyer))));

    let (a, b, c) = futures::join!(api.book(1), api.book(2), api.favorite_ids());
    assert_eq!(a.unwrap().book_name.as_deref(), Some("A"));
    assert_eq!(b.unwrap_err().message(), "教材不存在");
    assert_eq!(c.unwrap(), vec![1, 5]);
    assert_eq!(mock.calls().len(), 3);
}
