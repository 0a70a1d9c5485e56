use serde_json::Value;

use super::endpoints::*;
use super::models::ChatMessage;
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn send_message(&self, message: &ChatMessage) -> ClientResult<ChatMessage> {
        let spec = CHAT_SEND.spec()?.json(message)?;
        self.transport().call(spec).await
    }

    /// Conversation with `peer`, optionally narrowed to one book or order.
    pub async fn chat_history(&self, peer: &str, book_id: Option<i64>, order_id: Option<i64>) -> ClientResult<Vec<ChatMessage>> {
        let spec = CHAT_HISTORY.spec()?
            .query("peer", peer)
            .query_opt("bookId", book_id)
            .query_opt("orderId", order_id);
        self.transport().call(spec).await
    }

    pub async fn conversations(&self) -> ClientResult<Vec<Value>> {
        self.transport().call(CHAT_CONVERSATIONS.spec()?).await
    }

    pub async fn mark_read(&self, peer: &str) -> ClientResult<()> {
        let spec = CHAT_READ.bind(&[("peer", peer.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }
}
