use serde_json::Value;

use super::endpoints::*;
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// Cart lines joined with their book (`bookId`, `quantity`, `bookName`, `sellPrice`, ...).
    pub async fn cart(&self) -> ClientResult<Vec<Value>> {
        self.transport().call(CART_LIST.spec()?).await
    }

    pub async fn add_to_cart(&self, book_id: i64) -> ClientResult<()> {
        let spec = CART_ADD.bind(&[("bookId", book_id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    /// Remove `count` copies, or the whole line when `count` is `None`.
    pub async fn remove_from_cart(&self, book_id: i64, count: Option<u32>) -> ClientResult<()> {
        let spec = CART_REMOVE.bind(&[("bookId", book_id.to_string())])?.query_opt("count", count);
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn clear_cart(&self) -> ClientResult<()> {
        self.transport().call_value(CART_CLEAR.spec()?).await.map(|_| ())
    }
}
