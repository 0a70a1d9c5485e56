use serde::Deserialize;

use super::endpoints::*;
use super::models::Book;
use super::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Deserialize)]
struct Collected {
    #[serde(default)]
    collected: bool,
}

impl ApiClient {
    pub async fn favorites(&self) -> ClientResult<Vec<Book>> {
        self.transport().call(FAVORITE_LIST.spec()?).await
    }

    pub async fn is_favorite(&self, book_id: i64) -> ClientResult<bool> {
        let spec = FAVORITE_CHECK.bind(&[("bookId", book_id.to_string())])?;
        let c: Collected = self.transport().call(spec).await?;
        Ok(c.collected)
    }

    pub async fn favorite_ids(&self) -> ClientResult<Vec<i64>> {
        self.transport().call(FAVORITE_IDS.spec()?).await
    }

    pub async fn add_favorite(&self, book_id: i64) -> ClientResult<()> {
        let spec = FAVORITE_ADD.bind(&[("bookId", book_id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn remove_favorite(&self, book_id: i64) -> ClientResult<()> {
        let spec = FAVORITE_REMOVE.bind(&[("bookId", book_id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }
}
