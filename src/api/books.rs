use serde_json::Value;

use super::endpoints::*;
use super::models::{Book, BookQuery, Page};
use super::ApiClient;
use crate::error::ClientResult;
use crate::transport::RequestSpec;

/// Default number of hot books when no limit is given (matches the backend default).
pub const DEFAULT_HOT_LIMIT: u32 = 6;

impl BookQuery {
    /// Attach the set filters as query pairs; unset ones are left out.
    pub fn apply(&self, spec: RequestSpec) -> RequestSpec {
        spec.query_opt("bookName", self.book_name.as_deref())
            .query_opt("minPrice", self.min_price)
            .query_opt("maxPrice", self.max_price)
            .query_opt("conditionLevel", self.condition_level.as_deref())
            .query_opt("pageNum", self.page_num)
            .query_opt("pageSize", self.page_size)
            .query_opt("sortBy", self.sort_by.as_deref())
    }
}

impl ApiClient {
    pub async fn books(&self, query: &BookQuery) -> ClientResult<Page<Book>> {
        let spec = query.apply(BOOK_PAGE.spec()?);
        self.transport().call(spec).await
    }

    pub async fn book(&self, id: i64) -> ClientResult<Book> {
        self.transport().call(BOOK_DETAIL.bind(&[("id", id.to_string())])?).await
    }

    pub async fn add_book(&self, book: &Book) -> ClientResult<Book> {
        let spec = BOOK_ADD.spec()?.json(book)?;
        self.transport().call(spec).await
    }

    /// Listings owned by the current seller.
    pub async fn my_books(&self) -> ClientResult<Vec<Book>> {
        self.transport().call(BOOK_OWNER_LIST.spec()?).await
    }

    pub async fn update_book(&self, id: i64, book: &Book) -> ClientResult<Book> {
        let spec = BOOK_UPDATE.bind(&[("id", id.to_string())])?.json(book)?;
        self.transport().call(spec).await
    }

    pub async fn offline_book(&self, id: i64) -> ClientResult<()> {
        let spec = BOOK_OFFLINE.bind(&[("id", id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn delete_book(&self, id: i64) -> ClientResult<()> {
        let spec = BOOK_DELETE.bind(&[("id", id.to_string())])?;
        self.transport().call_value(spec).await.map(|_| ())
    }

    pub async fn hot_books(&self, limit: Option<u32>) -> ClientResult<Vec<Book>> {
        let spec = BOOK_HOT.spec()?.query_opt("limit", limit);
        self.transport().call(spec).await
    }

    pub async fn suggestions(&self, keyword: &str) -> ClientResult<Vec<String>> {
        let spec = BOOK_SUGGESTIONS.spec()?.query("keyword", keyword);
        self.transport().call(spec).await
    }

    /// Catalogue data for an ISBN, as the backend's lookup service returns it.
    pub async fn isbn_info(&self, isbn: &str) -> ClientResult<Value> {
        let spec = ISBN_INFO.spec()?.query("isbn", isbn);
        self.transport().call_value(spec).await
    }
}
