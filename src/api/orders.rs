use super::endpoints::*;
use super::models::Order;
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// Orders placed by the current user.
    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.transport().call(ORDER_LIST.spec()?).await
    }

    /// Orders for books the current user sells.
    pub async fn seller_orders(&self) -> ClientResult<Vec<Order>> {
        self.transport().call(ORDER_SELLER_LIST.spec()?).await
    }

    pub async fn create_order(&self, book_id: i64) -> ClientResult<Order> {
        let spec = ORDER_CREATE.spec()?.query("bookId", book_id);
        self.transport().call(spec).await
    }

    pub async fn pay_order(&self, id: i64) -> ClientResult<Order> {
        self.transport().call(ORDER_PAY.bind(&[("id", id.to_string())])?).await
    }

    pub async fn cancel_order(&self, id: i64) -> ClientResult<Order> {
        self.transport().call(ORDER_CANCEL.bind(&[("id", id.to_string())])?).await
    }

    pub async fn receive_order(&self, id: i64) -> ClientResult<Order> {
        self.transport().call(ORDER_RECEIVE.bind(&[("id", id.to_string())])?).await
    }
}
