use super::endpoints::*;
use super::models::Notification;
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn notifications(&self) -> ClientResult<Vec<Notification>> {
        self.transport().call(NOTIFICATION_MY.spec()?).await
    }
}
