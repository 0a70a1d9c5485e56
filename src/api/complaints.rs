use serde_json::Value;

use super::endpoints::*;
use super::models::Complaint;
use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    pub async fn file_complaint(&self, complaint: &Complaint) -> ClientResult<Complaint> {
        let spec = COMPLAINT_ADD.spec()?.json(complaint)?;
        self.transport().call(spec).await
    }

    pub async fn my_complaints(&self) -> ClientResult<Vec<Complaint>> {
        self.transport().call(COMPLAINT_MY.spec()?).await
    }

    /// Complaints against orders the current user sold.
    pub async fn received_complaints(&self) -> ClientResult<Vec<Value>> {
        self.transport().call(COMPLAINT_RECEIVED.spec()?).await
    }
}
