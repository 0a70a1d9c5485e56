use serde::Deserialize;
use serde_json::Value;

use super::endpoints::*;
use super::models::Review;
use super::ApiClient;
use crate::error::ClientResult;

/// Seller rating summary: share of reviews averaging 4 or more, in percent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodRate {
    #[serde(default)]
    pub good_rate: f64,
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub positive_reviews: u64,
}

impl ApiClient {
    pub async fn add_review(&self, review: &Review) -> ClientResult<Review> {
        let spec = REVIEW_ADD.spec()?.json(review)?;
        self.transport().call(spec).await
    }

    pub async fn my_reviews(&self) -> ClientResult<Vec<Review>> {
        self.transport().call(REVIEW_MY.spec()?).await
    }

    pub async fn save_review_draft(&self, review: &Review) -> ClientResult<Review> {
        let spec = REVIEW_DRAFT_SAVE.spec()?.json(review)?;
        self.transport().call(spec).await
    }

    pub async fn received_reviews(&self) -> ClientResult<Vec<Value>> {
        self.transport().call(REVIEW_RECEIVED.spec()?).await
    }

    pub async fn seller_reviews(&self, seller_name: &str) -> ClientResult<Vec<Value>> {
        let spec = REVIEW_BY_SELLER.bind(&[("sellerName", seller_name.to_string())])?;
        self.transport().call(spec).await
    }

    pub async fn good_rate(&self) -> ClientResult<GoodRate> {
        self.transport().call(REVIEW_GOOD_RATE.spec()?).await
    }
}
