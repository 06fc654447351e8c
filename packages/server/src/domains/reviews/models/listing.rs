use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Review, ReviewStatus};
use crate::common::Listable;

pub const UNKNOWN_PRODUCT: &str = "Unknown product";
pub const UNKNOWN_AUTHOR: &str = "Unknown customer";

/// A review as the moderation queue shows it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListing {
    #[serde(flatten)]
    pub review: Review,
    pub product_name: String,
    pub product_image: Option<String>,
    pub author_name: String,
    #[serde(skip)]
    id_text: String,
}

impl ReviewListing {
    pub fn new(
        review: Review,
        product_name: Option<String>,
        product_image: Option<String>,
        author_name: Option<String>,
    ) -> Self {
        let id_text = review.id.to_string();
        Self {
            review,
            product_name: product_name.unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            product_image,
            author_name: author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            id_text,
        }
    }
}

impl Listable for ReviewListing {
    type Status = ReviewStatus;

    fn status(&self) -> &ReviewStatus {
        &self.review.status
    }

    fn listed_at(&self) -> DateTime<Utc> {
        self.review.created_at
    }

    fn tie_breaker(&self) -> Uuid {
        self.review.id.into_uuid()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.author_name.as_str(),
            self.product_name.as_str(),
            self.review.comment.as_str(),
            self.id_text.as_str(),
        ];
        if let Some(title) = &self.review.title {
            fields.push(title.as_str());
        }
        fields
    }
}
