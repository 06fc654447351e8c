use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::ReviewStatus;
use crate::common::{MemberId, ProductId, ReviewId, ServiceError, ServiceResult};
use crate::kernel::{BaseDocumentStore, StoreError, StoredDocument};

pub const REVIEW_COLLECTION: &str = "reviews";

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MAX_IMAGES: usize = 10;

/// Review - a storefront customer's rating of a product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub author: MemberId,
    pub product: ProductId,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: String,
    pub images: Vec<String>,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderated_by: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission payload as sent by the storefront.
///
/// Rating is kept wide so out-of-range values reach validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product: ProductId,
    pub rating: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    pub product: ProductId,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: String,
    pub images: Vec<String>,
}

impl NewReview {
    pub fn validate(self) -> ServiceResult<ValidReview> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ServiceError::validation(
                "rating",
                format!("must be between {} and {}", MIN_RATING, MAX_RATING),
            ));
        }
        let rating = self.rating as u8;

        let comment = self.comment.unwrap_or_default().trim().to_string();
        if comment.is_empty() {
            return Err(ServiceError::validation("comment", "is required"));
        }

        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if self.images.len() > MAX_IMAGES {
            return Err(ServiceError::validation(
                "images",
                format!("at most {} images are allowed", MAX_IMAGES),
            ));
        }
        for (i, image) in self.images.iter().enumerate() {
            validate_image_url(image)
                .map_err(|message| ServiceError::validation(format!("images[{}]", i), message))?;
        }

        Ok(ValidReview {
            product: self.product,
            rating,
            title,
            comment,
            images: self.images,
        })
    }
}

fn validate_image_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("not a valid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported URL scheme '{}'", other)),
    }
}

/// Stored body; id and timestamps belong to the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    author: MemberId,
    product: ProductId,
    rating: u8,
    #[serde(default)]
    title: Option<String>,
    comment: String,
    #[serde(default)]
    images: Vec<String>,
    status: ReviewStatus,
    #[serde(default)]
    moderated_by: Option<MemberId>,
    #[serde(default)]
    moderated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Store access - ALL review queries live here
// =============================================================================

impl Review {
    fn from_document(doc: StoredDocument) -> ServiceResult<Self> {
        let body: ReviewBody = doc.decode()?;
        Ok(Review {
            id: ReviewId::from_uuid(doc.id),
            author: body.author,
            product: body.product,
            rating: body.rating,
            title: body.title,
            comment: body.comment,
            images: body.images,
            status: body.status,
            moderated_by: body.moderated_by,
            moderated_at: body.moderated_at,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    fn body(&self) -> ReviewBody {
        ReviewBody {
            author: self.author,
            product: self.product,
            rating: self.rating,
            title: self.title.clone(),
            comment: self.comment.clone(),
            images: self.images.clone(),
            status: self.status,
            moderated_by: self.moderated_by,
            moderated_at: self.moderated_at,
        }
    }

    /// Store a new review in `Pending`
    pub async fn create(
        author: MemberId,
        review: ValidReview,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Self> {
        let body = ReviewBody {
            author,
            product: review.product,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            images: review.images,
            status: ReviewStatus::Pending,
            moderated_by: None,
            moderated_at: None,
        };
        let body = serde_json::to_value(&body).map_err(StoreError::from)?;
        let doc = store.insert(REVIEW_COLLECTION, None, body).await?;
        Self::from_document(doc)
    }

    pub async fn find_by_id(
        id: ReviewId,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Option<Self>> {
        store
            .find_by_id(REVIEW_COLLECTION, id.into_uuid())
            .await?
            .map(Self::from_document)
            .transpose()
    }

    pub async fn find_all(store: &dyn BaseDocumentStore) -> ServiceResult<Vec<Self>> {
        store
            .find_all(REVIEW_COLLECTION)
            .await?
            .into_iter()
            .map(Self::from_document)
            .collect()
    }

    /// Apply a moderation decision through the transition table.
    pub fn moderate(
        mut self,
        next: ReviewStatus,
        moderator: MemberId,
        at: DateTime<Utc>,
    ) -> ServiceResult<Self> {
        self.status = self.status.transition(next)?;
        self.moderated_by = Some(moderator);
        self.moderated_at = Some(at);
        Ok(self)
    }

    /// Persist the current body, provided the stored review is still the one
    /// this value was loaded from. `None` when it was deleted or written since.
    pub async fn save(&self, store: &dyn BaseDocumentStore) -> ServiceResult<Option<Self>> {
        let body = serde_json::to_value(self.body()).map_err(StoreError::from)?;
        store
            .update_if(REVIEW_COLLECTION, self.id.into_uuid(), self.updated_at, body)
            .await?
            .map(Self::from_document)
            .transpose()
    }

    /// Returns whether a review was removed
    pub async fn delete(id: ReviewId, store: &dyn BaseDocumentStore) -> ServiceResult<bool> {
        Ok(store.delete(REVIEW_COLLECTION, id.into_uuid()).await?)
    }
}
