use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{ServiceError, ServiceResult};
use crate::kernel::{BaseDocumentStore, StoredDocument};

pub const CONTENT_COLLECTION: &str = "content_blocks";

/// Longest slug accepted on write.
pub const MAX_SLUG_LEN: usize = 128;

/// ContentBlock - a piece of editable site copy addressed by its slug
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub slug: String,
    pub title: String,
    pub body: String,
    /// Payload for key/value style entries (e.g. `topbar_text`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub is_active: bool,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for an upsert. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub value: Option<Value>,
    pub is_active: Option<bool>,
    pub metadata: Option<Map<String, Value>>,
}

/// Stored body; the slug lives in the document key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    metadata: Map<String, Value>,
}

fn default_active() -> bool {
    true
}

impl From<ContentFields> for ContentBody {
    fn from(fields: ContentFields) -> Self {
        ContentBody {
            title: fields.title.unwrap_or_default(),
            body: fields.body.unwrap_or_default(),
            value: fields.value,
            is_active: fields.is_active.unwrap_or(true),
            metadata: fields.metadata.unwrap_or_default(),
        }
    }
}

/// Check a slug for writing and return its trimmed form.
pub fn validate_slug(slug: &str) -> ServiceResult<String> {
    let slug = slug.trim();

    if slug.is_empty() {
        return Err(ServiceError::validation("slug", "must not be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(ServiceError::validation(
            "slug",
            format!("must be at most {} characters", MAX_SLUG_LEN),
        ));
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(ServiceError::validation(
            "slug",
            format!("contains unsupported character '{}'", bad),
        ));
    }

    Ok(slug.to_string())
}

// =============================================================================
// Store access - ALL content queries live here
// =============================================================================

impl ContentBlock {
    fn from_document(doc: StoredDocument) -> ServiceResult<Self> {
        let body: ContentBody = doc.decode()?;
        let slug = doc.key.clone().ok_or_else(|| {
            ServiceError::Integrity(format!("content block {} has no slug", doc.id))
        })?;

        Ok(ContentBlock {
            slug,
            title: body.title,
            body: body.body,
            value: body.value,
            is_active: body.is_active,
            metadata: body.metadata,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }

    /// Find the block for a slug. `None` is a normal outcome.
    pub async fn find_by_slug(
        slug: &str,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Option<Self>> {
        let mut docs = store.find_by_key(CONTENT_COLLECTION, slug).await?;

        if docs.len() > 1 {
            tracing::error!(slug, count = docs.len(), "Multiple content blocks share a slug");
            return Err(ServiceError::Integrity(format!(
                "{} content blocks share slug '{}'",
                docs.len(),
                slug
            )));
        }

        docs.pop().map(Self::from_document).transpose()
    }

    pub async fn find_all(store: &dyn BaseDocumentStore) -> ServiceResult<Vec<Self>> {
        store
            .find_all(CONTENT_COLLECTION)
            .await?
            .into_iter()
            .map(Self::from_document)
            .collect()
    }

    /// Create or replace the block for `slug` in one atomic store call.
    pub async fn upsert(
        slug: &str,
        fields: ContentFields,
        store: &dyn BaseDocumentStore,
    ) -> ServiceResult<Self> {
        let body = serde_json::to_value(ContentBody::from(fields))
            .map_err(crate::kernel::StoreError::from)?;
        let doc = store.upsert_by_key(CONTENT_COLLECTION, slug, body).await?;
        Self::from_document(doc)
    }

    /// Returns whether a block was removed
    pub async fn delete_by_slug(slug: &str, store: &dyn BaseDocumentStore) -> ServiceResult<bool> {
        Ok(store.delete_by_key(CONTENT_COLLECTION, slug).await?)
    }
}
