// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business rules (merging, validation, status machines) live in domains/*.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::common::{MemberId, ProductId};

// =============================================================================
// Document Store Trait (Infrastructure - external document database)
// =============================================================================

/// A JSON document as the store hands it back.
///
/// `id`, `created_at` and `updated_at` are owned by the store; `body` is
/// whatever the model serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: Uuid,
    pub collection: String,
    pub key: Option<String>,
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Decode the body into a model type.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone()).map_err(|source| StoreError::Malformed {
            collection: self.collection.clone(),
            id: self.id,
            source,
        })
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key '{key}' in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    #[error("Malformed document {id} in '{collection}': {source}")]
    Malformed {
        collection: String,
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Collection-scoped primitives over an external document database.
///
/// Each call is a single atomic round-trip; nothing here retries.
#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// All documents in a collection, oldest first
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Documents matching any of `ids`, in no particular order. Unknown ids
    /// are skipped.
    async fn find_by_ids(
        &self,
        collection: &str,
        ids: &[Uuid],
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Every document filed under `key`. More than one hit means the unique
    /// key was bypassed; callers decide how to treat that.
    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Insert a new document. Fails with `DuplicateKey` when `key` is taken.
    async fn insert(
        &self,
        collection: &str,
        key: Option<&str>,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError>;

    /// Insert or replace the body stored under `key` in one step.
    /// An existing row keeps its id and creation time.
    async fn upsert_by_key(
        &self,
        collection: &str,
        key: &str,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError>;

    /// Replace the body of a document only if it still carries
    /// `expected_updated_at`. `None` when the row is gone or was written since
    /// it was read; the caller reloads to tell which.
    ///
    /// Every successful write moves `updated_at` strictly forward.
    async fn update_if(
        &self,
        collection: &str,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        body: serde_json::Value,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Returns whether a row was removed
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Returns whether a row was removed
    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StoreError>;

    /// Cheap round-trip used by the health check
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// =============================================================================
// Catalog Lookup Trait (Infrastructure - display fields for listings)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
}

/// Resolves product and member ids to the few fields admin lists display.
///
/// Ids with no match are simply absent from the returned map.
#[async_trait]
pub trait BaseCatalogLookup: Send + Sync {
    async fn product_summaries(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductSummary>, StoreError>;

    async fn member_summaries(
        &self,
        ids: &[MemberId],
    ) -> Result<HashMap<MemberId, MemberSummary>, StoreError>;
}
