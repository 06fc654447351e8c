// TestDependencies - in-memory implementations for tests and local runs
//
// Provides an in-process document store with the same unique-key rule as the
// Postgres table, plus a builder that wires it into ServerDeps.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BaseDocumentStore, DocumentCatalogLookup, ServerDeps, StoreError, StoredDocument};
use crate::domains::auth::JwtService;

// =============================================================================
// In-memory document store
// =============================================================================

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Vec<StoredDocument>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Strictly increasing timestamps, so creation order is also time order.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn collection_mut(&mut self, collection: &str) -> &mut Vec<StoredDocument> {
        self.collections.entry(collection.to_string()).or_default()
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<MemoryState>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document without the unique-key check.
    ///
    /// Lets tests reproduce a store whose constraint was bypassed (e.g. rows
    /// written by an older deployment) to exercise integrity handling.
    pub async fn force_insert(
        &self,
        collection: &str,
        key: Option<&str>,
        body: serde_json::Value,
    ) -> StoredDocument {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();
        let doc = StoredDocument {
            id: Uuid::now_v7(),
            collection: collection.to_string(),
            key: key.map(str::to_string),
            body,
            created_at: now,
            updated_at: now,
        };
        state.collection_mut(collection).push(doc.clone());
        doc
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.state
            .read()
            .await
            .collections
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl BaseDocumentStore for InMemoryDocumentStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn find_by_ids(
        &self,
        collection: &str,
        ids: &[Uuid],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| ids.contains(&d.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.key.as_deref() == Some(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: &str,
        key: Option<&str>,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError> {
        let mut state = self.state.write().await;

        if let Some(key) = key {
            let taken = state
                .collections
                .get(collection)
                .is_some_and(|docs| docs.iter().any(|d| d.key.as_deref() == Some(key)));
            if taken {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    key: key.to_string(),
                });
            }
        }

        let now = state.next_timestamp();
        let doc = StoredDocument {
            id: Uuid::now_v7(),
            collection: collection.to_string(),
            key: key.map(str::to_string),
            body,
            created_at: now,
            updated_at: now,
        };
        state.collection_mut(collection).push(doc.clone());
        Ok(doc)
    }

    async fn upsert_by_key(
        &self,
        collection: &str,
        key: &str,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();
        let docs = state.collection_mut(collection);

        if let Some(existing) = docs.iter_mut().find(|d| d.key.as_deref() == Some(key)) {
            existing.body = body;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let doc = StoredDocument {
            id: Uuid::now_v7(),
            collection: collection.to_string(),
            key: Some(key.to_string()),
            body,
            created_at: now,
            updated_at: now,
        };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update_if(
        &self,
        collection: &str,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        body: serde_json::Value,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();
        let docs = state.collection_mut(collection);

        Ok(docs
            .iter_mut()
            .find(|d| d.id == id && d.updated_at == expected_updated_at)
            .map(|existing| {
                existing.body = body;
                existing.updated_at = now;
                existing.clone()
            }))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let docs = state.collection_mut(collection);
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let docs = state.collection_mut(collection);
        let before = docs.len();
        docs.retain(|d| d.key.as_deref() != Some(key));
        Ok(docs.len() < before)
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

#[derive(Clone)]
pub struct TestDependencies {
    pub store: Arc<InMemoryDocumentStore>,
    pub jwt_service: Arc<JwtService>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
            )),
        }
    }

    /// Build ServerDeps backed by the in-memory store
    pub fn into_server_deps(self) -> ServerDeps {
        let store: Arc<dyn BaseDocumentStore> = self.store;
        ServerDeps::new(
            store.clone(),
            Arc::new(DocumentCatalogLookup::new(store)),
            self.jwt_service,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
