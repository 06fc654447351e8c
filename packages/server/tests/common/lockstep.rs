//! A store wrapper that holds the first two readers at a barrier.
#![allow(dead_code)]
//!
//! Both readers come away with the same snapshot before either writes, which
//! is the interleaving that turns a read-check-write into a lost update.
//! Later reads pass straight through, so retries see the winner's write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront_core::kernel::{
    BaseDocumentStore, DocumentCatalogLookup, InMemoryDocumentStore, ServerDeps, StoreError,
    StoredDocument,
};
use tokio::sync::Barrier;
use uuid::Uuid;

const READERS: usize = 2;

pub struct LockstepStore {
    inner: Arc<InMemoryDocumentStore>,
    barrier: Barrier,
    reads: AtomicUsize,
}

impl LockstepStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            barrier: Barrier::new(READERS),
            reads: AtomicUsize::new(0),
        }
    }

    /// Copy of `base` whose store access goes through a fresh lockstep
    /// wrapper around `inner`.
    pub fn deps(inner: Arc<InMemoryDocumentStore>, base: &ServerDeps) -> ServerDeps {
        let store: Arc<dyn BaseDocumentStore> = Arc::new(Self::new(inner));
        ServerDeps::new(
            store.clone(),
            Arc::new(DocumentCatalogLookup::new(store)),
            base.jwt_service.clone(),
        )
    }

    async fn hold(&self) {
        if self.reads.fetch_add(1, Ordering::SeqCst) < READERS {
            self.barrier.wait().await;
        }
    }
}

#[async_trait]
impl BaseDocumentStore for LockstepStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let docs = self.inner.find_all(collection).await?;
        self.hold().await;
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
        let doc = self.inner.find_by_id(collection, id).await?;
        self.hold().await;
        Ok(doc)
    }

    async fn find_by_ids(&self, collection: &str, ids: &[Uuid]) -> Result<Vec<StoredDocument>, StoreError> {
        self.inner.find_by_ids(collection, ids).await
    }

    async fn find_by_key(&self, collection: &str, key: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.inner.find_by_key(collection, key).await
    }

    async fn insert(&self, collection: &str, key: Option<&str>, body: Value) -> Result<StoredDocument, StoreError> {
        self.inner.insert(collection, key, body).await
    }

    async fn upsert_by_key(&self, collection: &str, key: &str, body: Value) -> Result<StoredDocument, StoreError> {
        self.inner.upsert_by_key(collection, key, body).await
    }

    async fn update_if(
        &self,
        collection: &str,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        body: Value,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.inner.update_if(collection, id, expected_updated_at, body).await
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        self.inner.delete_by_key(collection, key).await
    }
}
