//! Display lookups for admin listings, answered from the document store's
//! `products` and `members` collections.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use super::{BaseCatalogLookup, BaseDocumentStore, MemberSummary, ProductSummary, StoreError};
use crate::common::{Id, MemberId, ProductId};

pub const PRODUCTS_COLLECTION: &str = "products";
pub const MEMBERS_COLLECTION: &str = "members";

pub struct DocumentCatalogLookup {
    store: Arc<dyn BaseDocumentStore>,
}

impl DocumentCatalogLookup {
    pub fn new(store: Arc<dyn BaseDocumentStore>) -> Self {
        Self { store }
    }

    async fn summaries<T, S>(
        &self,
        collection: &str,
        ids: &[Id<T>],
    ) -> Result<HashMap<Id<T>, S>, StoreError>
    where
        S: serde::de::DeserializeOwned,
    {
        let unique: Vec<Uuid> = ids
            .iter()
            .map(|id| id.into_uuid())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut found = HashMap::new();
        for doc in self.store.find_by_ids(collection, &unique).await? {
            let id = Id::from_uuid(doc.id);
            match doc.decode::<S>() {
                Ok(summary) => {
                    found.insert(id, summary);
                }
                Err(e) => {
                    tracing::warn!(error = %e, %id, collection, "Skipping undecodable catalog entry");
                }
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl BaseCatalogLookup for DocumentCatalogLookup {
    async fn product_summaries(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductSummary>, StoreError> {
        self.summaries(PRODUCTS_COLLECTION, ids).await
    }

    async fn member_summaries(
        &self,
        ids: &[MemberId],
    ) -> Result<HashMap<MemberId, MemberSummary>, StoreError> {
        self.summaries(MEMBERS_COLLECTION, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{InMemoryDocumentStore, StoredDocument};
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts every read that reaches the store
    struct CountingStore {
        inner: InMemoryDocumentStore,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl BaseDocumentStore for CountingStore {
        async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all(collection).await
        }

        async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(collection, id).await
        }

        async fn find_by_ids(&self, collection: &str, ids: &[Uuid]) -> Result<Vec<StoredDocument>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_ids(collection, ids).await
        }

        async fn find_by_key(&self, collection: &str, key: &str) -> Result<Vec<StoredDocument>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
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

    #[tokio::test]
    async fn test_resolves_a_page_of_ids_in_one_read() {
        let store = Arc::new(CountingStore {
            inner: InMemoryDocumentStore::new(),
            reads: AtomicUsize::new(0),
        });

        let mut ids = Vec::new();
        for n in 0..10 {
            let doc = store
                .insert(MEMBERS_COLLECTION, None, json!({"name": format!("Customer {n}")}))
                .await
                .unwrap();
            ids.push(MemberId::from_uuid(doc.id));
        }

        let lookup = DocumentCatalogLookup::new(store.clone());
        let found = lookup.member_summaries(&ids).await.unwrap();

        assert_eq!(found.len(), 10);
        assert_eq!(found[&ids[3]].name, "Customer 3");
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolves_known_and_skips_unknown() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let doc = store
            .insert(
                PRODUCTS_COLLECTION,
                None,
                json!({"name": "Linen Shirt", "imageUrl": "https://cdn.example.com/shirt.jpg"}),
            )
            .await
            .unwrap();
        let broken = store
            .insert(PRODUCTS_COLLECTION, None, json!({"title": "no name"}))
            .await
            .unwrap();

        let lookup = DocumentCatalogLookup::new(store);
        let known = ProductId::from_uuid(doc.id);
        let missing = ProductId::new();
        let undecodable = ProductId::from_uuid(broken.id);

        let found = lookup
            .product_summaries(&[known, missing, undecodable, known])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[&known].name, "Linen Shirt");
        assert_eq!(
            found[&known].image_url.as_deref(),
            Some("https://cdn.example.com/shirt.jpg")
        );
    }
}
