//! Postgres-backed document store
//!
//! Every collection shares one `documents` table with a JSONB body. The
//! partial unique index on `(collection, doc_key)` is what keeps natural keys
//! (content slugs, the section singleton) unique under concurrent writers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{BaseDocumentStore, StoreError, StoredDocument};

const COLUMNS: &str = "id, collection, doc_key, body, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    collection: String,
    doc_key: Option<String>,
    body: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument {
            id: row.id,
            collection: row.collection,
            key: row.doc_key,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_write_error(err: sqlx::Error, collection: &str, key: Option<&str>) -> StoreError {
    if let (sqlx::Error::Database(db_err), Some(key)) = (&err, key) {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: key.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 ORDER BY created_at, id"
        ))
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_ids(
        &self,
        collection: &str,
        ids: &[Uuid],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE collection = $1 AND id = ANY($2)"
        ))
        .bind(collection)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {COLUMNS} FROM documents
             WHERE collection = $1 AND doc_key = $2
             ORDER BY created_at, id"
        ))
        .bind(collection)
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(
        &self,
        collection: &str,
        key: Option<&str>,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError> {
        sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (id, collection, doc_key, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(collection)
        .bind(key)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| map_write_error(e, collection, key))
    }

    async fn upsert_by_key(
        &self,
        collection: &str,
        key: &str,
        body: serde_json::Value,
    ) -> Result<StoredDocument, StoreError> {
        // ON CONFLICT makes create-or-replace a single atomic statement, so two
        // first-time writers cannot both insert.
        sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (id, collection, doc_key, body)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (collection, doc_key) WHERE doc_key IS NOT NULL
             DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(collection)
        .bind(key)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(Into::into)
    }

    async fn update_if(
        &self,
        collection: &str,
        id: Uuid,
        expected_updated_at: DateTime<Utc>,
        body: serde_json::Value,
    ) -> Result<Option<StoredDocument>, StoreError> {
        // updated_at must strictly increase, even for two writes in one tick
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "UPDATE documents
             SET body = $3,
                 updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
             WHERE collection = $1 AND id = $2 AND updated_at = $4
             RETURNING {COLUMNS}"
        ))
        .bind(collection)
        .bind(id)
        .bind(body)
        .bind(expected_updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_key(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND doc_key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
