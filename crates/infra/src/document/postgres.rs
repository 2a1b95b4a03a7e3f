//! Postgres-backed document store.
//!
//! Documents live in a single table, one JSONB body per key:
//!
//! ```sql
//! CREATE TABLE fruit_documents (
//!     name    TEXT PRIMARY KEY,
//!     body    JSONB NOT NULL,
//!     version BIGINT NOT NULL
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | DocumentStoreError |
//! |------------|----------------------|--------------------|
//! | Database (unique violation) | `23505` | `DuplicateKey` |
//! | Database (other) | Any other | `Backend` |
//! | Decode / column errors | N/A | `Serialization` |
//! | PoolClosed, IO, TLS, ... | N/A | `Backend` |
//!
//! Conditional writes are a single statement (`... WHERE version = $n`), so
//! two processes sharing the table cannot both apply a write based on the same
//! version.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use fruitstore_core::ExpectedVersion;

use super::{
    DocumentFilter, DocumentStore, DocumentStoreError, DocumentUpdate, FruitDocument,
    StoredDocument,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS fruit_documents (
    name    TEXT PRIMARY KEY,
    body    JSONB NOT NULL,
    version BIGINT NOT NULL
)
"#;

/// Postgres document store.
///
/// `Send + Sync`; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    #[instrument(skip(database_url), err)]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, DocumentStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the backing table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), DocumentStoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn current_version(&self, name: &str) -> Result<Option<u64>, DocumentStoreError> {
        let row = sqlx::query("SELECT version FROM fruit_documents WHERE name = $1")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("current_version", e))?;
        row.map(|r| {
            r.try_get::<i64, _>("version")
                .map(|v| v as u64)
                .map_err(|e| DocumentStoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    /// A conditional write matched no row: either the key is gone or the version moved.
    async fn explain_miss(
        &self,
        name: &str,
        expected: ExpectedVersion,
    ) -> Result<(), DocumentStoreError> {
        match self.current_version(name).await? {
            None => Ok(()),
            Some(actual) => Err(DocumentStoreError::VersionConflict {
                name: name.to_string(),
                expected,
                actual,
            }),
        }
    }
}

fn filter_clause(filter: DocumentFilter) -> &'static str {
    match filter {
        DocumentFilter::All => "TRUE",
        DocumentFilter::ZeroLimit => "(body->>'limit')::BIGINT = 0",
        DocumentFilter::NonZeroLimit => "(body->>'limit')::BIGINT <> 0",
    }
}

fn expected_param(expected: ExpectedVersion) -> Option<i64> {
    match expected {
        ExpectedVersion::Any => None,
        ExpectedVersion::Exact(v) => Some(i64::try_from(v).unwrap_or(i64::MAX)),
    }
}

fn decode_row(row: &PgRow) -> Result<StoredDocument, DocumentStoreError> {
    let Json(document) = row
        .try_get::<Json<FruitDocument>, _>("body")
        .map_err(|e| DocumentStoreError::Serialization(e.to_string()))?;
    let version = row
        .try_get::<i64, _>("version")
        .map_err(|e| DocumentStoreError::Serialization(e.to_string()))?;
    Ok(StoredDocument {
        document,
        version: version as u64,
    })
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self), err)]
    async fn find_one(&self, name: &str) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let row = sqlx::query("SELECT body, version FROM fruit_documents WHERE name = $1")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;
        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find(&self, filter: DocumentFilter) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let sql = format!(
            "SELECT body, version FROM fruit_documents WHERE {} ORDER BY name ASC",
            filter_clause(filter)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))?;
        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self, document), fields(name = %document.name), err)]
    async fn insert(&self, document: FruitDocument) -> Result<StoredDocument, DocumentStoreError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO fruit_documents (name, body, version)
            VALUES ($1, $2, 1)
            ON CONFLICT (name) DO NOTHING
            RETURNING version
            "#,
        )
        .bind(&document.name)
        .bind(Json(&document))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        match inserted {
            Some(_) => Ok(StoredDocument {
                document,
                version: 1,
            }),
            None => Err(DocumentStoreError::DuplicateKey(document.name)),
        }
    }

    #[instrument(skip(self, update), err)]
    async fn update_one(
        &self,
        name: &str,
        update: DocumentUpdate,
        expected: ExpectedVersion,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let fields = serde_json::to_value(&update)
            .map_err(|e| DocumentStoreError::Serialization(e.to_string()))?;

        let row = sqlx::query(
            r#"
            UPDATE fruit_documents
            SET body = body || $2, version = version + 1
            WHERE name = $1 AND ($3::BIGINT IS NULL OR version = $3)
            RETURNING body, version
            "#,
        )
        .bind(name)
        .bind(Json(fields))
        .bind(expected_param(expected))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_one", e))?;

        match row {
            Some(row) => decode_row(&row).map(Some),
            None => self.explain_miss(name, expected).await.map(|()| None),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete_one(
        &self,
        name: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, DocumentStoreError> {
        let result = sqlx::query(
            "DELETE FROM fruit_documents WHERE name = $1 AND ($2::BIGINT IS NULL OR version = $2)",
        )
        .bind(name)
        .bind(expected_param(expected))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_one", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.explain_miss(name, expected).await.map(|()| false)
    }

    #[instrument(skip(self), err)]
    async fn delete_many(&self, filter: DocumentFilter) -> Result<u64, DocumentStoreError> {
        let sql = format!("DELETE FROM fruit_documents WHERE {}", filter_clause(filter));
        let result = sqlx::query(&sql)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_many", e))?;
        Ok(result.rows_affected())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DocumentStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => DocumentStoreError::DuplicateKey(msg),
                _ => DocumentStoreError::Backend(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            DocumentStoreError::Serialization(format!("decode error in {}: {}", operation, err))
        }
        sqlx::Error::PoolClosed => {
            DocumentStoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => DocumentStoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
