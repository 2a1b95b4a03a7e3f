//! Keyed document store boundary.
//!
//! The repository talks to persistence only through [`DocumentStore`]: a
//! durable collection of `{name, description, limit}` documents keyed by
//! `name`, with a backend-maintained `version` per document for conditional
//! writes. Any engine that can offer these operations will do.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fruitstore_core::ExpectedVersion;

pub use in_memory::InMemoryDocumentStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;

/// Persisted shape of a fruit record.
///
/// Fields are raw primitives: the store does not validate, the mapper does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitDocument {
    pub name: String,
    pub description: String,
    pub limit: i64,
}

/// A document together with its store-assigned version.
///
/// Versions start at 1 on insert and grow by one on every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub document: FruitDocument,
    pub version: u64,
}

/// Field-level update (`updateOne(key, fields)`); `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl DocumentUpdate {
    pub fn limit(limit: i64) -> Self {
        Self {
            description: None,
            limit: Some(limit),
        }
    }

    pub fn fields(description: impl Into<String>, limit: i64) -> Self {
        Self {
            description: Some(description.into()),
            limit: Some(limit),
        }
    }

    pub fn apply_to(&self, document: &mut FruitDocument) {
        if let Some(description) = &self.description {
            document.description = description.clone();
        }
        if let Some(limit) = self.limit {
            document.limit = limit;
        }
    }
}

/// Selection used by `find` / `delete_many`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    All,
    ZeroLimit,
    NonZeroLimit,
}

impl DocumentFilter {
    pub fn matches(self, document: &FruitDocument) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::ZeroLimit => document.limit == 0,
            DocumentFilter::NonZeroLimit => document.limit != 0,
        }
    }
}

/// Document store operation error.
///
/// These are infrastructure errors; the repository translates the ones with a
/// domain meaning (duplicate key, stale version) and passes the rest through.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("version conflict on '{name}' (expected: {expected:?}, actual: {actual})")]
    VersionConflict {
        name: String,
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Durable keyed collection of fruit documents.
///
/// Implementations must:
/// - reject `insert` of an existing key with `DuplicateKey`
/// - apply `update_one` / `delete_one` only when `expected` matches the
///   current version, failing with `VersionConflict` otherwise
/// - make each single call atomic
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, name: &str) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Matching documents, ordered by name.
    async fn find(&self, filter: DocumentFilter) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    async fn insert(&self, document: FruitDocument) -> Result<StoredDocument, DocumentStoreError>;

    /// `Ok(None)` when no document has that key.
    async fn update_one(
        &self,
        name: &str,
        update: DocumentUpdate,
        expected: ExpectedVersion,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// `Ok(false)` when no document has that key.
    async fn delete_one(
        &self,
        name: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, DocumentStoreError>;

    /// Number of documents deleted.
    async fn delete_many(&self, filter: DocumentFilter) -> Result<u64, DocumentStoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find_one(&self, name: &str) -> Result<Option<StoredDocument>, DocumentStoreError> {
        (**self).find_one(name).await
    }

    async fn find(&self, filter: DocumentFilter) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        (**self).find(filter).await
    }

    async fn insert(&self, document: FruitDocument) -> Result<StoredDocument, DocumentStoreError> {
        (**self).insert(document).await
    }

    async fn update_one(
        &self,
        name: &str,
        update: DocumentUpdate,
        expected: ExpectedVersion,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        (**self).update_one(name, update, expected).await
    }

    async fn delete_one(
        &self,
        name: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, DocumentStoreError> {
        (**self).delete_one(name, expected).await
    }

    async fn delete_many(&self, filter: DocumentFilter) -> Result<u64, DocumentStoreError> {
        (**self).delete_many(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(limit: i64) -> FruitDocument {
        FruitDocument {
            name: "lemon".to_string(),
            description: "this is a lemon".to_string(),
            limit,
        }
    }

    #[test]
    fn update_touches_only_given_fields() {
        let mut d = doc(5);
        DocumentUpdate::limit(9).apply_to(&mut d);
        assert_eq!(d, doc(9));

        DocumentUpdate::fields("updated lemon description", 1).apply_to(&mut d);
        assert_eq!(d.description, "updated lemon description");
        assert_eq!(d.limit, 1);
    }

    #[test]
    fn update_serializes_without_absent_fields() {
        let json = serde_json::to_value(DocumentUpdate::limit(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 3 }));
    }

    #[test]
    fn filters_split_on_zero_limit() {
        assert!(DocumentFilter::All.matches(&doc(0)));
        assert!(DocumentFilter::ZeroLimit.matches(&doc(0)));
        assert!(!DocumentFilter::ZeroLimit.matches(&doc(2)));
        assert!(DocumentFilter::NonZeroLimit.matches(&doc(2)));
    }
}
