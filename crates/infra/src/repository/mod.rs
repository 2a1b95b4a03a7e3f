//! Fruit repository: create/read/update/delete/adjust against a document store.
//!
//! `FruitRepository` is the capability set the service composes with. The
//! document-backed implementation enforces the cross-record rules (unique
//! names, delete preconditions, quantity bounds) and makes every
//! read-check-write sequence atomic; `PublishingFruitRepository` decorates any
//! repository with event publication.

mod document;
mod locks;
mod publishing;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use fruitstore_core::DomainError;
use fruitstore_inventory::{
    Fruit, FruitAmount, FruitDescription, FruitEvent, FruitLimit, FruitName, InventoryPolicy,
};

use crate::document::DocumentStoreError;

pub use document::DocumentFruitRepository;
pub use locks::{KeyGuard, KeyedLocks};
pub use publishing::PublishingFruitRepository;

/// Error returned by repository and service operations.
#[derive(Debug, Error)]
pub enum FruitStoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backend fault with no domain meaning (connectivity, corrupt document, ...).
    #[error("document store error: {0}")]
    Store(DocumentStoreError),

    /// The write succeeded but its event could not be published.
    #[error("event publication failed: {0}")]
    Publish(String),

    /// A repository broke its own contract (e.g. answered with the wrong event).
    #[error("internal fruit store error: {0}")]
    Internal(String),
}

impl From<DocumentStoreError> for FruitStoreError {
    fn from(value: DocumentStoreError) -> Self {
        match value {
            DocumentStoreError::DuplicateKey(name) => {
                FruitStoreError::Domain(DomainError::already_exists(name))
            }
            DocumentStoreError::VersionConflict {
                name,
                expected,
                actual,
            } => FruitStoreError::Domain(DomainError::conflict(format!(
                "'{name}' changed concurrently (expected {expected:?}, found version {actual})"
            ))),
            other => FruitStoreError::Store(other),
        }
    }
}

impl FruitStoreError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            FruitStoreError::Domain(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_domain().is_some_and(DomainError::is_not_found)
    }
}

pub type StoreResult<T> = Result<T, FruitStoreError>;

/// Persistence-facing fruit operations.
///
/// Every mutating operation returns the event describing the change it made.
#[async_trait]
pub trait FruitRepository: Send + Sync {
    /// Ceiling this repository enforces on every limit it writes.
    fn policy(&self) -> InventoryPolicy;

    /// `NotFound` if absent.
    async fn find(&self, name: &FruitName) -> StoreResult<Fruit>;

    /// All records, ordered by name.
    async fn find_all(&self) -> StoreResult<Vec<Fruit>>;

    /// `AlreadyExists` if a record with that name is present.
    async fn create(&self, fruit: Fruit) -> StoreResult<FruitEvent>;

    /// Replace description and limit; the name never changes.
    async fn update(
        &self,
        name: &FruitName,
        description: FruitDescription,
        limit: FruitLimit,
    ) -> StoreResult<FruitEvent>;

    /// Add `amount` to the record's limit.
    async fn store(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent>;

    /// Take `amount` from the record's limit; never below zero.
    async fn remove(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent>;

    /// Non-forced deletes require a zero limit; forced deletes are idempotent.
    async fn delete(&self, name: &FruitName, force: bool) -> StoreResult<FruitEvent>;

    /// Non-forced: fails if any record has a non-zero limit or the store is empty.
    async fn delete_all(&self, force: bool) -> StoreResult<FruitEvent>;
}

#[async_trait]
impl<R> FruitRepository for Arc<R>
where
    R: FruitRepository + ?Sized,
{
    fn policy(&self) -> InventoryPolicy {
        (**self).policy()
    }

    async fn find(&self, name: &FruitName) -> StoreResult<Fruit> {
        (**self).find(name).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Fruit>> {
        (**self).find_all().await
    }

    async fn create(&self, fruit: Fruit) -> StoreResult<FruitEvent> {
        (**self).create(fruit).await
    }

    async fn update(
        &self,
        name: &FruitName,
        description: FruitDescription,
        limit: FruitLimit,
    ) -> StoreResult<FruitEvent> {
        (**self).update(name, description, limit).await
    }

    async fn store(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        (**self).store(name, amount).await
    }

    async fn remove(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        (**self).remove(name, amount).await
    }

    async fn delete(&self, name: &FruitName, force: bool) -> StoreResult<FruitEvent> {
        (**self).delete(name, force).await
    }

    async fn delete_all(&self, force: bool) -> StoreResult<FruitEvent> {
        (**self).delete_all(force).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitstore_core::ExpectedVersion;

    #[test]
    fn duplicate_key_becomes_already_exists() {
        let err: FruitStoreError = DocumentStoreError::DuplicateKey("lemon".to_string()).into();
        assert!(matches!(
            err,
            FruitStoreError::Domain(DomainError::AlreadyExists(ref n)) if n == "lemon"
        ));
    }

    #[test]
    fn version_conflict_becomes_domain_conflict() {
        let err: FruitStoreError = DocumentStoreError::VersionConflict {
            name: "lemon".to_string(),
            expected: ExpectedVersion::Exact(1),
            actual: 2,
        }
        .into();
        assert_eq!(err.as_domain().map(DomainError::code), Some("conflict"));
    }

    #[test]
    fn backend_faults_pass_through() {
        let err: FruitStoreError = DocumentStoreError::Backend("connection refused".to_string()).into();
        assert!(matches!(err, FruitStoreError::Store(DocumentStoreError::Backend(_))));
        assert!(!err.is_not_found());
    }
}
