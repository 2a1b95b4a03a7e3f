use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use fruitstore_core::ExpectedVersion;

use super::{
    DocumentFilter, DocumentStore, DocumentStoreError, DocumentUpdate, FruitDocument,
    StoredDocument,
};

/// In-memory document store.
///
/// Intended for tests/dev. Every call takes the lock once, so each call is
/// atomic; the lock is never held across an await point.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing the repository (test fixtures).
    pub fn with_documents(documents: impl IntoIterator<Item = FruitDocument>) -> Self {
        let map = documents
            .into_iter()
            .map(|document| {
                (
                    document.name.clone(),
                    StoredDocument {
                        document,
                        version: 1,
                    },
                )
            })
            .collect();
        Self {
            documents: RwLock::new(map),
        }
    }

    pub fn len(&self) -> Result<usize, DocumentStoreError> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, DocumentStoreError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> DocumentStoreError {
    DocumentStoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, name: &str) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.get(name).cloned())
    }

    async fn find(&self, filter: DocumentFilter) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents
            .values()
            .filter(|stored| filter.matches(&stored.document))
            .cloned()
            .collect())
    }

    async fn insert(&self, document: FruitDocument) -> Result<StoredDocument, DocumentStoreError> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        if documents.contains_key(&document.name) {
            return Err(DocumentStoreError::DuplicateKey(document.name));
        }
        let stored = StoredDocument {
            document,
            version: 1,
        };
        documents.insert(stored.document.name.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_one(
        &self,
        name: &str,
        update: DocumentUpdate,
        expected: ExpectedVersion,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let Some(stored) = documents.get_mut(name) else {
            return Ok(None);
        };
        if !expected.matches(stored.version) {
            return Err(DocumentStoreError::VersionConflict {
                name: name.to_string(),
                expected,
                actual: stored.version,
            });
        }
        update.apply_to(&mut stored.document);
        stored.version += 1;
        Ok(Some(stored.clone()))
    }

    async fn delete_one(
        &self,
        name: &str,
        expected: ExpectedVersion,
    ) -> Result<bool, DocumentStoreError> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let Some(stored) = documents.get(name) else {
            return Ok(false);
        };
        if !expected.matches(stored.version) {
            return Err(DocumentStoreError::VersionConflict {
                name: name.to_string(),
                expected,
                actual: stored.version,
            });
        }
        documents.remove(name);
        Ok(true)
    }

    async fn delete_many(&self, filter: DocumentFilter) -> Result<u64, DocumentStoreError> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let before = documents.len();
        documents.retain(|_, stored| !filter.matches(&stored.document));
        Ok((before - documents.len()) as u64)
    }
}
