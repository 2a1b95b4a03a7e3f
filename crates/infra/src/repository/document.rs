use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use fruitstore_core::{DomainError, ExpectedVersion};
use fruitstore_inventory::{
    AllFruitsDeleted, Fruit, FruitAmount, FruitDeleted, FruitDescription, FruitEvent,
    FruitFactory, FruitLimit, FruitName, InventoryPolicy,
};

use super::locks::KeyedLocks;
use super::{FruitRepository, FruitStoreError, StoreResult};
use crate::document::{DocumentFilter, DocumentStore, DocumentUpdate, StoredDocument};
use crate::mapper;

/// `FruitRepository` over any [`DocumentStore`].
///
/// Each operation is a read-check-write sequence:
/// - in-process writers are serialized per name by [`KeyedLocks`]
///   (`delete_all` takes the whole keyspace)
/// - the write itself is conditional on the version that was read, so a
///   writer in another process sharing the backend causes a `Conflict`
///   instead of a lost update
#[derive(Debug)]
pub struct DocumentFruitRepository<D> {
    documents: D,
    factory: FruitFactory,
    locks: KeyedLocks,
}

impl<D> DocumentFruitRepository<D>
where
    D: DocumentStore,
{
    pub fn new(documents: D) -> Self {
        Self::with_policy(documents, InventoryPolicy::default())
    }

    pub fn with_policy(documents: D, policy: InventoryPolicy) -> Self {
        Self {
            documents,
            factory: FruitFactory::new(policy),
            locks: KeyedLocks::new(),
        }
    }

    pub fn documents(&self) -> &D {
        &self.documents
    }

    async fn load(&self, name: &FruitName) -> StoreResult<(Fruit, u64)> {
        let stored = self
            .documents
            .find_one(name.value())
            .await?
            .ok_or_else(|| DomainError::not_found(name.value()))?;
        let fruit = mapper::to_domain(&stored.document)?;
        Ok((fruit, stored.version))
    }

    async fn write_limit(
        &self,
        name: &FruitName,
        limit: FruitLimit,
        version: u64,
    ) -> StoreResult<StoredDocument> {
        let written = self
            .documents
            .update_one(
                name.value(),
                DocumentUpdate::limit(i64::from(limit.value())),
                ExpectedVersion::Exact(version),
            )
            .await?;
        Ok(written.ok_or_else(|| DomainError::not_found(name.value()))?)
    }

    async fn list(&self) -> StoreResult<Vec<Fruit>> {
        let stored = self.documents.find(DocumentFilter::All).await?;
        let fruits = stored
            .iter()
            .map(|s| mapper::to_domain(&s.document))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fruits)
    }

    async fn insert(&self, fruit: &Fruit) -> StoreResult<Fruit> {
        let fruit = self
            .factory
            .create_fruit(fruit.name(), fruit.description(), fruit.limit())?;
        self.documents.insert(mapper::to_document(&fruit)).await?;
        Ok(fruit)
    }

    async fn replace(
        &self,
        name: &FruitName,
        description: FruitDescription,
        limit: FruitLimit,
    ) -> StoreResult<Fruit> {
        let limit = self.factory.policy().admit(limit)?;
        let (fruit, version) = self.load(name).await?;
        let update = DocumentUpdate::fields(description.value(), i64::from(limit.value()));
        let written = self
            .documents
            .update_one(name.value(), update, ExpectedVersion::Exact(version))
            .await?;
        if written.is_none() {
            return Err(DomainError::not_found(name.value()).into());
        }
        Ok(fruit.with_description(description).with_limit(limit))
    }

    async fn add(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<Fruit> {
        let (fruit, version) = self.load(name).await?;
        let limit = self.factory.limit_after_store(fruit.limit(), amount)?;
        self.write_limit(name, limit, version).await?;
        Ok(fruit.with_limit(limit))
    }

    async fn take(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<Fruit> {
        let (fruit, version) = self.load(name).await?;
        let limit = fruit
            .limit()
            .minus(amount)
            .ok_or_else(|| DomainError::InsufficientQuantity {
                name: name.value().to_string(),
                available: fruit.limit().value(),
                requested: amount.value(),
            })?;
        self.write_limit(name, limit, version).await?;
        Ok(fruit.with_limit(limit))
    }

    /// Returns the limit the record had, `None` if there was nothing to delete.
    async fn erase(&self, name: &FruitName, force: bool) -> StoreResult<Option<FruitLimit>> {
        if force {
            // A corrupt record is still deleted; it just reports no previous limit.
            let previous = self
                .documents
                .find_one(name.value())
                .await?
                .and_then(|s| FruitLimit::create(s.document.limit).ok());
            self.documents
                .delete_one(name.value(), ExpectedVersion::Any)
                .await?;
            return Ok(previous);
        }

        let (fruit, version) = self.load(name).await?;
        if !fruit.limit().is_zero() {
            return Err(DomainError::NonZeroLimit {
                name: name.value().to_string(),
                limit: fruit.limit().value(),
            }
            .into());
        }
        let deleted = self
            .documents
            .delete_one(name.value(), ExpectedVersion::Exact(version))
            .await?;
        if !deleted {
            return Err(DomainError::not_found(name.value()).into());
        }
        Ok(Some(fruit.limit()))
    }

    async fn erase_all(&self, force: bool) -> StoreResult<u64> {
        if force {
            return Ok(self.documents.delete_many(DocumentFilter::All).await?);
        }

        let stored = self.documents.find(DocumentFilter::All).await?;
        if stored.is_empty() {
            return Err(DomainError::EmptyStore.into());
        }
        let non_zero = stored
            .iter()
            .filter(|s| DocumentFilter::NonZeroLimit.matches(&s.document))
            .count();
        if non_zero > 0 {
            return Err(DomainError::SomeNonZeroLimit { count: non_zero }.into());
        }
        // Zero-limit filter, in case another process stored in the meantime.
        Ok(self.documents.delete_many(DocumentFilter::ZeroLimit).await?)
    }
}

/// Log a failed operation at the level its cause deserves and hand it back.
fn rejected(op: &'static str, err: FruitStoreError) -> FruitStoreError {
    match &err {
        FruitStoreError::Domain(e) => {
            warn!(op, code = e.code(), error = %e, "fruit operation rejected")
        }
        FruitStoreError::Store(e) => error!(op, error = %e, "fruit store backend failure"),
        FruitStoreError::Publish(e) => error!(op, error = %e, "fruit event publication failed"),
        FruitStoreError::Internal(e) => error!(op, error = %e, "fruit store internal error"),
    }
    err
}

#[async_trait]
impl<D> FruitRepository for DocumentFruitRepository<D>
where
    D: DocumentStore,
{
    fn policy(&self) -> InventoryPolicy {
        self.factory.policy()
    }

    #[instrument(skip_all, fields(name = %name))]
    async fn find(&self, name: &FruitName) -> StoreResult<Fruit> {
        let (fruit, _) = self.load(name).await.map_err(|e| rejected("find", e))?;
        Ok(fruit)
    }

    #[instrument(skip_all)]
    async fn find_all(&self) -> StoreResult<Vec<Fruit>> {
        let fruits = self.list().await.map_err(|e| rejected("find_all", e))?;
        debug!(count = fruits.len(), "listed fruits");
        Ok(fruits)
    }

    #[instrument(skip_all, fields(name = %fruit.name()))]
    async fn create(&self, fruit: Fruit) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(fruit.name().value()).await;
        let fruit = self.insert(&fruit).await.map_err(|e| rejected("create", e))?;
        info!(limit = %fruit.limit(), "fruit created");
        Ok(FruitEvent::created(&fruit, Utc::now()))
    }

    #[instrument(skip_all, fields(name = %name, limit = %limit))]
    async fn update(
        &self,
        name: &FruitName,
        description: FruitDescription,
        limit: FruitLimit,
    ) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let fruit = self
            .replace(name, description, limit)
            .await
            .map_err(|e| rejected("update", e))?;
        info!("fruit updated");
        Ok(FruitEvent::updated(&fruit, Utc::now()))
    }

    #[instrument(skip_all, fields(name = %name, amount = %amount))]
    async fn store(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let fruit = self
            .add(name, amount)
            .await
            .map_err(|e| rejected("store", e))?;
        info!(limit = %fruit.limit(), "fruit stored");
        Ok(FruitEvent::stored(&fruit, amount, Utc::now()))
    }

    #[instrument(skip_all, fields(name = %name, amount = %amount))]
    async fn remove(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let fruit = self
            .take(name, amount)
            .await
            .map_err(|e| rejected("remove", e))?;
        info!(limit = %fruit.limit(), "fruit removed");
        Ok(FruitEvent::removed(&fruit, amount, Utc::now()))
    }

    #[instrument(skip_all, fields(name = %name, force = force))]
    async fn delete(&self, name: &FruitName, force: bool) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let previous_limit = self
            .erase(name, force)
            .await
            .map_err(|e| rejected("delete", e))?;
        info!(existed = previous_limit.is_some(), "fruit deleted");
        Ok(FruitEvent::FruitDeleted(FruitDeleted {
            name: name.clone(),
            forced: force,
            previous_limit,
            occurred_at: Utc::now(),
        }))
    }

    #[instrument(skip_all, fields(force = force))]
    async fn delete_all(&self, force: bool) -> StoreResult<FruitEvent> {
        let _all = self.locks.lock_all().await;
        let count = self
            .erase_all(force)
            .await
            .map_err(|e| rejected("delete_all", e))?;
        info!(count, "all fruits deleted");
        Ok(FruitEvent::AllFruitsDeleted(AllFruitsDeleted {
            forced: force,
            count,
            occurred_at: Utc::now(),
        }))
    }
}
