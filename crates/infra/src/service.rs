//! Fruit service: validates raw input and orchestrates factory + repository.

use tracing::{debug, instrument};

use fruitstore_events::Event;
use fruitstore_inventory::{
    Fruit, FruitAmount, FruitDescription, FruitEvent, FruitFactory, FruitLimit, FruitName,
};

use crate::repository::{FruitRepository, FruitStoreError, StoreResult};
use crate::request::{FruitRequest, FruitResponse, FruitView};

/// Entry point for callers holding raw primitives.
///
/// Every input is validated into its value type before the repository is
/// called, so an invalid request never reaches persistence. The limit ceiling
/// is the repository's own.
#[derive(Debug, Clone)]
pub struct FruitService<R> {
    repository: R,
    factory: FruitFactory,
}

impl<R> FruitService<R>
where
    R: FruitRepository,
{
    pub fn new(repository: R) -> Self {
        let factory = FruitFactory::new(repository.policy());
        Self {
            repository,
            factory,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn find(&self, name: &str) -> StoreResult<Fruit> {
        let name = FruitName::create(name)?;
        self.repository.find(&name).await
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Fruit>> {
        self.repository.find_all().await
    }

    /// True iff no record has this name. Backend faults propagate.
    #[instrument(skip(self))]
    pub async fn is_unique_name(&self, name: &str) -> StoreResult<bool> {
        let name = FruitName::create(name)?;
        match self.repository.find(&name).await {
            Ok(_) => Ok(false),
            Err(e) if e.is_not_found() => Ok(true),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, name: &str, description: &str, limit: i64) -> StoreResult<FruitEvent> {
        let fruit = self.factory.create_fruit_from_raw(name, description, limit)?;
        self.repository.create(fruit).await
    }

    pub async fn update(&self, name: &str, description: &str, limit: i64) -> StoreResult<FruitEvent> {
        let name = FruitName::create(name)?;
        let description = FruitDescription::create(description)?;
        let limit = self.factory.admit_limit(limit)?;
        self.repository.update(&name, description, limit).await
    }

    /// The resulting limit is checked up front, so an overflow is reported
    /// as a limit range error before anything is written.
    #[instrument(skip(self))]
    pub async fn store(&self, name: &str, amount: i64) -> StoreResult<FruitEvent> {
        let name = FruitName::create(name)?;
        let amount = FruitAmount::create(amount)?;
        let current = self.repository.find(&name).await?;
        let target: FruitLimit = self.factory.limit_after_store(current.limit(), amount)?;
        debug!(target = %target, "store admitted");
        self.repository.store(&name, amount).await
    }

    pub async fn remove(&self, name: &str, amount: i64) -> StoreResult<FruitEvent> {
        let name = FruitName::create(name)?;
        let amount = FruitAmount::create(amount)?;
        self.repository.remove(&name, amount).await
    }

    pub async fn delete(&self, name: &str, force: bool) -> StoreResult<FruitEvent> {
        let name = FruitName::create(name)?;
        self.repository.delete(&name, force).await
    }

    pub async fn delete_all(&self, force: bool) -> StoreResult<FruitEvent> {
        self.repository.delete_all(force).await
    }

    /// Run a wire request and shape its result.
    ///
    /// Mutations that leave a record behind answer with the record as their
    /// own write left it, taken from the returned event.
    pub async fn dispatch(&self, request: FruitRequest) -> StoreResult<FruitResponse> {
        match request {
            FruitRequest::Fruits => {
                let fruits = self.find_all().await?;
                Ok(FruitResponse::Fruits(fruits.iter().map(FruitView::from).collect()))
            }
            FruitRequest::Fruit { name } => {
                let fruit = self.find(&name).await?;
                Ok(FruitResponse::Fruit(FruitView::from(&fruit)))
            }
            FruitRequest::IsUniqueName { name } => {
                Ok(FruitResponse::Unique(self.is_unique_name(&name).await?))
            }
            FruitRequest::CreateFruit {
                name,
                description,
                limit,
            } => {
                written(self.create(&name, &description, limit).await?)
            }
            FruitRequest::UpdateFruit {
                name,
                description,
                limit,
            } => {
                written(self.update(&name, &description, limit).await?)
            }
            FruitRequest::StoreFruit { name, amount } => {
                written(self.store(&name, amount).await?)
            }
            FruitRequest::RemoveFruit { name, amount } => {
                written(self.remove(&name, amount).await?)
            }
            FruitRequest::DeleteFruit { name, force_delete } => {
                self.delete(&name, force_delete.unwrap_or(false)).await?;
                Ok(FruitResponse::Deleted { name })
            }
            FruitRequest::DeleteAllFruits { force_delete } => {
                let event = self.delete_all(force_delete.unwrap_or(false)).await?;
                let count = event.deleted_count().ok_or_else(|| unexpected(&event))?;
                Ok(FruitResponse::DeletedAll { count })
            }
        }
    }
}

fn written(event: FruitEvent) -> StoreResult<FruitResponse> {
    let fruit = event.resulting_fruit().ok_or_else(|| unexpected(&event))?;
    Ok(FruitResponse::Fruit(FruitView::from(&fruit)))
}

fn unexpected(event: &FruitEvent) -> FruitStoreError {
    FruitStoreError::Internal(format!(
        "repository answered with unexpected event '{}'",
        event.event_type()
    ))
}
