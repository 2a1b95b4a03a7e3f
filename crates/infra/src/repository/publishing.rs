use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::error;

use fruitstore_events::{EventBus, EventEnvelope};
use fruitstore_inventory::{
    Fruit, FruitAmount, FruitDescription, FruitEvent, FruitLimit, FruitName, InventoryPolicy,
};

use super::locks::KeyedLocks;
use super::{FruitRepository, FruitStoreError, StoreResult};

/// Repository decorator that publishes every change on an event bus.
///
/// The write happens first; only a successful write is published. If the
/// publish fails the write stands and the caller gets `Publish`.
///
/// Each write and its publish run under the record's key (the whole keyspace
/// for `delete_all`), so events for one record leave in the order the writes
/// were applied.
#[derive(Debug)]
pub struct PublishingFruitRepository<R, B> {
    repository: R,
    bus: B,
    sequence: AtomicU64,
    locks: KeyedLocks,
}

impl<R, B> PublishingFruitRepository<R, B> {
    pub fn new(repository: R, bus: B) -> Self {
        Self {
            repository,
            bus,
            sequence: AtomicU64::new(0),
            locks: KeyedLocks::new(),
        }
    }

    pub fn into_parts(self) -> (R, B) {
        (self.repository, self.bus)
    }
}

impl<R, B> PublishingFruitRepository<R, B>
where
    B: EventBus<EventEnvelope<FruitEvent>>,
{
    fn publish(&self, event: FruitEvent) -> StoreResult<FruitEvent> {
        let sequence_number = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.bus
            .publish(EventEnvelope::wrap(sequence_number, event.clone()))
            .map_err(|err| {
                error!(sequence_number, error = ?err, "failed to publish fruit event");
                FruitStoreError::Publish(format!("{err:?}"))
            })?;
        Ok(event)
    }
}

#[async_trait]
impl<R, B> FruitRepository for PublishingFruitRepository<R, B>
where
    R: FruitRepository,
    B: EventBus<EventEnvelope<FruitEvent>>,
{
    fn policy(&self) -> InventoryPolicy {
        self.repository.policy()
    }

    async fn find(&self, name: &FruitName) -> StoreResult<Fruit> {
        self.repository.find(name).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Fruit>> {
        self.repository.find_all().await
    }

    async fn create(&self, fruit: Fruit) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(fruit.name().value()).await;
        let event = self.repository.create(fruit).await?;
        self.publish(event)
    }

    async fn update(
        &self,
        name: &FruitName,
        description: FruitDescription,
        limit: FruitLimit,
    ) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let event = self.repository.update(name, description, limit).await?;
        self.publish(event)
    }

    async fn store(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let event = self.repository.store(name, amount).await?;
        self.publish(event)
    }

    async fn remove(&self, name: &FruitName, amount: FruitAmount) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let event = self.repository.remove(name, amount).await?;
        self.publish(event)
    }

    async fn delete(&self, name: &FruitName, force: bool) -> StoreResult<FruitEvent> {
        let _key = self.locks.lock(name.value()).await;
        let event = self.repository.delete(name, force).await?;
        self.publish(event)
    }

    async fn delete_all(&self, force: bool) -> StoreResult<FruitEvent> {
        let _all = self.locks.lock_all().await;
        let event = self.repository.delete_all(force).await?;
        self.publish(event)
    }
}
