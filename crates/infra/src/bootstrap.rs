//! Wiring: configuration -> document store -> repository -> service.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use fruitstore_events::{EventBus, EventEnvelope};
use fruitstore_inventory::FruitEvent;

use crate::config::{BackendConfig, FruitStoreConfig};
use crate::document::{DocumentStore, InMemoryDocumentStore};
use crate::repository::{DocumentFruitRepository, FruitRepository, PublishingFruitRepository};
use crate::service::FruitService;

/// Service handle with the backend chosen at runtime.
pub type FruitStorage = FruitService<Arc<dyn FruitRepository>>;

/// Open the configured document store.
pub async fn open_documents(config: &FruitStoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match &config.backend {
        BackendConfig::InMemory => {
            info!(backend = "memory", "using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        #[cfg(feature = "postgres")]
        BackendConfig::Postgres {
            url,
            max_connections,
        } => {
            let store = crate::document::PostgresDocumentStore::connect(url, *max_connections)
                .await
                .context("failed to connect to postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to create fruit_documents table")?;
            info!(backend = "postgres", max_connections, "using postgres document store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        BackendConfig::Postgres { .. } => {
            anyhow::bail!("postgres backend requested but the `postgres` feature is not enabled")
        }
    }
}

pub async fn build_service(config: &FruitStoreConfig) -> anyhow::Result<FruitStorage> {
    let documents = open_documents(config).await?;
    let repository: Arc<dyn FruitRepository> =
        Arc::new(DocumentFruitRepository::with_policy(documents, config.policy));
    Ok(FruitService::new(repository))
}

/// Like [`build_service`], publishing every change on `bus`.
pub async fn build_publishing_service<B>(
    config: &FruitStoreConfig,
    bus: B,
) -> anyhow::Result<FruitStorage>
where
    B: EventBus<EventEnvelope<FruitEvent>> + 'static,
{
    let documents = open_documents(config).await?;
    let repository: Arc<dyn FruitRepository> = Arc::new(PublishingFruitRepository::new(
        DocumentFruitRepository::with_policy(documents, config.policy),
        bus,
    ));
    Ok(FruitService::new(repository))
}

/// Build from the process environment, installing the default tracing
/// subscriber first if none is set.
pub async fn build_from_env() -> anyhow::Result<FruitStorage> {
    fruitstore_observability::init();
    let config = FruitStoreConfig::from_env().context("invalid fruit store configuration")?;
    build_service(&config).await
}
