//! Infrastructure layer: document stores, repository, service, config.

pub mod bootstrap;
pub mod config;
pub mod document;
pub mod mapper;
pub mod repository;
pub mod request;
pub mod service;


pub use bootstrap::{FruitStorage, build_from_env, build_publishing_service, build_service};
pub use config::{BackendConfig, ConfigError, FruitStoreConfig};
pub use document::{
    DocumentFilter, DocumentStore, DocumentStoreError, DocumentUpdate, FruitDocument,
    InMemoryDocumentStore, StoredDocument,
};
#[cfg(feature = "postgres")]
pub use document::PostgresDocumentStore;
pub use repository::{
    DocumentFruitRepository, FruitRepository, FruitStoreError, KeyedLocks,
    PublishingFruitRepository, StoreResult,
};
pub use request::{FruitRequest, FruitResponse, FruitView};
pub use service::FruitService;
