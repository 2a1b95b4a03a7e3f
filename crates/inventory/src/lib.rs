//! Fruit storage domain module.
//!
//! Business rules for named, limited inventory records, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod events;
pub mod factory;
pub mod fruit;
pub mod policy;
pub mod value_objects;

pub use events::{
    AllFruitsDeleted, FruitCreated, FruitDeleted, FruitEvent, FruitRemoved, FruitStored,
    FruitUpdated,
};
pub use factory::FruitFactory;
pub use fruit::Fruit;
pub use policy::InventoryPolicy;
pub use value_objects::{FruitAmount, FruitDescription, FruitLimit, FruitName};
