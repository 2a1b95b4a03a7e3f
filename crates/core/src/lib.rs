//! `fruitstore-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod value_object;
pub mod version;

pub use entity::{Entity, same_identity};
pub use error::{DomainError, DomainResult};
pub use value_object::{ValueObject, same_value};
pub use version::ExpectedVersion;
