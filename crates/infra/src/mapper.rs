//! Document <-> `Fruit` mapping.
//!
//! Stored documents are re-validated on the way in, so a row written by some
//! other tool that breaks a value rule is reported instead of silently loaded.

use fruitstore_inventory::{Fruit, FruitDescription, FruitLimit, FruitName};

use crate::document::{DocumentStoreError, FruitDocument};

pub fn to_domain(document: &FruitDocument) -> Result<Fruit, DocumentStoreError> {
    let corrupt = |e: fruitstore_core::DomainError| {
        DocumentStoreError::Serialization(format!(
            "stored document '{}' is invalid: {e}",
            document.name
        ))
    };
    let name = FruitName::create(document.name.as_str()).map_err(corrupt)?;
    let description = FruitDescription::create(document.description.as_str()).map_err(corrupt)?;
    let limit = FruitLimit::create(document.limit).map_err(corrupt)?;
    Ok(Fruit::new(name, description, limit))
}

pub fn to_document(fruit: &Fruit) -> FruitDocument {
    FruitDocument {
        name: fruit.name().value().to_string(),
        description: fruit.description().value().to_string(),
        limit: i64::from(fruit.limit().value()),
    }
}
