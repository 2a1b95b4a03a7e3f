use serde::{Deserialize, Serialize};

use fruitstore_core::{Entity, same_identity};

use crate::value_objects::{FruitDescription, FruitLimit, FruitName};

/// Entity: a named, limited fruit record.
///
/// Identity is the name: two records are equal iff their names are equal,
/// whatever their description or limit. Fields are replaced, never edited in
/// place, and only with already-validated values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    name: FruitName,
    description: FruitDescription,
    limit: FruitLimit,
}

impl Fruit {
    pub fn new(name: FruitName, description: FruitDescription, limit: FruitLimit) -> Self {
        Self {
            name,
            description,
            limit,
        }
    }

    pub fn name(&self) -> &FruitName {
        &self.name
    }

    pub fn description(&self) -> &FruitDescription {
        &self.description
    }

    pub fn limit(&self) -> FruitLimit {
        self.limit
    }

    pub fn with_description(self, description: FruitDescription) -> Self {
        Self {
            description,
            ..self
        }
    }

    pub fn with_limit(self, limit: FruitLimit) -> Self {
        Self { limit, ..self }
    }

    /// True when every field, not just the name, matches.
    pub fn same_state(&self, other: &Fruit) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.limit == other.limit
    }

    pub fn into_parts(self) -> (FruitName, FruitDescription, FruitLimit) {
        (self.name, self.description, self.limit)
    }
}

impl Entity for Fruit {
    type Id = FruitName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

impl PartialEq for Fruit {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl Eq for Fruit {}

impl core::fmt::Display for Fruit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.name, f)
    }
}
