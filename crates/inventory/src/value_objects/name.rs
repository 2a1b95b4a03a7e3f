use serde::{Deserialize, Serialize};

use fruitstore_core::{DomainError, DomainResult, ValueObject};

/// Unique identifier of a fruit record. Any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FruitName(String);

impl FruitName {
    pub fn create(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::validation("fruit name cannot be empty"));
        }
        Ok(Self(raw))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for FruitName {
    type Value = str;

    fn as_value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FruitName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<FruitName> for String {
    fn from(value: FruitName) -> Self {
        value.0
    }
}

impl AsRef<str> for FruitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for FruitName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
