use serde::{Deserialize, Serialize};

use fruitstore_core::value_object::ensure_char_len;
use fruitstore_core::{DomainError, DomainResult, ValueObject};

/// Human-readable description, 1 to 30 characters inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FruitDescription(String);

impl FruitDescription {
    pub const MIN_CHARS: usize = 1;
    pub const MAX_CHARS: usize = 30;

    pub fn create(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        ensure_char_len("fruit description", &raw, Self::MIN_CHARS, Self::MAX_CHARS)?;
        Ok(Self(raw))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl ValueObject for FruitDescription {
    type Value = str;

    fn as_value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FruitDescription {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<FruitDescription> for String {
    fn from(value: FruitDescription) -> Self {
        value.0
    }
}

impl core::fmt::Display for FruitDescription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_short_description() {
        let d = FruitDescription::create("this is a lemon").unwrap();
        assert_eq!(d.value(), "this is a lemon");
    }

    #[test]
    fn rejects_long_description_with_readable_message() {
        let err = FruitDescription::create(
            "this is a fruit with a very long description that exceeds the allowed limit",
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("fruit description cannot be longer than 30 characters")
        );
    }

    #[test]
    fn rejects_empty_description() {
        assert_eq!(
            FruitDescription::create(""),
            Err(DomainError::validation("fruit description cannot be empty"))
        );
    }

    #[test]
    fn boundary_lengths() {
        assert!(FruitDescription::create("a".repeat(30)).is_ok());
        assert!(FruitDescription::create("a".repeat(31)).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: any 1..=30 char string is accepted unchanged.
        #[test]
        fn accepts_every_length_in_range(d in "\\PC{1,30}") {
            let created = FruitDescription::create(d.clone()).unwrap();
            prop_assert_eq!(created.value(), d.as_str());
        }

        /// Property: anything longer than 30 chars is rejected.
        #[test]
        fn rejects_every_length_over_range(d in "\\PC{31,80}") {
            prop_assert!(FruitDescription::create(d).is_err());
        }
    }
}
