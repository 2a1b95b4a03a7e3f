use serde::{Deserialize, Serialize};

use fruitstore_core::value_object::ensure_in_range;
use fruitstore_core::{DomainError, DomainResult, ValueObject};

/// Transient operand for store/remove, 0 to 10 inclusive. Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FruitAmount(u16);

impl FruitAmount {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 10;

    pub fn create(raw: i64) -> DomainResult<Self> {
        ensure_in_range("fruit amount", raw, Self::MIN, Self::MAX).map(Self)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl ValueObject for FruitAmount {
    type Value = u16;

    fn as_value(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<i64> for FruitAmount {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<FruitAmount> for i64 {
    fn from(value: FruitAmount) -> Self {
        i64::from(value.0)
    }
}

impl core::fmt::Display for FruitAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_more_than_ten() {
        assert_eq!(
            FruitAmount::create(11),
            Err(DomainError::validation("fruit amount cannot be greater than 10"))
        );
        assert_eq!(
            FruitAmount::create(-1),
            Err(DomainError::validation("fruit amount cannot be negative"))
        );
    }

    proptest! {
        /// Property: create succeeds iff 0 <= a <= 10.
        #[test]
        fn create_succeeds_iff_in_range(a in -100i64..100i64) {
            prop_assert_eq!(FruitAmount::create(a).is_ok(), (0..=10).contains(&a));
        }
    }
}
