use serde::{Deserialize, Serialize};

use fruitstore_core::value_object::ensure_in_range;
use fruitstore_core::{DomainError, DomainResult, ValueObject};

use super::FruitAmount;

/// Quantity currently held by a fruit record, 0 to 999 inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct FruitLimit(u16);

impl FruitLimit {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 999;

    pub const ZERO: FruitLimit = FruitLimit(0);
    pub const CEILING: FruitLimit = FruitLimit(Self::MAX);

    pub fn create(raw: i64) -> DomainResult<Self> {
        ensure_in_range("fruit limit", raw, Self::MIN, Self::MAX).map(Self)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add an amount, re-validating the sum as a limit.
    ///
    /// The sum is computed in `i64`, so overflow is reported as a range error.
    pub fn plus(self, amount: FruitAmount) -> DomainResult<Self> {
        Self::create(i64::from(self.0) + i64::from(amount.value()))
    }

    /// Subtract an amount; `None` when the result would drop below zero.
    pub fn minus(self, amount: FruitAmount) -> Option<Self> {
        self.0.checked_sub(amount.value()).map(Self)
    }
}

impl ValueObject for FruitLimit {
    type Value = u16;

    fn as_value(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<i64> for FruitLimit {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<FruitLimit> for i64 {
    fn from(value: FruitLimit) -> Self {
        i64::from(value.0)
    }
}

impl core::fmt::Display for FruitLimit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
