use serde::{Deserialize, Serialize};

use fruitstore_core::{DomainError, DomainResult};

use crate::value_objects::FruitLimit;

/// Deployment-wide ceiling on a record's limit.
///
/// Every write of a limit (create, update, store) must stay at or below
/// `max_limit`. The default ceiling is the type's own maximum (999).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    max_limit: FruitLimit,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            max_limit: FruitLimit::CEILING,
        }
    }
}

impl InventoryPolicy {
    pub fn new(max_limit: FruitLimit) -> Self {
        Self { max_limit }
    }

    /// Build from a raw ceiling (e.g. read from configuration).
    pub fn with_max_limit(raw: i64) -> DomainResult<Self> {
        FruitLimit::create(raw).map(Self::new)
    }

    pub fn max_limit(&self) -> FruitLimit {
        self.max_limit
    }

    /// Accept `limit` if it is within the ceiling.
    pub fn admit(&self, limit: FruitLimit) -> DomainResult<FruitLimit> {
        if limit > self.max_limit {
            return Err(DomainError::validation(format!(
                "fruit limit cannot be greater than {}",
                self.max_limit
            )));
        }
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ceiling_is_type_maximum() {
        assert_eq!(InventoryPolicy::default().max_limit().value(), 999);
    }

    #[test]
    fn admit_rejects_above_configured_ceiling() {
        let policy = InventoryPolicy::with_max_limit(10).unwrap();
        assert!(policy.admit(FruitLimit::create(10).unwrap()).is_ok());
        assert_eq!(
            policy.admit(FruitLimit::create(11).unwrap()),
            Err(DomainError::validation("fruit limit cannot be greater than 10"))
        );
    }

    #[test]
    fn ceiling_itself_must_be_a_valid_limit() {
        assert!(InventoryPolicy::with_max_limit(1000).is_err());
        assert!(InventoryPolicy::with_max_limit(-1).is_err());
    }
}
