use fruitstore_core::DomainResult;

use crate::fruit::Fruit;
use crate::policy::InventoryPolicy;
use crate::value_objects::{FruitAmount, FruitDescription, FruitLimit, FruitName};

/// Builds valid `Fruit` records.
///
/// Every input is run through its type's `create` again, even when it is
/// already a value object, and the limit is checked against the policy
/// ceiling. Pure; no IO.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FruitFactory {
    policy: InventoryPolicy,
}

impl FruitFactory {
    pub fn new(policy: InventoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InventoryPolicy {
        self.policy
    }

    /// Fails with the error of the first input (name, description, limit) that
    /// does not validate.
    pub fn create_fruit(
        &self,
        name: &FruitName,
        description: &FruitDescription,
        limit: FruitLimit,
    ) -> DomainResult<Fruit> {
        self.create_fruit_from_raw(name.value(), description.value(), i64::from(limit.value()))
    }

    /// Same as [`create_fruit`](Self::create_fruit) for unvalidated boundary input.
    pub fn create_fruit_from_raw(
        &self,
        name: &str,
        description: &str,
        limit: i64,
    ) -> DomainResult<Fruit> {
        let name = FruitName::create(name)?;
        let description = FruitDescription::create(description)?;
        let limit = self.admit_limit(limit)?;
        Ok(Fruit::new(name, description, limit))
    }

    /// Validate a raw limit against both the type range and the policy ceiling.
    pub fn admit_limit(&self, raw: i64) -> DomainResult<FruitLimit> {
        self.policy.admit(FruitLimit::create(raw)?)
    }

    /// Limit a record would have after storing `amount` more.
    pub fn limit_after_store(
        &self,
        current: FruitLimit,
        amount: FruitAmount,
    ) -> DomainResult<FruitLimit> {
        self.policy.admit(current.plus(amount)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitstore_core::DomainError;

    #[test]
    fn creates_lemon() {
        let fruit = FruitFactory::default()
            .create_fruit_from_raw("lemon", "this is a lemon", 10)
            .unwrap();
        assert_eq!(fruit.name().value(), "lemon");
        assert_eq!(fruit.description().value(), "this is a lemon");
        assert_eq!(fruit.limit().value(), 10);
    }

    #[test]
    fn reports_first_failing_field() {
        let factory = FruitFactory::default();
        // Name is checked before description.
        assert_eq!(
            factory.create_fruit_from_raw("", "", -1).unwrap_err(),
            DomainError::validation("fruit name cannot be empty")
        );
        assert_eq!(
            factory.create_fruit_from_raw("lemon", "", -1).unwrap_err(),
            DomainError::validation("fruit description cannot be empty")
        );
        assert_eq!(
            factory.create_fruit_from_raw("lemon", "ok", -1).unwrap_err(),
            DomainError::validation("fruit limit cannot be negative")
        );
    }

    #[test]
    fn revalidates_against_policy() {
        let factory = FruitFactory::new(InventoryPolicy::with_max_limit(10).unwrap());
        let name = FruitName::create("lemon").unwrap();
        let description = FruitDescription::create("this is a lemon").unwrap();

        assert!(factory
            .create_fruit(&name, &description, FruitLimit::create(10).unwrap())
            .is_ok());
        assert!(factory
            .create_fruit(&name, &description, FruitLimit::create(11).unwrap())
            .is_err());
    }

    #[test]
    fn store_past_configured_ceiling_is_a_limit_error() {
        let factory = FruitFactory::new(InventoryPolicy::with_max_limit(10).unwrap());
        let five = FruitLimit::create(5).unwrap();

        let ok = factory
            .limit_after_store(five, FruitAmount::create(5).unwrap())
            .unwrap();
        assert_eq!(ok.value(), 10);

        match factory.limit_after_store(five, FruitAmount::create(6).unwrap()) {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("greater than 10")),
            other => panic!("expected limit validation error, got {other:?}"),
        }
    }
}
