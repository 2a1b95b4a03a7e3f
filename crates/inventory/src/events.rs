//! Facts emitted after a fruit record has been changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fruitstore_events::Event;

use crate::fruit::Fruit;
use crate::value_objects::{FruitAmount, FruitDescription, FruitLimit, FruitName};

/// Subject used for store-wide events.
pub const ALL_FRUITS_SUBJECT: &str = "*";

/// Event: FruitCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitCreated {
    pub name: FruitName,
    pub description: FruitDescription,
    pub limit: FruitLimit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FruitUpdated (description and limit replaced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitUpdated {
    pub name: FruitName,
    pub description: FruitDescription,
    pub limit: FruitLimit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FruitStored. `description` and `limit` are the record after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitStored {
    pub name: FruitName,
    pub description: FruitDescription,
    pub amount: FruitAmount,
    pub limit: FruitLimit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FruitRemoved. `description` and `limit` are the record after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitRemoved {
    pub name: FruitName,
    pub description: FruitDescription,
    pub amount: FruitAmount,
    pub limit: FruitLimit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FruitDeleted.
///
/// `previous_limit` is `None` when a forced delete found nothing to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitDeleted {
    pub name: FruitName,
    pub forced: bool,
    pub previous_limit: Option<FruitLimit>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AllFruitsDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllFruitsDeleted {
    pub forced: bool,
    pub count: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitEvent {
    FruitCreated(FruitCreated),
    FruitUpdated(FruitUpdated),
    FruitStored(FruitStored),
    FruitRemoved(FruitRemoved),
    FruitDeleted(FruitDeleted),
    AllFruitsDeleted(AllFruitsDeleted),
}

impl FruitEvent {
    pub fn created(fruit: &Fruit, occurred_at: DateTime<Utc>) -> Self {
        FruitEvent::FruitCreated(FruitCreated {
            name: fruit.name().clone(),
            description: fruit.description().clone(),
            limit: fruit.limit(),
            occurred_at,
        })
    }

    pub fn updated(fruit: &Fruit, occurred_at: DateTime<Utc>) -> Self {
        FruitEvent::FruitUpdated(FruitUpdated {
            name: fruit.name().clone(),
            description: fruit.description().clone(),
            limit: fruit.limit(),
            occurred_at,
        })
    }

    /// `fruit` is the record after `amount` was added.
    pub fn stored(fruit: &Fruit, amount: FruitAmount, occurred_at: DateTime<Utc>) -> Self {
        FruitEvent::FruitStored(FruitStored {
            name: fruit.name().clone(),
            description: fruit.description().clone(),
            amount,
            limit: fruit.limit(),
            occurred_at,
        })
    }

    /// `fruit` is the record after `amount` was taken.
    pub fn removed(fruit: &Fruit, amount: FruitAmount, occurred_at: DateTime<Utc>) -> Self {
        FruitEvent::FruitRemoved(FruitRemoved {
            name: fruit.name().clone(),
            description: fruit.description().clone(),
            amount,
            limit: fruit.limit(),
            occurred_at,
        })
    }

    /// Record state carried by the event, for events that leave a record behind.
    pub fn resulting_limit(&self) -> Option<FruitLimit> {
        match self {
            FruitEvent::FruitCreated(e) => Some(e.limit),
            FruitEvent::FruitUpdated(e) => Some(e.limit),
            FruitEvent::FruitStored(e) => Some(e.limit),
            FruitEvent::FruitRemoved(e) => Some(e.limit),
            FruitEvent::FruitDeleted(_) | FruitEvent::AllFruitsDeleted(_) => None,
        }
    }

    /// The record as written, for events that leave a record behind.
    pub fn resulting_fruit(&self) -> Option<Fruit> {
        let (name, description, limit) = match self {
            FruitEvent::FruitCreated(e) => (&e.name, &e.description, e.limit),
            FruitEvent::FruitUpdated(e) => (&e.name, &e.description, e.limit),
            FruitEvent::FruitStored(e) => (&e.name, &e.description, e.limit),
            FruitEvent::FruitRemoved(e) => (&e.name, &e.description, e.limit),
            FruitEvent::FruitDeleted(_) | FruitEvent::AllFruitsDeleted(_) => return None,
        };
        Some(Fruit::new(name.clone(), description.clone(), limit))
    }

    /// Number of records removed by a store-wide delete.
    pub fn deleted_count(&self) -> Option<u64> {
        match self {
            FruitEvent::AllFruitsDeleted(e) => Some(e.count),
            _ => None,
        }
    }
}

impl Event for FruitEvent {
    fn event_type(&self) -> &'static str {
        match self {
            FruitEvent::FruitCreated(_) => "fruit_storage.fruit.created",
            FruitEvent::FruitUpdated(_) => "fruit_storage.fruit.updated",
            FruitEvent::FruitStored(_) => "fruit_storage.fruit.stored",
            FruitEvent::FruitRemoved(_) => "fruit_storage.fruit.removed",
            FruitEvent::FruitDeleted(_) => "fruit_storage.fruit.deleted",
            FruitEvent::AllFruitsDeleted(_) => "fruit_storage.fruits.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            FruitEvent::FruitCreated(e) => e.occurred_at,
            FruitEvent::FruitUpdated(e) => e.occurred_at,
            FruitEvent::FruitStored(e) => e.occurred_at,
            FruitEvent::FruitRemoved(e) => e.occurred_at,
            FruitEvent::FruitDeleted(e) => e.occurred_at,
            FruitEvent::AllFruitsDeleted(e) => e.occurred_at,
        }
    }

    fn subject(&self) -> &str {
        match self {
            FruitEvent::FruitCreated(e) => e.name.value(),
            FruitEvent::FruitUpdated(e) => e.name.value(),
            FruitEvent::FruitStored(e) => e.name.value(),
            FruitEvent::FruitRemoved(e) => e.name.value(),
            FruitEvent::FruitDeleted(e) => e.name.value(),
            FruitEvent::AllFruitsDeleted(_) => ALL_FRUITS_SUBJECT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FruitFactory;

    #[test]
    fn created_event_carries_record_state() {
        let fruit = FruitFactory::default()
            .create_fruit_from_raw("lemon", "this is a lemon", 10)
            .unwrap();
        let at = Utc::now();
        let event = FruitEvent::created(&fruit, at);

        assert_eq!(event.event_type(), "fruit_storage.fruit.created");
        assert_eq!(event.subject(), "lemon");
        assert_eq!(event.occurred_at(), at);
        assert_eq!(event.resulting_limit(), Some(fruit.limit()));
    }

    #[test]
    fn store_wide_events_use_wildcard_subject() {
        let event = FruitEvent::AllFruitsDeleted(AllFruitsDeleted {
            forced: true,
            count: 3,
            occurred_at: Utc::now(),
        });
        assert_eq!(event.subject(), ALL_FRUITS_SUBJECT);
        assert_eq!(event.resulting_limit(), None);
        assert!(event.resulting_fruit().is_none());
        assert_eq!(event.deleted_count(), Some(3));
    }

    #[test]
    fn removed_event_rebuilds_the_written_record() {
        let fruit = FruitFactory::default()
            .create_fruit_from_raw("lemon", "this is a lemon", 2)
            .unwrap();
        let event = FruitEvent::removed(&fruit, FruitAmount::create(3).unwrap(), Utc::now());

        let rebuilt = event.resulting_fruit().unwrap();
        assert!(rebuilt.same_state(&fruit));
        assert_eq!(event.deleted_count(), None);
    }

    #[test]
    fn events_serialize_with_plain_values() {
        let fruit = FruitFactory::default()
            .create_fruit_from_raw("lemon", "this is a lemon", 8)
            .unwrap();
        let event = FruitEvent::stored(&fruit, FruitAmount::create(3).unwrap(), Utc::now());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["FruitStored"]["name"], "lemon");
        assert_eq!(json["FruitStored"]["description"], "this is a lemon");
        assert_eq!(json["FruitStored"]["amount"], 3);
        assert_eq!(json["FruitStored"]["limit"], 8);
    }
}
