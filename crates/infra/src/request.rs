//! Wire shapes for callers outside the crate (API layer, CLI, tests).
//!
//! Requests carry raw, unvalidated primitives; the service validates them
//! into value objects before touching the repository.

use serde::{Deserialize, Serialize};

use fruitstore_inventory::Fruit;

/// One call into the fruit service, tagged by `op`.
///
/// ```json
/// { "op": "storeFruit", "name": "lemon", "amount": 3 }
/// { "op": "deleteFruit", "name": "lemon", "forceDelete": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FruitRequest {
    Fruits,
    Fruit {
        name: String,
    },
    IsUniqueName {
        name: String,
    },
    CreateFruit {
        name: String,
        description: String,
        limit: i64,
    },
    UpdateFruit {
        name: String,
        description: String,
        limit: i64,
    },
    StoreFruit {
        name: String,
        amount: i64,
    },
    RemoveFruit {
        name: String,
        amount: i64,
    },
    DeleteFruit {
        name: String,
        #[serde(rename = "forceDelete", default)]
        force_delete: Option<bool>,
    },
    DeleteAllFruits {
        #[serde(rename = "forceDelete", default)]
        force_delete: Option<bool>,
    },
}

/// Plain view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FruitView {
    pub name: String,
    pub description: String,
    pub limit: u16,
}

impl From<&Fruit> for FruitView {
    fn from(fruit: &Fruit) -> Self {
        Self {
            name: fruit.name().value().to_string(),
            description: fruit.description().value().to_string(),
            limit: fruit.limit().value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FruitResponse {
    Fruit(FruitView),
    Fruits(Vec<FruitView>),
    Unique(bool),
    Deleted { name: String },
    DeletedAll { count: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_are_tagged_by_op() {
        let request: FruitRequest = serde_json::from_value(json!({
            "op": "createFruit",
            "name": "lemon",
            "description": "this is a lemon",
            "limit": 10
        }))
        .unwrap();
        assert_eq!(
            request,
            FruitRequest::CreateFruit {
                name: "lemon".to_string(),
                description: "this is a lemon".to_string(),
                limit: 10
            }
        );

        let request: FruitRequest = serde_json::from_value(json!({ "op": "fruits" })).unwrap();
        assert_eq!(request, FruitRequest::Fruits);
    }

    #[test]
    fn force_delete_may_be_absent_or_null() {
        for body in [
            json!({ "op": "deleteFruit", "name": "lemon" }),
            json!({ "op": "deleteFruit", "name": "lemon", "forceDelete": null }),
        ] {
            let request: FruitRequest = serde_json::from_value(body).unwrap();
            assert_eq!(
                request,
                FruitRequest::DeleteFruit {
                    name: "lemon".to_string(),
                    force_delete: None
                }
            );
        }
    }

    #[test]
    fn negative_amounts_reach_validation_instead_of_failing_to_parse() {
        let request: FruitRequest =
            serde_json::from_value(json!({ "op": "removeFruit", "name": "lemon", "amount": -3 }))
                .unwrap();
        assert!(matches!(request, FruitRequest::RemoveFruit { amount: -3, .. }));
    }

    #[test]
    fn responses_serialize_untagged() {
        let view = FruitView {
            name: "lemon".to_string(),
            description: "this is a lemon".to_string(),
            limit: 10,
        };
        assert_eq!(
            serde_json::to_value(FruitResponse::Fruit(view)).unwrap(),
            json!({ "name": "lemon", "description": "this is a lemon", "limit": 10 })
        );
        assert_eq!(
            serde_json::to_value(FruitResponse::Unique(true)).unwrap(),
            json!(true)
        );
        assert_eq!(
            serde_json::to_value(FruitResponse::DeletedAll { count: 2 }).unwrap(),
            json!({ "count": 2 })
        );
    }
}
