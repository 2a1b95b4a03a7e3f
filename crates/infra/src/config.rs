//! Runtime configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `FRUITSTORE_BACKEND` | `memory` | `memory` or `postgres` |
//! | `DATABASE_URL` | (none) | required when the backend is `postgres` |
//! | `FRUITSTORE_PG_MAX_CONNECTIONS` | `5` | pool size for `postgres` |
//! | `FRUITSTORE_MAX_LIMIT` | `999` | ceiling on any record's limit |

use thiserror::Error;
use tracing::info;

use fruitstore_inventory::InventoryPolicy;

pub const BACKEND_VAR: &str = "FRUITSTORE_BACKEND";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const PG_MAX_CONNECTIONS_VAR: &str = "FRUITSTORE_PG_MAX_CONNECTIONS";
pub const MAX_LIMIT_VAR: &str = "FRUITSTORE_MAX_LIMIT";

const DEFAULT_PG_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has unsupported value '{value}'")]
    Unsupported { var: &'static str, value: String },

    #[error("{var} must be set when FRUITSTORE_BACKEND=postgres")]
    Missing { var: &'static str },

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    InMemory,
    Postgres { url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruitStoreConfig {
    pub backend: BackendConfig,
    pub policy: InventoryPolicy,
}

impl Default for FruitStoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::InMemory,
            policy: InventoryPolicy::default(),
        }
    }
}

impl FruitStoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset and empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let backend = match get(BACKEND_VAR).as_deref().map(str::trim) {
            None | Some("memory") => BackendConfig::InMemory,
            Some("postgres") => {
                let url = get(DATABASE_URL_VAR).ok_or(ConfigError::Missing {
                    var: DATABASE_URL_VAR,
                })?;
                let max_connections = match get(PG_MAX_CONNECTIONS_VAR) {
                    Some(raw) => parse::<u32>(PG_MAX_CONNECTIONS_VAR, &raw)?,
                    None => DEFAULT_PG_MAX_CONNECTIONS,
                };
                BackendConfig::Postgres {
                    url,
                    max_connections,
                }
            }
            Some(other) => {
                return Err(ConfigError::Unsupported {
                    var: BACKEND_VAR,
                    value: other.to_string(),
                });
            }
        };

        let policy = match get(MAX_LIMIT_VAR) {
            Some(raw) => InventoryPolicy::with_max_limit(parse::<i64>(MAX_LIMIT_VAR, &raw)?)
                .map_err(|e| ConfigError::Invalid {
                    var: MAX_LIMIT_VAR,
                    reason: e.to_string(),
                })?,
            None => {
                info!("{MAX_LIMIT_VAR} not set, using default ceiling");
                InventoryPolicy::default()
            }
        };

        Ok(Self { backend, policy })
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_to_in_memory_with_type_ceiling() {
        let config = FruitStoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FruitStoreConfig::default());
        assert_eq!(config.policy.max_limit().value(), 999);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            FruitStoreConfig::from_lookup(lookup(&[(BACKEND_VAR, "postgres")])),
            Err(ConfigError::Missing {
                var: DATABASE_URL_VAR
            })
        );

        let config = FruitStoreConfig::from_lookup(lookup(&[
            (BACKEND_VAR, "postgres"),
            (DATABASE_URL_VAR, "postgres://localhost/fruits"),
            (PG_MAX_CONNECTIONS_VAR, "12"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Postgres {
                url: "postgres://localhost/fruits".to_string(),
                max_connections: 12
            }
        );
    }

    #[test]
    fn max_limit_is_range_checked() {
        let config = FruitStoreConfig::from_lookup(lookup(&[(MAX_LIMIT_VAR, "10")])).unwrap();
        assert_eq!(config.policy.max_limit().value(), 10);

        assert!(matches!(
            FruitStoreConfig::from_lookup(lookup(&[(MAX_LIMIT_VAR, "1000")])),
            Err(ConfigError::Invalid { var: MAX_LIMIT_VAR, .. })
        ));
        assert!(matches!(
            FruitStoreConfig::from_lookup(lookup(&[(MAX_LIMIT_VAR, "ten")])),
            Err(ConfigError::Invalid { var: MAX_LIMIT_VAR, .. })
        ));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            FruitStoreConfig::from_lookup(lookup(&[(BACKEND_VAR, "mongo")])),
            Err(ConfigError::Unsupported { .. })
        ));
    }
}
