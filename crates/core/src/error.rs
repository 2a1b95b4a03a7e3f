//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, caller-actionable failures (bad input or a
/// stale assumption about record state). Infrastructure faults belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed its range/format rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the same key is already present.
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// A removal asked for more than the record currently holds.
    #[error(
        "insufficient quantity for '{name}': removing {requested} from {available} cannot be less than 0"
    )]
    InsufficientQuantity {
        name: String,
        available: u16,
        requested: u16,
    },

    /// A non-forced delete was blocked by an outstanding quantity.
    #[error("'{name}' has a non-zero limit ({limit}); cannot delete without force")]
    NonZeroLimit { name: String, limit: u16 },

    /// A non-forced delete-all was blocked by records with outstanding quantity.
    #[error("{count} record(s) have a non-zero limit; cannot delete all without force")]
    SomeNonZeroLimit { count: usize },

    /// A non-forced delete-all found nothing to delete.
    #[error("store is empty; nothing to delete")]
    EmptyStore,

    /// A concurrent writer changed the record between read and write.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists(key.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable machine-readable code, suitable for an API error payload.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::InsufficientQuantity { .. } => "insufficient_quantity",
            Self::NonZeroLimit { .. } => "non_zero_limit",
            Self::SomeNonZeroLimit { .. } => "some_non_zero_limit",
            Self::EmptyStore => "empty_store",
            Self::Conflict(_) => "conflict",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_quantity_message_mentions_lower_bound() {
        let err = DomainError::InsufficientQuantity {
            name: "lemon".to_string(),
            available: 5,
            requested: 6,
        };
        assert!(err.to_string().contains("cannot be less than 0"));
        assert_eq!(err.code(), "insufficient_quantity");
    }

    #[test]
    fn helpers_build_expected_variants() {
        assert_eq!(
            DomainError::not_found("lemon"),
            DomainError::NotFound("lemon".to_string())
        );
        assert!(DomainError::not_found("lemon").is_not_found());
        assert!(!DomainError::EmptyStore.is_not_found());
        assert_eq!(
            DomainError::validation("bad").to_string(),
            "validation failed: bad"
        );
    }
}
