//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. They are only ever produced through a validating
//! constructor; to "modify" one, validate a new value and replace the field.

use crate::error::{DomainError, DomainResult};

/// Marker + accessor for value objects.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and tests
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Weight(u32);
///
/// impl ValueObject for Weight {
///     type Value = u32;
///     fn as_value(&self) -> &u32 { &self.0 }
/// }
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {
    /// The underlying primitive.
    type Value: ?Sized + PartialEq;

    fn as_value(&self) -> &Self::Value;
}

/// Value equality over the underlying primitive.
pub fn same_value<V: ValueObject>(a: &V, b: &V) -> bool {
    a.as_value() == b.as_value()
}

/// Check `raw` against an inclusive `[min, max]` range and narrow it to `u16`.
///
/// `label` is the human-readable subject used in messages, e.g. "fruit limit".
pub fn ensure_in_range(label: &str, raw: i64, min: u16, max: u16) -> DomainResult<u16> {
    if raw < i64::from(min) {
        return Err(if min == 0 {
            DomainError::validation(format!("{label} cannot be negative"))
        } else {
            DomainError::validation(format!("{label} cannot be less than {min}"))
        });
    }
    if raw > i64::from(max) {
        return Err(DomainError::validation(format!(
            "{label} cannot be greater than {max}"
        )));
    }
    // In range of [min, max] so the narrowing cannot fail.
    u16::try_from(raw).map_err(|e| DomainError::validation(format!("{label}: {e}")))
}

/// Check the character length (Unicode scalar values) of `raw` against `[min, max]`.
pub fn ensure_char_len(label: &str, raw: &str, min: usize, max: usize) -> DomainResult<()> {
    let len = raw.chars().count();
    if len == 0 && min > 0 {
        return Err(DomainError::validation(format!("{label} cannot be empty")));
    }
    if len < min {
        return Err(DomainError::validation(format!(
            "{label} cannot be shorter than {min} characters"
        )));
    }
    if len > max {
        return Err(DomainError::validation(format!(
            "{label} cannot be longer than {max} characters"
        )));
    }
    Ok(())
}
