//! Self-validating value types.
//!
//! Each type is produced only through `create`, which enforces its range or
//! format rule; there are no setters. Serde goes through the same check, so a
//! deserialized value is as trustworthy as a constructed one.

mod amount;
mod description;
mod limit;
mod name;

pub use amount::FruitAmount;
pub use description::FruitDescription;
pub use limit::FruitLimit;
pub use name::FruitName;
