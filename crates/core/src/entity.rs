//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Identity equality: two entities are the same iff their ids are equal,
/// regardless of the rest of their state.
pub fn same_identity<E: Entity>(a: &E, b: &E) -> bool {
    a.id() == b.id()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Crate {
        label: &'static str,
        contents: u32,
    }

    impl Entity for Crate {
        type Id = &'static str;

        fn id(&self) -> &Self::Id {
            &self.label
        }
    }

    #[test]
    fn identity_ignores_state() {
        let a = Crate { label: "a", contents: 1 };
        let a2 = Crate { label: "a", contents: 7 };
        let b = Crate { label: "b", contents: 1 };

        assert!(same_identity(&a, &a2));
        assert!(!same_identity(&a, &b));
        assert_eq!(a.contents, b.contents);
    }
}
