//! Union descriptors.
//!
//! A [`Union`] asks the driver to join the query's own collection with a
//! related one. Turning the ordered union list into real join clauses is
//! the driver's job; this module only has to produce that list with the
//! right keys.

use crate::entity::{foreign_key, EntityKind};

/// A join from a local collection to a foreign one.
///
/// Rows pair up where `local.local_key == foreign.foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
    local: EntityKind,
    foreign: EntityKind,
    local_key: String,
    foreign_key: String,
}

impl Union {
    /// Creates a union, defaulting whichever key is not supplied.
    ///
    /// - `local_key` defaults to `"<foreign collection>_<id_key>"`
    /// - `foreign_key` defaults to `id_key`
    #[must_use]
    pub fn new(
        local: EntityKind,
        foreign: EntityKind,
        id_key: &str,
        local_key: Option<&str>,
        foreign_key_name: Option<&str>,
    ) -> Self {
        let local_key = local_key
            .map(str::to_string)
            .unwrap_or_else(|| foreign_key(foreign.collection(), id_key));
        let foreign_key = foreign_key_name.unwrap_or(id_key).to_string();

        Self {
            local,
            foreign,
            local_key,
            foreign_key,
        }
    }

    /// Returns the local side.
    #[must_use]
    pub fn local(&self) -> &EntityKind {
        &self.local
    }

    /// Returns the foreign side.
    #[must_use]
    pub fn foreign(&self) -> &EntityKind {
        &self.foreign
    }

    /// Returns the join column on the local collection.
    #[must_use]
    pub fn local_key(&self) -> &str {
        &self.local_key
    }

    /// Returns the join column on the foreign collection.
    #[must_use]
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_follow_foreign_collection() {
        let union = Union::new(
            EntityKind::named("pet"),
            EntityKind::named("user"),
            "id",
            None,
            None,
        );

        assert_eq!(union.local().collection(), "pet");
        assert_eq!(union.foreign().collection(), "user");
        assert_eq!(union.local_key(), "user_id");
        assert_eq!(union.foreign_key(), "id");
    }

    #[test]
    fn explicit_local_key_keeps_foreign_default() {
        let union = Union::new(
            EntityKind::named("pet"),
            EntityKind::named("user"),
            "_id",
            Some("owner"),
            None,
        );

        assert_eq!(union.local_key(), "owner");
        assert_eq!(union.foreign_key(), "_id");
    }

    #[test]
    fn explicit_foreign_key_keeps_local_default() {
        let union = Union::new(
            EntityKind::named("pet"),
            EntityKind::named("user"),
            "_id",
            None,
            Some("uuid"),
        );

        assert_eq!(union.local_key(), "user__id");
        assert_eq!(union.foreign_key(), "uuid");
    }

    proptest! {
        #[test]
        fn default_keys_for_any_names(
            local in "[a-z]{1,8}",
            foreign in "[a-z]{1,8}",
            id_key in "[a-z_]{1,4}",
        ) {
            let union = Union::new(
                EntityKind::named(local),
                EntityKind::named(foreign.clone()),
                &id_key,
                None,
                None,
            );
            prop_assert_eq!(union.local_key(), format!("{}_{}", foreign, id_key));
            prop_assert_eq!(union.foreign_key(), id_key.as_str());
        }
    }
}
