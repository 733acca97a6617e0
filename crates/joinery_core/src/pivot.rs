//! Pivot entities for many-to-many relations.
//!
//! A [`Pivot`] is one row of the join table between two entity types.
//! The two types are put in a canonical order by comparing their
//! collection names: the smaller name is always *left*, the other *right*.
//! The join table is named `"<left>_<right>"` and its columns follow the
//! same order, so `Pivot<A, B>` and `Pivot<B, A>` share one table and one
//! layout no matter which order a call site names them in.

use crate::database::Database;
use crate::entity::{foreign_key, Context, Entity, EntityKind};
use crate::error::{CoreError, CoreResult};
use crate::schema::Preparation;
use joinery_value::Value;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Returns the join table name for two collections.
///
/// Symmetric: `pivot_name(a, b) == pivot_name(b, a)`.
#[must_use]
pub fn pivot_name(first: &str, second: &str) -> String {
    if first <= second {
        format!("{first}_{second}")
    } else {
        format!("{second}_{first}")
    }
}

/// Canonical left/right assignment of two entity kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotSides {
    left: EntityKind,
    right: EntityKind,
    first_is_left: bool,
}

impl PivotSides {
    /// Orders `first` and `second` by collection name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] when both kinds share a
    /// collection name, since no canonical order exists.
    pub fn resolve(first: EntityKind, second: EntityKind) -> CoreResult<Self> {
        match first.collection().cmp(second.collection()) {
            Ordering::Less => Ok(Self {
                left: first,
                right: second,
                first_is_left: true,
            }),
            Ordering::Greater => Ok(Self {
                left: second,
                right: first,
                first_is_left: false,
            }),
            Ordering::Equal => Err(CoreError::invalid_configuration(format!(
                "pivot sides share the collection name {first}"
            ))),
        }
    }

    /// Orders two entity types by collection name.
    pub fn of<First: Entity, Second: Entity>() -> CoreResult<Self> {
        Self::resolve(EntityKind::of::<First>(), EntityKind::of::<Second>())
    }

    /// Returns the canonical left kind.
    #[must_use]
    pub fn left(&self) -> &EntityKind {
        &self.left
    }

    /// Returns the canonical right kind.
    #[must_use]
    pub fn right(&self) -> &EntityKind {
        &self.right
    }

    /// Whether the first kind given to [`PivotSides::resolve`] became left.
    #[must_use]
    pub fn first_is_left(&self) -> bool {
        self.first_is_left
    }

    /// Returns the join table name, `"<left>_<right>"`.
    #[must_use]
    pub fn collection_name(&self) -> String {
        format!("{}_{}", self.left, self.right)
    }

    /// Rearranges a `(first, second)` pair into `(left, right)`.
    pub fn order<V>(&self, first: V, second: V) -> (V, V) {
        if self.first_is_left {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Column holding the left entity's identifier under `id_key`.
    #[must_use]
    pub fn left_column(&self, id_key: &str) -> String {
        foreign_key(self.left.collection(), id_key)
    }

    /// Column holding the right entity's identifier under `id_key`.
    #[must_use]
    pub fn right_column(&self, id_key: &str) -> String {
        foreign_key(self.right.collection(), id_key)
    }
}

/// One row of the join table between `First` and `Second`.
pub struct Pivot<First, Second> {
    id: Option<Value>,
    left_id: Option<Value>,
    right_id: Option<Value>,
    _marker: PhantomData<fn() -> (First, Second)>,
}

impl<First: Entity, Second: Entity> Pivot<First, Second> {
    /// Returns the canonical sides of this pivot type.
    pub fn sides() -> CoreResult<PivotSides> {
        PivotSides::of::<First, Second>()
    }

    /// Links two entities.
    ///
    /// Each identifier lands in the slot of its canonical side, whatever
    /// order the two entities are passed in. Unsaved entities leave their
    /// slot empty.
    pub fn new(first: &First, second: &Second) -> CoreResult<Self> {
        let sides = Self::sides()?;
        let (left_id, right_id) = sides.order(first.id().cloned(), second.id().cloned());
        Ok(Self {
            id: None,
            left_id,
            right_id,
            _marker: PhantomData,
        })
    }

    /// Identifier of the canonical left entity.
    #[must_use]
    pub fn left_id(&self) -> Option<&Value> {
        self.left_id.as_ref()
    }

    /// Identifier of the canonical right entity.
    #[must_use]
    pub fn right_id(&self) -> Option<&Value> {
        self.right_id.as_ref()
    }
}

impl<First: Entity, Second: Entity> Entity for Pivot<First, Second> {
    fn collection_name() -> Cow<'static, str> {
        Cow::Owned(pivot_name(
            &First::collection_name(),
            &Second::collection_name(),
        ))
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<Value>) {
        self.id = id;
    }

    /// Reads the two foreign keys by each linked type's own column
    /// convention, `"<collection>_<id key>"`, then assigns them to their
    /// canonical sides.
    fn from_value(value: &Value, context: &Context) -> CoreResult<Self> {
        let sides = Self::sides()?;
        let first: Option<Value> =
            value.extract_optional(&context.foreign_key(&First::collection_name()))?;
        let second: Option<Value> =
            value.extract_optional(&context.foreign_key(&Second::collection_name()))?;
        let (left_id, right_id) = sides.order(first, second);

        Ok(Self {
            id: value.extract_optional(context.id_key())?,
            left_id,
            right_id,
            _marker: PhantomData,
        })
    }

    /// Writes the link columns under the canonical left/right names, using
    /// the same `"<collection>_<id key>"` convention `from_value` reads.
    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        let sides = Self::sides()?;
        let id_key = context.id_key();
        Ok(Value::map(vec![
            (id_key.to_string(), self.id.clone().into()),
            (sides.left_column(id_key), self.left_id.clone().into()),
            (sides.right_column(id_key), self.right_id.clone().into()),
        ]))
    }

    fn validate() -> CoreResult<()> {
        Self::sides().map(|_| ())
    }
}

impl<First: Entity, Second: Entity> Preparation for Pivot<First, Second> {
    fn prepare(database: &Database) -> CoreResult<()> {
        let sides = Self::sides()?;
        let id_key = database.id_key();
        database.create_collection(&sides.collection_name(), |schema| {
            schema
                .id()
                .int(sides.left_column(id_key))
                .int(sides.right_column(id_key));
        })
    }

    fn revert(database: &Database) -> CoreResult<()> {
        let sides = Self::sides()?;
        database.delete_collection(&sides.collection_name())
    }
}

impl<First, Second> Clone for Pivot<First, Second> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            left_id: self.left_id.clone(),
            right_id: self.right_id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<First, Second> PartialEq for Pivot<First, Second> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.left_id == other.left_id && self.right_id == other.right_id
    }
}

impl<First, Second> fmt::Debug for Pivot<First, Second> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pivot")
            .field("id", &self.id)
            .field("left_id", &self.left_id)
            .field("right_id", &self.right_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    macro_rules! test_entity {
        ($name:ident, $collection:literal) => {
            #[derive(Debug, Clone)]
            struct $name {
                id: Option<Value>,
            }

            impl $name {
                fn with_id(id: i64) -> Self {
                    Self {
                        id: Some(Value::Integer(id)),
                    }
                }
            }

            impl Entity for $name {
                fn collection_name() -> Cow<'static, str> {
                    Cow::Borrowed($collection)
                }

                fn id(&self) -> Option<&Value> {
                    self.id.as_ref()
                }

                fn set_id(&mut self, id: Option<Value>) {
                    self.id = id;
                }

                fn from_value(value: &Value, context: &Context) -> CoreResult<Self> {
                    Ok(Self {
                        id: value.extract_optional(context.id_key())?,
                    })
                }

                fn to_value(&self, context: &Context) -> CoreResult<Value> {
                    Ok(Value::map(vec![(
                        context.id_key().to_string(),
                        self.id.clone().into(),
                    )]))
                }
            }
        };
    }

    test_entity!(Alpha, "a");
    test_entity!(Beta, "b");
    test_entity!(User, "user");
    test_entity!(Role, "role");
    test_entity!(Account, "user");

    #[test]
    fn name_is_symmetric() {
        assert_eq!(Pivot::<Alpha, Beta>::collection_name(), "a_b");
        assert_eq!(Pivot::<Beta, Alpha>::collection_name(), "a_b");
        assert_eq!(Pivot::<User, Role>::collection_name(), "role_user");
    }

    #[test]
    fn ids_follow_canonical_sides() {
        let a = Alpha::with_id(1);
        let b = Beta::with_id(2);

        let ab = Pivot::<Alpha, Beta>::new(&a, &b).unwrap();
        let ba = Pivot::<Beta, Alpha>::new(&b, &a).unwrap();

        assert_eq!(ab.left_id(), Some(&Value::Integer(1)));
        assert_eq!(ab.right_id(), Some(&Value::Integer(2)));
        assert_eq!(ba.left_id(), ab.left_id());
        assert_eq!(ba.right_id(), ab.right_id());
        let context = Context::new("id");
        assert_eq!(ab.to_value(&context).unwrap(), ba.to_value(&context).unwrap());
    }

    #[test]
    fn user_role_puts_role_left() {
        let user = User::with_id(10);
        let role = Role::with_id(20);

        let pivot = Pivot::<User, Role>::new(&user, &role).unwrap();
        assert_eq!(pivot.left_id(), Some(&Value::Integer(20)));
        assert_eq!(pivot.right_id(), Some(&Value::Integer(10)));

        let value = pivot.to_value(&Context::new("id")).unwrap();
        assert_eq!(value.get("role_id"), Some(&Value::Integer(20)));
        assert_eq!(value.get("user_id"), Some(&Value::Integer(10)));
        assert_eq!(value.get("id"), Some(&Value::Null));
    }

    #[test]
    fn unsaved_entities_leave_slots_empty() {
        let pivot = Pivot::<Alpha, Beta>::new(&Alpha { id: None }, &Beta::with_id(4)).unwrap();
        assert!(pivot.left_id().is_none());
        assert_eq!(pivot.right_id(), Some(&Value::Integer(4)));
    }

    #[test]
    fn decode_reads_each_type_column() {
        let context = Context::new("id");
        let record = Value::map(vec![
            ("id".to_string(), Value::Integer(5)),
            ("user_id".to_string(), Value::Integer(10)),
            ("role_id".to_string(), Value::Integer(20)),
        ]);

        let pivot = Pivot::<User, Role>::from_value(&record, &context).unwrap();
        assert_eq!(pivot.id(), Some(&Value::Integer(5)));
        assert_eq!(pivot.left_id(), Some(&Value::Integer(20)));
        assert_eq!(pivot.right_id(), Some(&Value::Integer(10)));

        let swapped = Pivot::<Role, User>::from_value(&record, &context).unwrap();
        assert_eq!(swapped.id(), pivot.id());
        assert_eq!(swapped.left_id(), pivot.left_id());
        assert_eq!(swapped.right_id(), pivot.right_id());
    }

    #[test]
    fn custom_id_key_round_trips() {
        let context = Context::new("_id");
        let mut pivot = Pivot::<User, Role>::new(&User::with_id(1), &Role::with_id(2)).unwrap();
        pivot.set_id(Some(Value::Integer(7)));

        let value = pivot.to_value(&context).unwrap();
        assert_eq!(value.get("_id"), Some(&Value::Integer(7)));
        assert_eq!(value.get("role__id"), Some(&Value::Integer(2)));
        assert_eq!(value.get("user__id"), Some(&Value::Integer(1)));
        assert!(value.get("id").is_none());

        let decoded = Pivot::<User, Role>::from_value(&value, &context).unwrap();
        assert_eq!(decoded, pivot);

        let swapped = Pivot::<Role, User>::from_value(&value, &context).unwrap();
        assert_eq!(swapped.left_id(), Some(&Value::Integer(2)));
        assert_eq!(swapped.right_id(), Some(&Value::Integer(1)));
    }

    #[test]
    fn decode_rejects_non_map() {
        let err = Pivot::<Alpha, Beta>::from_value(&Value::Integer(1), &Context::new("id"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Value(_)));
    }

    #[test]
    fn same_collection_is_rejected() {
        let err = Pivot::<User, Account>::sides().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration { .. }));
        assert!(Pivot::<User, Account>::validate().is_err());
        assert!(Pivot::<User, Account>::new(&User::with_id(1), &Account::with_id(2)).is_err());
        assert!(Pivot::<User, Role>::validate().is_ok());
    }

    #[test]
    fn sides_order_pairs() {
        let sides = PivotSides::resolve(EntityKind::named("z"), EntityKind::named("m")).unwrap();
        assert!(!sides.first_is_left());
        assert_eq!(sides.left().collection(), "m");
        assert_eq!(sides.right().collection(), "z");
        assert_eq!(sides.order("first", "second"), ("second", "first"));
        assert_eq!(sides.collection_name(), "m_z");
        assert_eq!(sides.left_column("id"), "m_id");
        assert_eq!(sides.right_column("_id"), "z__id");
    }

    proptest! {
        #[test]
        fn resolution_ignores_argument_order(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
            prop_assume!(a != b);
            let ab = PivotSides::resolve(EntityKind::named(a.clone()), EntityKind::named(b.clone())).unwrap();
            let ba = PivotSides::resolve(EntityKind::named(b.clone()), EntityKind::named(a.clone())).unwrap();

            prop_assert_eq!(ab.left(), ba.left());
            prop_assert_eq!(ab.right(), ba.right());
            prop_assert_eq!(ab.collection_name(), ba.collection_name());
            prop_assert_eq!(ab.collection_name(), pivot_name(&a, &b));
            prop_assert!(ab.left().collection() < ab.right().collection());
        }
    }
}
