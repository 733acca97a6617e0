//! Entity contract.

use crate::error::CoreResult;
use joinery_value::Value;
use std::borrow::Cow;
use std::fmt;

/// Trait for typed records that can be queried through Joinery.
///
/// Implementors must provide:
/// - `collection_name()`: the stable name of the collection the type maps to
/// - `id()` / `set_id()`: access to the optional identifier, absent until
///   the entity has been created in storage
/// - `from_value()`: construction from a decoded driver record
/// - `to_value()`: serialization back to a generic record
///
/// Both directions receive the same [`Context`], so an entity can name its
/// identifier field after the driver's id key.
///
/// # Example
///
/// ```rust
/// use joinery_core::{Context, CoreResult, Entity};
/// use joinery_value::Value;
/// use std::borrow::Cow;
///
/// struct Tag {
///     id: Option<Value>,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn collection_name() -> Cow<'static, str> {
///         Cow::Borrowed("tag")
///     }
///
///     fn id(&self) -> Option<&Value> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: Option<Value>) {
///         self.id = id;
///     }
///
///     fn from_value(value: &Value, context: &Context) -> CoreResult<Self> {
///         Ok(Tag {
///             id: value.extract_optional(context.id_key())?,
///             label: value.extract("label")?,
///         })
///     }
///
///     fn to_value(&self, context: &Context) -> CoreResult<Value> {
///         Ok(Value::map(vec![
///             (context.id_key().to_string(), self.id.clone().into()),
///             ("label".to_string(), Value::from(self.label.as_str())),
///         ]))
///     }
/// }
///
/// assert_eq!(Tag::collection_name(), "tag");
/// ```
pub trait Entity: Sized {
    /// Returns the name of the collection this type is stored in.
    ///
    /// Must be stable: it drives default join keys and pivot ordering.
    fn collection_name() -> Cow<'static, str>;

    /// Returns the identifier, or `None` before the entity is persisted.
    fn id(&self) -> Option<&Value>;

    /// Replaces the identifier.
    fn set_id(&mut self, id: Option<Value>);

    /// Constructs the entity from a decoded driver record.
    ///
    /// Value errors returned from here are reported by the query engine as
    /// decode failures for this entity's collection.
    fn from_value(value: &Value, context: &Context) -> CoreResult<Self>;

    /// Serializes the entity to a generic record.
    fn to_value(&self, context: &Context) -> CoreResult<Value>;

    /// Checks that the type can be queried at all.
    ///
    /// Called whenever a query for the type is built.
    fn validate() -> CoreResult<()> {
        Ok(())
    }
}

/// Runtime handle for an entity type.
///
/// Stands in for `T` wherever the type itself cannot be stored, such as in
/// the list of unions on a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKind {
    collection: Cow<'static, str>,
}

impl EntityKind {
    /// Returns the handle for `T`.
    #[must_use]
    pub fn of<T: Entity>() -> Self {
        Self {
            collection: T::collection_name(),
        }
    }

    /// Creates a handle from a bare collection name.
    #[must_use]
    pub fn named(collection: impl Into<Cow<'static, str>>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection)
    }
}

/// Decoding context handed to [`Entity::from_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    id_key: String,
}

impl Context {
    /// Creates a context for a driver using `id_key` as identifier field.
    #[must_use]
    pub fn new(id_key: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
        }
    }

    /// Returns the driver's identifier field name.
    #[must_use]
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Returns the conventional name of a column referencing `collection`.
    #[must_use]
    pub fn foreign_key(&self, collection: &str) -> String {
        foreign_key(collection, &self.id_key)
    }
}

/// Builds the conventional foreign-key column name `"<collection>_<id_key>"`.
#[must_use]
pub fn foreign_key(collection: &str, id_key: &str) -> String {
    format!("{collection}_{id_key}")
}
