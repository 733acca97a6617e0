//! Collection schemas and preparations.

use crate::database::Database;
use crate::error::CoreResult;

/// Storage kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The collection's identifier column.
    Id,
    /// Integer column.
    Int,
    /// Text column.
    Text,
    /// Boolean column.
    Bool,
    /// Floating point column.
    Float,
    /// Binary column.
    Bytes,
}

/// A single field of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Field name.
    pub name: String,
    /// Storage kind.
    pub kind: FieldKind,
}

/// Description of a collection to be created by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Collection name.
    pub collection: String,
    /// Fields in declaration order.
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Returns the field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Accumulates the fields of a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
    id_key: String,
}

impl SchemaBuilder {
    /// Creates a builder for `collection` on a driver using `id_key`.
    #[must_use]
    pub fn new(collection: impl Into<String>, id_key: impl Into<String>) -> Self {
        Self {
            schema: Schema {
                collection: collection.into(),
                fields: Vec::new(),
            },
            id_key: id_key.into(),
        }
    }

    fn push(&mut self, name: impl Into<String>, kind: FieldKind) -> &mut Self {
        self.schema.fields.push(SchemaField {
            name: name.into(),
            kind,
        });
        self
    }

    /// Adds the identifier column, named after the driver's id key.
    pub fn id(&mut self) -> &mut Self {
        let name = self.id_key.clone();
        self.push(name, FieldKind::Id)
    }

    /// Adds an integer column.
    pub fn int(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name, FieldKind::Int)
    }

    /// Adds a text column.
    pub fn text(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name, FieldKind::Text)
    }

    /// Adds a boolean column.
    pub fn bool(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name, FieldKind::Bool)
    }

    /// Adds a floating point column.
    pub fn float(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name, FieldKind::Float)
    }

    /// Adds a binary column.
    pub fn bytes(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(name, FieldKind::Bytes)
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        self.schema
    }
}

/// Types that know how to set up and tear down their own storage.
pub trait Preparation {
    /// Creates whatever storage the type needs.
    fn prepare(database: &Database) -> CoreResult<()>;

    /// Removes the storage created by [`Preparation::prepare`].
    fn revert(database: &Database) -> CoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let mut builder = SchemaBuilder::new("user", "id");
        builder.id().text("name").int("age").bool("admin");
        let schema = builder.build();

        assert_eq!(schema.collection, "user");
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "age", "admin"]);
        assert_eq!(schema.field("age").map(|f| f.kind), Some(FieldKind::Int));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn id_column_uses_driver_key() {
        let mut builder = SchemaBuilder::new("doc", "_id");
        builder.id().float("score").bytes("blob");
        let schema = builder.build();

        assert_eq!(schema.fields[0].name, "_id");
        assert_eq!(schema.fields[0].kind, FieldKind::Id);
        assert_eq!(schema.fields[2].kind, FieldKind::Bytes);
    }
}
