//! Test fixtures and database helpers.
//!
//! Provides a handful of ready-made entities and convenience functions
//! for setting up test databases over the in-memory driver.

use joinery_core::{Context, CoreResult, Database, Entity, MemoryConfig, MemoryDriver};
use joinery_value::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// A person. Stored in `user`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Identifier, assigned on first save.
    pub id: Option<Value>,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
}

impl User {
    /// Creates an unsaved user.
    pub fn new(name: &str, age: i64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            age,
        }
    }
}

impl Entity for User {
    fn collection_name() -> Cow<'static, str> {
        Cow::Borrowed("user")
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
            name: value.extract("name")?,
            age: value.extract("age")?,
        })
    }

    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        Ok(Value::map(vec![
            (context.id_key().to_string(), self.id.clone().into()),
            ("name".to_string(), Value::from(self.name.as_str())),
            ("age".to_string(), Value::from(self.age)),
        ]))
    }
}

/// A named permission set. Stored in `role`.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    /// Identifier, assigned on first save.
    pub id: Option<Value>,
    /// Role name.
    pub name: String,
}

impl Role {
    /// Creates an unsaved role.
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }
}

impl Entity for Role {
    fn collection_name() -> Cow<'static, str> {
        Cow::Borrowed("role")
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
            name: value.extract("name")?,
        })
    }

    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        Ok(Value::map(vec![
            (context.id_key().to_string(), self.id.clone().into()),
            ("name".to_string(), Value::from(self.name.as_str())),
        ]))
    }
}

/// A pet owned by a [`User`] through `user_<id key>`. Stored in `pet`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    /// Identifier, assigned on first save.
    pub id: Option<Value>,
    /// Pet name.
    pub name: String,
    /// Owner's identifier.
    pub user_id: Option<Value>,
}

impl Pet {
    /// Creates an unsaved pet belonging to `owner`.
    pub fn new(name: &str, owner: &User) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            user_id: owner.id.clone(),
        }
    }
}

impl Entity for Pet {
    fn collection_name() -> Cow<'static, str> {
        Cow::Borrowed("pet")
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
            name: value.extract("name")?,
            user_id: value.extract_optional(&context.foreign_key(&User::collection_name()))?,
        })
    }

    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        Ok(Value::map(vec![
            (context.id_key().to_string(), self.id.clone().into()),
            ("name".to_string(), Value::from(self.name.as_str())),
            (
                context.foreign_key(&User::collection_name()),
                self.user_id.clone().into(),
            ),
        ]))
    }
}

/// A test database over its own in-memory driver.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The driver, for inspecting storage directly.
    pub driver: Arc<MemoryDriver>,
}

impl TestDatabase {
    /// Creates a new in-memory test database with default configuration.
    pub fn memory() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    /// Creates a new in-memory test database with custom configuration.
    pub fn with_config(config: MemoryConfig) -> Self {
        let driver = Arc::new(MemoryDriver::with_config(config));
        Self {
            db: Database::with_driver(driver.clone()),
            driver,
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test function with a fresh in-memory database.
///
/// Panics if the closure returns an error.
pub fn with_temp_db<F>(f: F)
where
    F: FnOnce(&Database) -> CoreResult<()>,
{
    let db = TestDatabase::memory();
    f(&db.db).expect("Test failed");
}

/// Saves `user` and returns it with its assigned identifier.
pub fn saved_user(db: &Database, name: &str, age: i64) -> User {
    let mut user = User::new(name, age);
    db.query::<User>()
        .and_then(|query| query.save(&mut user))
        .expect("Failed to save user");
    user
}

/// Common test scenarios.
pub mod scenarios {
    use super::*;

    /// Saves three users (ann 31, bob 17, cat 45) and a pet for ann and
    /// for cat.
    pub fn household(db: &Database) -> (Vec<User>, Vec<Pet>) {
        let users = vec![
            saved_user(db, "ann", 31),
            saved_user(db, "bob", 17),
            saved_user(db, "cat", 45),
        ];

        let mut pets = vec![Pet::new("rex", &users[0]), Pet::new("kit", &users[2])];
        for pet in &mut pets {
            db.query::<Pet>()
                .and_then(|query| query.save(pet))
                .expect("Failed to save pet");
        }

        (users, pets)
    }
}
