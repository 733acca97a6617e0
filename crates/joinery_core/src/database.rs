//! Database handle.

use crate::driver::Driver;
use crate::entity::{Context, Entity};
use crate::error::CoreResult;
use crate::query::Query;
use crate::schema::{Preparation, SchemaBuilder};
use std::fmt;
use std::sync::Arc;

/// The main database handle.
///
/// `Database` pairs the query engine with a [`Driver`]. It is cheap to
/// clone; every clone and every [`Query`] built from it share the same
/// driver, which the engine only ever reads from.
///
/// # Example
///
/// ```rust,ignore
/// use joinery_core::{Database, MemoryDriver};
///
/// let db = Database::new(MemoryDriver::new());
/// let adults = db
///     .query::<User>()?
///     .filter("age", Comparison::GreaterThanOrEquals, 18i64)
///     .all()?;
/// ```
#[derive(Clone)]
pub struct Database {
    driver: Arc<dyn Driver>,
}

impl Database {
    /// Creates a database over `driver`.
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    /// Creates a database over an already shared driver.
    #[must_use]
    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Returns the driver.
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Returns the driver's identifier field name.
    #[must_use]
    pub fn id_key(&self) -> &str {
        self.driver.id_key()
    }

    /// Returns the decoding context for entities read through this database.
    #[must_use]
    pub fn context(&self) -> Context {
        Context::new(self.driver.id_key())
    }

    /// Starts a query over `T`'s collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot be queried (see [`Entity::validate`]).
    pub fn query<T: Entity>(&self) -> CoreResult<Query<T>> {
        Query::new(self.clone())
    }

    /// Creates a collection whose fields are declared by `build`.
    pub fn create_collection<F>(&self, name: &str, build: F) -> CoreResult<()>
    where
        F: FnOnce(&mut SchemaBuilder),
    {
        let mut builder = SchemaBuilder::new(name, self.id_key());
        build(&mut builder);
        self.driver.create_collection(&builder.build())?;
        Ok(())
    }

    /// Drops a collection and all of its records.
    pub fn delete_collection(&self, name: &str) -> CoreResult<()> {
        self.driver.delete_collection(name)?;
        Ok(())
    }

    /// Runs `P`'s preparation against this database.
    pub fn prepare<P: Preparation>(&self) -> CoreResult<()> {
        P::prepare(self)
    }

    /// Reverts `P`'s preparation against this database.
    pub fn revert<P: Preparation>(&self) -> CoreResult<()> {
        P::revert(self)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("id_key", &self.id_key())
            .finish_non_exhaustive()
    }
}
