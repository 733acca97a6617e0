//! Storage driver contract.

use crate::error::DriverResult;
use crate::schema::Schema;
use crate::statement::Statement;
use joinery_value::Value;

/// A storage driver.
///
/// Drivers own everything below the query layer: turning a [`Statement`]
/// into storage-specific syntax, executing it, connection handling, retries
/// and timeouts. The engine only reads from the driver handle.
///
/// # Invariants
///
/// - `query` returns records in the order the storage produced them
/// - create statements return the stored record (or at least its
///   identifier) as the first element
/// - `id_key` is constant for the lifetime of the driver
///
/// # Implementors
///
/// - [`crate::MemoryDriver`] - in-memory reference driver
pub trait Driver: Send + Sync {
    /// Returns the canonical identifier field name shared by collections.
    fn id_key(&self) -> &str;

    /// Executes a statement and returns the resulting records.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be executed.
    fn query(&self, statement: &Statement) -> DriverResult<Vec<Value>>;

    /// Creates a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection already exists or cannot be
    /// created.
    fn create_collection(&self, schema: &Schema) -> DriverResult<()>;

    /// Drops a collection and every record in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist.
    fn delete_collection(&self, name: &str) -> DriverResult<()>;
}
