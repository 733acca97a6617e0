//! Error types for Joinery core.

use joinery_value::ValueError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by a storage driver.
///
/// The engine propagates these unchanged; it never retries or translates
/// them.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The statement targets a collection the driver does not know.
    #[error("collection not found: {name}")]
    CollectionNotFound {
        /// Name of the collection.
        name: String,
    },

    /// A collection with this name already exists.
    #[error("collection already exists: {name}")]
    CollectionExists {
        /// Name of the collection.
        name: String,
    },

    /// The driver cannot execute this kind of statement.
    #[error("unsupported by driver: {message}")]
    Unsupported {
        /// Description of what is unsupported.
        message: String,
    },

    /// Any other backend failure (connectivity, constraints, syntax).
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl DriverError {
    /// Creates a collection not found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound { name: name.into() }
    }

    /// Creates a collection exists error.
    pub fn collection_exists(name: impl Into<String>) -> Self {
        Self::CollectionExists { name: name.into() }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates a generic backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors that can occur in Joinery core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The driver failed to execute a statement.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// A driver record could not be turned into the target entity.
    #[error("failed to decode {entity}: {source}")]
    Decode {
        /// Collection of the entity being decoded.
        entity: String,
        /// The underlying field error.
        #[source]
        source: ValueError,
    },

    /// A value could not be read or built.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The entity setup cannot be used (e.g. a pivot over two entities
    /// sharing one collection name).
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a decode error for the given collection.
    pub fn decode(entity: impl Into<String>, source: ValueError) -> Self {
        Self::Decode {
            entity: entity.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
