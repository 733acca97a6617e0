//! Error types for value extraction.

use thiserror::Error;

/// Result type for value operations.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors that can occur while reading fields out of a [`crate::Value`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A required field was absent (or null).
    #[error("missing field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A field was present but held a value of the wrong kind.
    #[error("type mismatch for field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the offending field.
        field: String,
        /// The kind that was expected.
        expected: &'static str,
        /// The kind that was found.
        found: &'static str,
    },

    /// Field access was attempted on something that is not a map.
    #[error("expected a map, found {found}")]
    NotAMap {
        /// The kind that was found.
        found: &'static str,
    },
}

impl ValueError {
    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found,
        }
    }
}
