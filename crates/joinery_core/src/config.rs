//! In-memory driver configuration.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::MemoryDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Identifier field name used by every collection.
    pub id_key: String,

    /// Whether statements against collections that were never created
    /// through a schema are rejected. When false, collections appear on
    /// their first create and read as empty before that.
    pub require_schema: bool,

    /// First identifier handed out in a new collection.
    pub first_id: i64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            id_key: "id".to_string(),
            require_schema: false,
            first_id: 1,
        }
    }
}

impl MemoryConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::invalid_configuration(format!("memory driver config: {e}")))
    }

    /// Sets the identifier field name.
    #[must_use]
    pub fn id_key(mut self, id_key: impl Into<String>) -> Self {
        self.id_key = id_key.into();
        self
    }

    /// Sets whether collections must be created before use.
    #[must_use]
    pub const fn require_schema(mut self, value: bool) -> Self {
        self.require_schema = value;
        self
    }

    /// Sets the first identifier handed out per collection.
    #[must_use]
    pub const fn first_id(mut self, value: i64) -> Self {
        self.first_id = value;
        self
    }
}
