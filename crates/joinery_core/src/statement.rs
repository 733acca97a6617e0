//! Driver-facing description of one storage operation.

use crate::filter::{Filter, Limit};
use crate::union::Union;
use joinery_value::Value;
use std::fmt;

/// What a statement does to its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Read matching records.
    #[default]
    Fetch,
    /// Insert `data` as a new record.
    Create,
    /// Overlay `data` onto every matching record.
    Modify,
    /// Remove every matching record.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Fetch => "fetch",
            Action::Create => "create",
            Action::Modify => "modify",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Everything a driver needs to execute one operation.
///
/// Filters combine with AND in list order; unions apply in declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The operation.
    pub action: Action,
    /// Target collection.
    pub entity: String,
    /// Predicates restricting the affected records.
    pub filters: Vec<Filter>,
    /// Payload for create and modify.
    pub data: Option<Value>,
    /// Cap on affected records.
    pub limit: Option<Limit>,
    /// Joined collections.
    pub unions: Vec<Union>,
}

impl Statement {
    /// Creates a fetch over the whole of `entity`.
    #[must_use]
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            action: Action::Fetch,
            entity: entity.into(),
            filters: Vec::new(),
            data: None,
            limit: None,
            unions: Vec::new(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {} filters", self.action, self.entity, self.filters.len())
    }
}
