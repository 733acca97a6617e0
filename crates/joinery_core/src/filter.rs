//! Filters and limits.
//!
//! Plain data describing which records a statement applies to. Drivers
//! give them meaning; nothing here validates field names.

use joinery_value::Value;
use std::fmt;

/// Comparison operator of a [`Filter::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `field == value`
    Equals,
    /// `field != value`
    NotEquals,
    /// `field > value`
    GreaterThan,
    /// `field < value`
    LessThan,
    /// `field >= value`
    GreaterThanOrEquals,
    /// `field <= value`
    LessThanOrEquals,
    /// Text field starts with the value.
    HasPrefix,
    /// Text field ends with the value.
    HasSuffix,
    /// Text field contains the value.
    Contains,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparison::Equals => "=",
            Comparison::NotEquals => "!=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterThanOrEquals => ">=",
            Comparison::LessThanOrEquals => "<=",
            Comparison::HasPrefix => "prefix",
            Comparison::HasSuffix => "suffix",
            Comparison::Contains => "contains",
        };
        f.write_str(symbol)
    }
}

/// Membership test of a [`Filter::Subset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Field value is one of the listed values.
    In,
    /// Field value is none of the listed values.
    NotIn,
}

/// How the members of a [`Filter::Group`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Every member must match.
    And,
    /// At least one member must match.
    Or,
}

/// A predicate over a record.
///
/// Field names may be qualified as `"<collection>.<field>"` to address a
/// collection joined through a union.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Compares a field against a value.
    Compare {
        /// Field name.
        field: String,
        /// Operator.
        comparison: Comparison,
        /// Right-hand operand.
        value: Value,
    },
    /// Tests a field for membership in a list.
    Subset {
        /// Field name.
        field: String,
        /// Membership test.
        scope: Scope,
        /// Candidate values.
        values: Vec<Value>,
    },
    /// Combines nested filters.
    Group {
        /// Combination rule.
        relation: Relation,
        /// Members, in declaration order.
        filters: Vec<Filter>,
    },
}

impl Filter {
    /// Creates a comparison filter.
    pub fn compare(field: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Filter::Compare {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Creates a membership filter.
    pub fn subset(field: impl Into<String>, scope: Scope, values: Vec<Value>) -> Self {
        Filter::Subset {
            field: field.into(),
            scope,
            values,
        }
    }

    /// Creates a group filter.
    pub fn group(relation: Relation, filters: Vec<Filter>) -> Self {
        Filter::Group { relation, filters }
    }

    /// Returns the field a leaf filter applies to, `None` for groups.
    pub fn field(&self) -> Option<&str> {
        match self {
            Filter::Compare { field, .. } | Filter::Subset { field, .. } => Some(field),
            Filter::Group { .. } => None,
        }
    }
}

/// Cap on the number of records a statement touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limit {
    /// Maximum number of records.
    pub count: usize,
}

impl Limit {
    /// Creates a limit of `count` records.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}
