//! Dynamic value type.

use crate::convert::FromValue;
use crate::error::{ValueError, ValueResult};
use std::cmp::Ordering;

/// A dynamic value.
///
/// This is the currency between entities, queries and drivers. Maps are
/// field-keyed structures whose keys are kept sorted and unique when built
/// through [`Value::map`] or mutated through [`Value::insert`]. A
/// `Value::Map` written out by hand may hold keys in any order; lookups and
/// inserts still find the one entry for a key, but equality between maps
/// is only meaningful when both are sorted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (supports full i64 range).
    Integer(i64),
    /// Double precision float.
    Float(f64),
    /// Text string (UTF-8).
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Array of values.
    Array(Vec<Value>),
    /// Field-keyed structure. Prefer [`Value::map`] to build one.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Create a map value with sorted, unique keys.
    ///
    /// When a key appears more than once the last occurrence wins.
    pub fn map(pairs: Vec<(String, Value)>) -> Self {
        let mut out = Value::Map(Vec::with_capacity(pairs.len()));
        for (key, value) in pairs {
            out.insert(key, value);
        }
        out
    }

    /// Create an empty map value.
    pub fn empty_map() -> Self {
        Value::Map(Vec::new())
    }

    /// Returns a short name for the kind of this value.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a field-keyed structure.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float. Integers are widened.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a field in this map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Sets a field on this map value, replacing any previous value.
    ///
    /// Returns the previous value of the field, if any. Inserting into a
    /// non-map value is a no-op. New keys go before the first greater key,
    /// so a sorted map stays sorted.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let Value::Map(pairs) = self else {
            return None;
        };
        let key = key.into();
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        let pos = pairs
            .iter()
            .position(|(k, _)| *k > key)
            .unwrap_or(pairs.len());
        pairs.insert(pos, (key, value));
        None
    }

    /// Removes a field from this map value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Map(pairs) => {
                let pos = pairs.iter().position(|(k, _)| k == key)?;
                Some(pairs.remove(pos).1)
            }
            _ => None,
        }
    }

    /// Extracts a required field.
    ///
    /// Absent and null fields are reported as missing.
    pub fn extract<T: FromValue>(&self, field: &str) -> ValueResult<T> {
        match self.extract_optional(field)? {
            Some(value) => Ok(value),
            None => Err(ValueError::missing_field(field)),
        }
    }

    /// Extracts an optional field.
    ///
    /// Absent and null fields both yield `None`.
    pub fn extract_optional<T: FromValue>(&self, field: &str) -> ValueResult<Option<T>> {
        if !self.is_map() {
            return Err(ValueError::NotAMap { found: self.kind() });
        }
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| ValueError::type_mismatch(field, T::EXPECTED, value.kind())),
        }
    }

    /// Overlays `overlay` onto this value.
    ///
    /// Two maps are merged field by field with `overlay` winning. In every
    /// other combination `overlay` replaces this value, except that a null
    /// overlay leaves it untouched.
    pub fn merge(&self, overlay: &Value) -> Value {
        match (self, overlay) {
            (Value::Map(_), Value::Map(fields)) => {
                let mut merged = self.clone();
                for (key, value) in fields {
                    merged.insert(key.clone(), value.clone());
                }
                merged
            }
            (_, Value::Null) => self.clone(),
            _ => overlay.clone(),
        }
    }

    /// Compares two scalar values.
    ///
    /// Integers and floats compare numerically with each other, text and
    /// bytes lexicographically, booleans with `false < true`. Values from
    /// different families, and containers, are unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}
