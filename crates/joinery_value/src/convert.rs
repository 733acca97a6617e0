//! Conversions out of [`Value`].

use crate::value::Value;

/// Types that can be read back out of a [`Value`].
///
/// Used by [`Value::extract`] and [`Value::extract_optional`]. Returning
/// `None` signals a kind mismatch; the caller turns it into a
/// [`crate::ValueError::TypeMismatch`] naming [`FromValue::EXPECTED`].
pub trait FromValue: Sized {
    /// Name of the value kind this type is read from.
    const EXPECTED: &'static str;

    /// Converts a value, or returns `None` if it has the wrong kind.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer()
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|n| i32::try_from(n).ok())
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|n| u32::try_from(n).ok())
    }
}

impl FromValue for u64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|n| u64::try_from(n).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_integers_rejects_out_of_range() {
        assert_eq!(i32::from_value(&Value::Integer(7)), Some(7));
        assert_eq!(i32::from_value(&Value::Integer(i64::MAX)), None);
        assert_eq!(u32::from_value(&Value::Integer(-1)), None);
        assert_eq!(u64::from_value(&Value::Integer(12)), Some(12));
    }

    #[test]
    fn float_accepts_integers() {
        assert_eq!(f64::from_value(&Value::Integer(3)), Some(3.0));
        assert_eq!(f64::from_value(&Value::Float(0.5)), Some(0.5));
        assert_eq!(f64::from_value(&Value::Text("1".into())), None);
    }

    #[test]
    fn value_accepts_anything() {
        assert_eq!(Value::from_value(&Value::Null), Some(Value::Null));
        assert_eq!(
            Value::from_value(&Value::Array(vec![Value::Bool(true)])),
            Some(Value::Array(vec![Value::Bool(true)]))
        );
    }
}
