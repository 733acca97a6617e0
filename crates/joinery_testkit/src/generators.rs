//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use joinery_value::Value;
use proptest::prelude::*;

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating pairs of distinct collection names.
pub fn distinct_names_strategy() -> impl Strategy<Value = (String, String)> {
    (collection_name_strategy(), collection_name_strategy())
        .prop_filter("Names must differ", |(a, b)| a != b)
}

/// Strategy for generating field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating scalar values (no arrays or maps).
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        "[a-z ]{0,16}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ]
}

/// Strategy for generating flat records with unique field names.
pub fn record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(field_name_strategy(), scalar_value_strategy(), 0..6)
        .prop_map(|fields| Value::map(fields.into_iter().collect()))
}
