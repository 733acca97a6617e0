//! # Joinery Value
//!
//! Generic value representation for Joinery.
//!
//! Every piece of data that crosses the boundary between typed entities,
//! the query engine and a storage driver is a [`Value`]: filter operands,
//! create/modify payloads and the records a driver hands back.
//!
//! The engine itself only needs two capabilities from a value:
//! - detecting whether it is a field-keyed structure ([`Value::is_map`])
//! - extracting a field from it ([`Value::get`], [`Value::extract`])
//!
//! ## Usage
//!
//! ```
//! use joinery_value::Value;
//!
//! let record = Value::map(vec![
//!     ("name".to_string(), Value::from("Alice")),
//!     ("id".to_string(), Value::from(7i64)),
//! ]);
//!
//! assert!(record.is_map());
//! let name: String = record.extract("name").unwrap();
//! assert_eq!(name, "Alice");
//! assert_eq!(record.get("id"), Some(&Value::Integer(7)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod convert;
mod error;
mod json;
mod value;

pub use convert::FromValue;
pub use error::{ValueError, ValueResult};
pub use value::Value;
