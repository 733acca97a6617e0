//! # Joinery Core
//!
//! Driver-agnostic query construction and execution for typed entities.
//!
//! This crate provides:
//! - The [`Entity`] contract typed records implement
//! - [`Query`], a fluent builder for fetch/create/modify/delete operations
//! - [`Union`] descriptors joining a query to related collections
//! - [`Pivot`] entities for many-to-many relations with canonical
//!   left/right ordering
//! - The [`Driver`] contract and an in-memory reference [`MemoryDriver`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use joinery_core::{Comparison, Database, MemoryDriver, Pivot};
//!
//! let db = Database::new(MemoryDriver::new());
//!
//! let mut user = User::new("ann");
//! db.query::<User>()?.save(&mut user)?;
//!
//! let adults = db
//!     .query::<User>()?
//!     .filter("age", Comparison::GreaterThanOrEquals, 18i64)
//!     .all()?;
//!
//! db.prepare::<Pivot<User, Role>>()?;
//! let mut link = Pivot::<User, Role>::new(&user, &role)?;
//! db.query::<Pivot<User, Role>>()?.save(&mut link)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod driver;
mod entity;
mod error;
mod filter;
mod memory;
mod pivot;
mod query;
mod schema;
mod statement;
mod union;

pub use config::MemoryConfig;
pub use database::Database;
pub use driver::Driver;
pub use entity::{foreign_key, Context, Entity, EntityKind};
pub use error::{CoreError, CoreResult, DriverError, DriverResult};
pub use filter::{Comparison, Filter, Limit, Relation, Scope};
pub use memory::MemoryDriver;
pub use pivot::{pivot_name, Pivot, PivotSides};
pub use query::Query;
pub use schema::{FieldKind, Preparation, Schema, SchemaBuilder, SchemaField};
pub use statement::{Action, Statement};
pub use union::Union;

pub use joinery_value::Value;
