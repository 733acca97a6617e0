//! # Joinery Testkit
//!
//! Test utilities for Joinery.
//!
//! This crate provides:
//! - Fixture entities (`User`, `Role`, `Pet`) and in-memory test databases
//! - A recording driver that captures every statement a query hands over
//! - Property-based test generators using proptest
//! - Tracing setup for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use joinery_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_database() {
//!     with_temp_db(|db| {
//!         let mut user = User::new("ann", 31);
//!         db.query::<User>()?.save(&mut user)?;
//!         Ok(())
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::init_tracing;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use generators::*;
pub use recording::*;

/// Installs a `tracing` subscriber honouring `RUST_LOG`, once per process.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
