//! Declarative schema model and DDL generation for the Quarry pools.
//!
//! Tables are declared in TOML (or built programmatically), rendered to
//! dialect-specific `CREATE TABLE` statements and applied through a pool.

pub mod column;
pub mod errors;
pub mod generator;
pub mod manager;

pub use column::{Column, ColumnType, ForeignRef, Schema, Table};
pub use errors::{SchemaError, SchemaResult};
pub use generator::SqlGenerator;
pub use manager::SchemaManager;
