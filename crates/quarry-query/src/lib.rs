//! Fluent SQL builder for the Quarry pools.
//!
//! Every terminal operation checks a connection out of the pool for exactly
//! the duration of one statement and returns it on all paths.

pub mod builder;
pub mod db;
pub mod errors;

pub use builder::QueryBuilder;
pub use db::Db;
pub use errors::{QueryError, QueryResult};
