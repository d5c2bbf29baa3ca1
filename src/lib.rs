//! # Quarry
//!
//! A database client runtime for Rust: named, independently configured
//! connection pools with interchangeable pooling strategies, a scoped
//! acquisition guard, and the mechanical collaborators that ride on top of
//! them (fluent query builder, schema DDL generation, entity mapping and a
//! small CLI).
//!
//! The pooling subsystem is the heart of the project. Everything else talks
//! to the database exclusively through [`pool::PoolRegistry`] →
//! [`pool::DatabasePool::acquire`] / `release`, or through the
//! [`pool::ConnectionScope`] guard which guarantees exactly-once release.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use quarry::pool::{DatabaseConfig, PoolConfig, PoolStrategy, global};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::new()
//! 	.with_pool(
//! 		"primary",
//! 		PoolConfig::new("sqlite://quarry.db").with_strategy(PoolStrategy::Queue),
//! 	)
//! 	.with_default("primary");
//!
//! global().initialize(&config).await?;
//!
//! let rows = quarry::query::Db::table("users")?
//! 	.where_eq("active", true)
//! 	.get()
//! 	.await?;
//! # Ok(())
//! # }
//! ```

pub use quarry_entity as entity;
pub use quarry_pool as pool;
pub use quarry_query as query;
pub use quarry_schema as schema;

/// Re-export of commonly used types
pub mod prelude {
	pub use quarry_entity::{Collection, Entity};
	pub use quarry_pool::{
		ConnectionScope, DatabaseConfig, DatabasePool, PoolConfig, PoolError, PoolRegistry,
		PoolStats, PoolStrategy, global,
	};
	pub use quarry_query::{Db, QueryBuilder};
	pub use quarry_schema::{Column, ColumnType, Schema, SchemaManager, Table};
}
