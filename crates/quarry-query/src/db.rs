//! Entry points bound to the global pool registry

use crate::builder::QueryBuilder;
use crate::errors::QueryResult;
use quarry_pool::registry::global;

/// Query entry point over the globally registered pools.
///
/// ```no_run
/// use quarry_query::Db;
///
/// # async fn demo() -> quarry_query::QueryResult<()> {
/// let admins = Db::table("users")?
/// 	.where_eq("role", "admin")
/// 	.order_by("name")
/// 	.get()
/// 	.await?;
/// # Ok(())
/// # }
/// ```
pub struct Db;

impl Db {
	/// Build a query against `table` on the default pool.
	pub fn table(table: &str) -> QueryResult<QueryBuilder> {
		Ok(QueryBuilder::new(global().default_pool()?, table))
	}

	/// Build a query against `table` on the named pool.
	pub fn on(pool: &str, table: &str) -> QueryResult<QueryBuilder> {
		Ok(QueryBuilder::new(global().get(pool)?, table))
	}
}
