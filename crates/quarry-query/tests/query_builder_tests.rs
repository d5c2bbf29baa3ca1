use quarry_pool::{
	ConnectionScope, Dialect, PoolConfig, PoolFactory, PoolStrategy, SharedPool, SqlValue,
	global,
};
use quarry_query::{Db, QueryBuilder};
use serial_test::serial;

async fn memory_pool() -> SharedPool {
	let config = PoolConfig::new("sqlite::memory:").with_strategy(PoolStrategy::Single);
	PoolFactory::create("query-tests", &config).await.unwrap()
}

async fn seeded_pool() -> SharedPool {
	let pool = memory_pool().await;
	let mut scope = ConnectionScope::acquire(pool.clone()).await.unwrap();
	scope
		.execute(
			"CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, role TEXT, age INTEGER)",
			&[],
		)
		.await
		.unwrap();
	for (name, role, age) in [
		("ada", "admin", 36),
		("grace", "admin", 45),
		("alan", "member", 41),
	] {
		scope
			.execute(
				"INSERT INTO users (name, role, age) VALUES (?, ?, ?)",
				&[SqlValue::from(name), SqlValue::from(role), SqlValue::from(age as i64)],
			)
			.await
			.unwrap();
	}
	scope.release().await;
	pool
}

#[tokio::test]
async fn test_select_rendering() {
	let pool = memory_pool().await;
	let sql = QueryBuilder::new(pool.clone(), "users")
		.select(["id", "name"])
		.where_eq("role", "admin")
		.or_where_op("age", ">", 40i64)
		.order_by_desc("age")
		.limit(10)
		.offset(5)
		.to_sql(Dialect::Sqlite);
	assert_eq!(
		sql,
		"SELECT id, name FROM users WHERE role = ? OR age > ? ORDER BY age DESC LIMIT 10 OFFSET 5"
	);

	let sql = QueryBuilder::new(pool, "users")
		.where_eq("role", "admin")
		.where_in("id", [1i64, 2, 3])
		.to_sql(Dialect::Postgres);
	assert_eq!(
		sql,
		"SELECT * FROM users WHERE role = $1 AND id IN ($2, $3, $4)"
	);
}

#[tokio::test]
async fn test_join_group_and_null_rendering() {
	let pool = memory_pool().await;
	let sql = QueryBuilder::new(pool.clone(), "users")
		.select(["users.role", "COUNT(*) AS n"])
		.left_join("posts", "posts.user_id", "users.id")
		.where_not_null("users.name")
		.group_by("users.role")
		.to_sql(Dialect::Sqlite);
	assert_eq!(
		sql,
		"SELECT users.role, COUNT(*) AS n FROM users \
		 LEFT JOIN posts ON posts.user_id = users.id \
		 WHERE users.name IS NOT NULL GROUP BY users.role"
	);

	let sql = QueryBuilder::new(pool, "users")
		.where_in("id", Vec::<i64>::new())
		.to_sql(Dialect::Sqlite);
	assert_eq!(sql, "SELECT * FROM users WHERE 1 = 0");
}

#[tokio::test]
async fn test_get_first_count_exists() {
	let pool = seeded_pool().await;

	let admins = QueryBuilder::new(pool.clone(), "users")
		.where_eq("role", "admin")
		.order_by("name")
		.get()
		.await
		.unwrap();
	assert_eq!(admins.len(), 2);
	assert_eq!(admins[0].get_str("name"), Some("ada"));

	let first = QueryBuilder::new(pool.clone(), "users")
		.order_by_desc("age")
		.first()
		.await
		.unwrap()
		.unwrap();
	assert_eq!(first.get_str("name"), Some("grace"));

	let count = QueryBuilder::new(pool.clone(), "users")
		.where_op("age", ">", 40i64)
		.count()
		.await
		.unwrap();
	assert_eq!(count, 2);

	assert!(
		QueryBuilder::new(pool.clone(), "users")
			.where_eq("name", "ada")
			.exists()
			.await
			.unwrap()
	);
	assert!(
		!QueryBuilder::new(pool, "users")
			.where_eq("name", "nobody")
			.exists()
			.await
			.unwrap()
	);
}

#[tokio::test]
async fn test_insert_update_delete() {
	let pool = seeded_pool().await;

	let outcome = QueryBuilder::new(pool.clone(), "users")
		.insert([
			("name", SqlValue::from("edsger")),
			("role", SqlValue::from("member")),
			("age", SqlValue::from(52i64)),
		])
		.await
		.unwrap();
	assert_eq!(outcome.rows_affected, 1);
	assert_eq!(outcome.last_insert_id, Some(4));

	let updated = QueryBuilder::new(pool.clone(), "users")
		.where_eq("role", "member")
		.update([("role", SqlValue::from("contributor"))])
		.await
		.unwrap();
	assert_eq!(updated, 2);

	let deleted = QueryBuilder::new(pool.clone(), "users")
		.where_eq("role", "contributor")
		.delete()
		.await
		.unwrap();
	assert_eq!(deleted, 2);

	let remaining = QueryBuilder::new(pool, "users").count().await.unwrap();
	assert_eq!(remaining, 2);
}

#[tokio::test]
async fn test_connection_goes_back_after_each_statement() {
	let pool = seeded_pool().await;

	for _ in 0..5 {
		QueryBuilder::new(pool.clone(), "users").count().await.unwrap();
	}
	let stats = pool.stats().await;
	assert_eq!(stats.current_connections, 1);
	assert_eq!(stats.idle_connections, 1);
}

#[tokio::test]
#[serial]
async fn test_db_entry_points_use_the_registry() {
	global().close_all().await;
	global().register("main", seeded_pool().await);

	let count = Db::table("users").unwrap().count().await.unwrap();
	assert_eq!(count, 3);

	let named = Db::on("main", "users")
		.unwrap()
		.where_eq("role", "admin")
		.count()
		.await
		.unwrap();
	assert_eq!(named, 2);

	assert!(Db::on("missing", "users").is_err());
	global().close_all().await;
}
