use quarry_pool::{
	ConnectionScope, PoolConfig, PoolFactory, PoolStrategy, SharedPool, SqlValue,
};
use quarry_schema::{Column, ColumnType, Schema, SchemaError, SchemaManager, Table};

async fn memory_pool() -> SharedPool {
	let config = PoolConfig::new("sqlite::memory:").with_strategy(PoolStrategy::Single);
	PoolFactory::create("schema-tests", &config).await.unwrap()
}

fn blog_schema() -> Schema {
	Schema::new()
		.table(
			Table::new("users")
				.column(Column::id())
				.column(Column::new("name", ColumnType::String))
				.column(Column::new("email", ColumnType::String).unique()),
		)
		.table(
			Table::new("posts")
				.column(Column::id())
				.column(Column::new("title", ColumnType::String))
				.column(Column::new("body", ColumnType::Text).nullable())
				.column(Column::new("user_id", ColumnType::Integer).references("users", "id")),
		)
}

#[tokio::test]
async fn test_create_all_then_insert() {
	let pool = memory_pool().await;
	let manager = SchemaManager::new(pool.clone());
	manager.create_all(&blog_schema()).await.unwrap();

	let mut scope = ConnectionScope::acquire(pool).await.unwrap();
	scope
		.execute(
			"INSERT INTO users (name, email) VALUES (?, ?)",
			&[SqlValue::from("ada"), SqlValue::from("ada@example.com")],
		)
		.await
		.unwrap();
	scope
		.execute(
			"INSERT INTO posts (title, user_id) VALUES (?, ?)",
			&[SqlValue::from("hello"), SqlValue::from(1i64)],
		)
		.await
		.unwrap();
	let rows = scope
		.fetch_all(
			"SELECT posts.title FROM posts INNER JOIN users ON users.id = posts.user_id",
			&[],
		)
		.await
		.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get_str("title"), Some("hello"));
	scope.release().await;
}

#[tokio::test]
async fn test_create_all_is_idempotent() {
	let pool = memory_pool().await;
	let manager = SchemaManager::new(pool);
	let schema = blog_schema();
	manager.create_all(&schema).await.unwrap();
	manager.create_all(&schema).await.unwrap();
}

#[tokio::test]
async fn test_drop_all_removes_tables() {
	let pool = memory_pool().await;
	let manager = SchemaManager::new(pool.clone());
	let schema = blog_schema();
	manager.create_all(&schema).await.unwrap();
	manager.drop_all(&schema).await.unwrap();

	let mut scope = ConnectionScope::acquire(pool).await.unwrap();
	assert!(scope.fetch_all("SELECT * FROM users", &[]).await.is_err());
	scope.release().await;
}

#[tokio::test]
async fn test_invalid_schema_applies_nothing() {
	let pool = memory_pool().await;
	let manager = SchemaManager::new(pool.clone());
	let schema = Schema::new().table(Table::new("empty"));
	assert!(matches!(
		manager.create_all(&schema).await,
		Err(SchemaError::InvalidSchema(_))
	));
}

#[test]
fn test_schema_loads_from_toml() {
	let raw = r#"
		[[tables]]
		name = "users"

		[[tables.columns]]
		name = "id"
		type = "id"

		[[tables.columns]]
		name = "role"
		type = "enum"
		values = ["admin", "member"]

		[[tables.columns]]
		name = "age"
		type = "integer"
		nullable = true
	"#;
	let schema = Schema::from_toml_str(raw).unwrap();
	assert_eq!(schema.tables.len(), 1);
	let table = &schema.tables[0];
	assert_eq!(table.name, "users");
	assert_eq!(table.columns[0].column_type, ColumnType::Id);
	assert_eq!(table.columns[1].values, vec!["admin", "member"]);
	assert!(table.columns[2].nullable);
}

#[test]
fn test_schema_toml_rejects_enum_without_values() {
	let raw = r#"
		[[tables]]
		name = "users"

		[[tables.columns]]
		name = "role"
		type = "enum"
	"#;
	assert!(matches!(
		Schema::from_toml_str(raw),
		Err(SchemaError::InvalidColumn(_, _))
	));
}
