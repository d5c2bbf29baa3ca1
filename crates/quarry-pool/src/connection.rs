//! Backend connection abstraction
//!
//! The pools treat a connection as an opaque handle satisfying a small
//! execute/fetch/ping/rollback contract. One adapter per dialect wraps the
//! matching sqlx connection type; the pools themselves never see sqlx.
//!
//! Ownership of a [`Connection`] is exclusive and transferred: once checked
//! out of a pool, only the caller touches it until it is released.

use crate::errors::PoolResult;
use crate::types::{ConnectionId, Dialect, QueryOutcome, Row, SqlValue};
use async_trait::async_trait;
use sqlx::{Column, Connection as _, MySqlConnection, PgConnection, Row as _, SqliteConnection};

/// One backend session
#[async_trait]
pub trait BackendConnection: Send {
	fn id(&self) -> ConnectionId;

	fn dialect(&self) -> Dialect;

	/// Execute a statement, returning affected-row count and (where the
	/// backend has the concept) the last auto-increment id.
	async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<QueryOutcome>;

	/// Run a query and collect all result rows.
	async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<Vec<Row>>;

	/// Liveness probe (a round trip to the server, `SELECT 1`-equivalent).
	async fn ping(&mut self) -> PoolResult<()>;

	/// Roll back any open transaction. Errors when no transaction is open;
	/// callers that use this for session reset swallow the error.
	async fn rollback(&mut self) -> PoolResult<()>;
}

impl std::fmt::Debug for dyn BackendConnection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BackendConnection")
			.field("id", &self.id())
			.field("dialect", &self.dialect())
			.finish()
	}
}

/// Boxed connection handle as handed out by the pools
pub type Connection = Box<dyn BackendConnection>;

/// PostgreSQL adapter
pub struct PostgresHandle {
	id: ConnectionId,
	conn: PgConnection,
}

impl PostgresHandle {
	pub(crate) fn new(conn: PgConnection) -> Self {
		Self {
			id: ConnectionId::new(),
			conn,
		}
	}

	fn bind_value<'q>(
		query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
		value: &'q SqlValue,
	) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
		match value {
			SqlValue::Null => query.bind(None::<i32>),
			SqlValue::Bool(b) => query.bind(b),
			SqlValue::Int(i) => query.bind(i),
			SqlValue::Float(f) => query.bind(f),
			SqlValue::String(s) => query.bind(s),
			SqlValue::Bytes(b) => query.bind(b),
			SqlValue::Timestamp(dt) => query.bind(dt),
		}
	}

	fn convert_row(pg_row: sqlx::postgres::PgRow) -> Row {
		let mut row = Row::new();
		for column in pg_row.columns() {
			let name = column.name();
			if let Ok(value) = pg_row.try_get::<bool, _>(name) {
				row.insert(name.to_string(), SqlValue::Bool(value));
			} else if let Ok(value) = pg_row.try_get::<i64, _>(name) {
				row.insert(name.to_string(), SqlValue::Int(value));
			} else if let Ok(value) = pg_row.try_get::<i32, _>(name) {
				row.insert(name.to_string(), SqlValue::Int(value as i64));
			} else if let Ok(value) = pg_row.try_get::<f64, _>(name) {
				row.insert(name.to_string(), SqlValue::Float(value));
			} else if let Ok(value) = pg_row.try_get::<String, _>(name) {
				row.insert(name.to_string(), SqlValue::String(value));
			} else if let Ok(value) = pg_row.try_get::<Vec<u8>, _>(name) {
				row.insert(name.to_string(), SqlValue::Bytes(value));
			} else if let Ok(value) = pg_row.try_get::<chrono::DateTime<chrono::Utc>, _>(name) {
				row.insert(name.to_string(), SqlValue::Timestamp(value));
			} else if let Ok(value) = pg_row.try_get::<chrono::NaiveDateTime, _>(name) {
				row.insert(
					name.to_string(),
					SqlValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(
						value,
						chrono::Utc,
					)),
				);
			} else {
				row.insert(name.to_string(), SqlValue::Null);
			}
		}
		row
	}
}

#[async_trait]
impl BackendConnection for PostgresHandle {
	fn id(&self) -> ConnectionId {
		self.id
	}

	fn dialect(&self) -> Dialect {
		Dialect::Postgres
	}

	async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<QueryOutcome> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(&mut self.conn).await?;
		Ok(QueryOutcome {
			rows_affected: result.rows_affected(),
			last_insert_id: None,
		})
	}

	async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<Vec<Row>> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let rows = query.fetch_all(&mut self.conn).await?;
		Ok(rows.into_iter().map(Self::convert_row).collect())
	}

	async fn ping(&mut self) -> PoolResult<()> {
		self.conn.ping().await?;
		Ok(())
	}

	async fn rollback(&mut self) -> PoolResult<()> {
		sqlx::query("ROLLBACK").execute(&mut self.conn).await?;
		Ok(())
	}
}

/// MySQL/MariaDB adapter
pub struct MySqlHandle {
	id: ConnectionId,
	conn: MySqlConnection,
}

impl MySqlHandle {
	pub(crate) fn new(conn: MySqlConnection) -> Self {
		Self {
			id: ConnectionId::new(),
			conn,
		}
	}

	fn bind_value<'q>(
		query: sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>,
		value: &'q SqlValue,
	) -> sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments> {
		match value {
			SqlValue::Null => query.bind(None::<i32>),
			SqlValue::Bool(b) => query.bind(b),
			SqlValue::Int(i) => query.bind(i),
			SqlValue::Float(f) => query.bind(f),
			SqlValue::String(s) => query.bind(s),
			SqlValue::Bytes(b) => query.bind(b),
			SqlValue::Timestamp(dt) => query.bind(dt),
		}
	}

	fn convert_row(my_row: sqlx::mysql::MySqlRow) -> Row {
		let mut row = Row::new();
		for column in my_row.columns() {
			let name = column.name();
			if let Ok(value) = my_row.try_get::<bool, _>(name) {
				row.insert(name.to_string(), SqlValue::Bool(value));
			} else if let Ok(value) = my_row.try_get::<i64, _>(name) {
				row.insert(name.to_string(), SqlValue::Int(value));
			} else if let Ok(value) = my_row.try_get::<f64, _>(name) {
				row.insert(name.to_string(), SqlValue::Float(value));
			} else if let Ok(value) = my_row.try_get::<String, _>(name) {
				row.insert(name.to_string(), SqlValue::String(value));
			} else if let Ok(value) = my_row.try_get::<Vec<u8>, _>(name) {
				row.insert(name.to_string(), SqlValue::Bytes(value));
			} else if let Ok(value) = my_row.try_get::<chrono::DateTime<chrono::Utc>, _>(name) {
				row.insert(name.to_string(), SqlValue::Timestamp(value));
			} else {
				row.insert(name.to_string(), SqlValue::Null);
			}
		}
		row
	}
}

#[async_trait]
impl BackendConnection for MySqlHandle {
	fn id(&self) -> ConnectionId {
		self.id
	}

	fn dialect(&self) -> Dialect {
		Dialect::Mysql
	}

	async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<QueryOutcome> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(&mut self.conn).await?;
		Ok(QueryOutcome {
			rows_affected: result.rows_affected(),
			last_insert_id: Some(result.last_insert_id() as i64),
		})
	}

	async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<Vec<Row>> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let rows = query.fetch_all(&mut self.conn).await?;
		Ok(rows.into_iter().map(Self::convert_row).collect())
	}

	async fn ping(&mut self) -> PoolResult<()> {
		self.conn.ping().await?;
		Ok(())
	}

	async fn rollback(&mut self) -> PoolResult<()> {
		sqlx::query("ROLLBACK").execute(&mut self.conn).await?;
		Ok(())
	}
}

/// SQLite adapter (local file or in-memory)
pub struct SqliteHandle {
	id: ConnectionId,
	conn: SqliteConnection,
}

impl SqliteHandle {
	pub(crate) fn new(conn: SqliteConnection) -> Self {
		Self {
			id: ConnectionId::new(),
			conn,
		}
	}

	fn bind_value<'q>(
		query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
		value: &'q SqlValue,
	) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
		match value {
			SqlValue::Null => query.bind(None::<i32>),
			SqlValue::Bool(b) => query.bind(b),
			SqlValue::Int(i) => query.bind(i),
			SqlValue::Float(f) => query.bind(f),
			SqlValue::String(s) => query.bind(s),
			SqlValue::Bytes(b) => query.bind(b),
			SqlValue::Timestamp(dt) => query.bind(dt),
		}
	}

	// Integers first: SQLite has no real boolean column type, so decoding
	// bool ahead of i64 would fold every integer into true/false.
	fn convert_row(sq_row: sqlx::sqlite::SqliteRow) -> Row {
		let mut row = Row::new();
		for column in sq_row.columns() {
			let name = column.name();
			if let Ok(value) = sq_row.try_get::<i64, _>(name) {
				row.insert(name.to_string(), SqlValue::Int(value));
			} else if let Ok(value) = sq_row.try_get::<f64, _>(name) {
				row.insert(name.to_string(), SqlValue::Float(value));
			} else if let Ok(value) = sq_row.try_get::<String, _>(name) {
				row.insert(name.to_string(), SqlValue::String(value));
			} else if let Ok(value) = sq_row.try_get::<Vec<u8>, _>(name) {
				row.insert(name.to_string(), SqlValue::Bytes(value));
			} else {
				row.insert(name.to_string(), SqlValue::Null);
			}
		}
		row
	}
}

#[async_trait]
impl BackendConnection for SqliteHandle {
	fn id(&self) -> ConnectionId {
		self.id
	}

	fn dialect(&self) -> Dialect {
		Dialect::Sqlite
	}

	async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<QueryOutcome> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(&mut self.conn).await?;
		Ok(QueryOutcome {
			rows_affected: result.rows_affected(),
			last_insert_id: Some(result.last_insert_rowid()),
		})
	}

	async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<Vec<Row>> {
		let mut query = sqlx::query(sql);
		for param in params {
			query = Self::bind_value(query, param);
		}
		let rows = query.fetch_all(&mut self.conn).await?;
		Ok(rows.into_iter().map(Self::convert_row).collect())
	}

	async fn ping(&mut self) -> PoolResult<()> {
		self.conn.ping().await?;
		Ok(())
	}

	async fn rollback(&mut self) -> PoolResult<()> {
		sqlx::query("ROLLBACK").execute(&mut self.conn).await?;
		Ok(())
	}
}
