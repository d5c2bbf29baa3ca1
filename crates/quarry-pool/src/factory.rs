//! Connection creation, validation and reset
//!
//! Pools depend on the [`Connector`] trait, never on sqlx directly, so test
//! suites can swap in stub connectors with failure injection.

use crate::connection::{Connection, MySqlHandle, PostgresHandle, SqliteHandle};
use crate::errors::PoolResult;
use crate::types::Dialect;
use crate::uri::{ConnectionInfo, SqliteTarget};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::debug;

/// Source of backend connections for a pool
#[async_trait]
pub trait Connector: Send + Sync {
	/// Open a fresh connection, fully initialized for pooled use.
	async fn connect(&self) -> PoolResult<Connection>;

	/// Check that a pooled connection is still usable. A `false` here means
	/// the pool discards the connection; it is never surfaced as an error.
	async fn validate(&self, conn: &mut Connection) -> bool;

	/// Clear session state before a connection goes back to the idle set.
	/// Best effort: failures are logged and otherwise ignored (a broken
	/// connection is caught by the next `validate`).
	async fn reset(&self, conn: &mut Connection);

	fn dialect(&self) -> Dialect;

	/// Log-safe endpoint description (passwords masked).
	fn describe(&self) -> String;
}

/// Production [`Connector`] backed by sqlx raw connections
pub struct ConnectionFactory {
	info: ConnectionInfo,
}

impl ConnectionFactory {
	pub fn new(info: ConnectionInfo) -> Self {
		Self { info }
	}

	pub fn from_url(url: &str) -> PoolResult<Self> {
		Ok(Self::new(ConnectionInfo::parse(url)?))
	}

	async fn connect_postgres(&self) -> PoolResult<Connection> {
		let mut options = PgConnectOptions::new()
			.host(&self.info.host)
			.port(self.info.port)
			.database(&self.info.database);
		if !self.info.username.is_empty() {
			options = options.username(&self.info.username);
		}
		if let Some(password) = &self.info.password {
			options = options.password(password);
		}
		let mut conn = options.connect().await?;
		// Pooled sessions always run in UTC so timestamp round trips are
		// independent of which connection serves a query.
		sqlx::query("SET TIME ZONE 'UTC'").execute(&mut conn).await?;
		Ok(Box::new(PostgresHandle::new(conn)))
	}

	async fn connect_mysql(&self) -> PoolResult<Connection> {
		let mut options = MySqlConnectOptions::new()
			.host(&self.info.host)
			.port(self.info.port)
			.database(&self.info.database);
		if !self.info.username.is_empty() {
			options = options.username(&self.info.username);
		}
		if let Some(password) = &self.info.password {
			options = options.password(password);
		}
		let mut conn = options.connect().await?;
		sqlx::query("SET time_zone = '+00:00'")
			.execute(&mut conn)
			.await?;
		Ok(Box::new(MySqlHandle::new(conn)))
	}

	async fn connect_sqlite(&self) -> PoolResult<Connection> {
		let options = match &self.info.sqlite {
			Some(SqliteTarget::Memory) | None => SqliteConnectOptions::new().in_memory(true),
			Some(SqliteTarget::File(path)) => SqliteConnectOptions::new()
				.filename(path)
				.create_if_missing(true),
		};
		let conn = options.foreign_keys(true).connect().await?;
		Ok(Box::new(SqliteHandle::new(conn)))
	}
}

#[async_trait]
impl Connector for ConnectionFactory {
	async fn connect(&self) -> PoolResult<Connection> {
		let conn = match self.info.dialect {
			Dialect::Postgres => self.connect_postgres().await?,
			Dialect::Mysql => self.connect_mysql().await?,
			Dialect::Sqlite => self.connect_sqlite().await?,
		};
		debug!(
			connection_id = %conn.id(),
			endpoint = %self.info.masked(),
			"opened backend connection"
		);
		Ok(conn)
	}

	async fn validate(&self, conn: &mut Connection) -> bool {
		match conn.ping().await {
			Ok(()) => true,
			Err(err) => {
				debug!(connection_id = %conn.id(), error = %err, "connection failed validation");
				false
			}
		}
	}

	async fn reset(&self, conn: &mut Connection) {
		// Rolling back with no open transaction errors on every backend;
		// that is the expected case and not worth logging above debug.
		if let Err(err) = conn.rollback().await {
			debug!(connection_id = %conn.id(), error = %err, "session reset rollback skipped");
		}
	}

	fn dialect(&self) -> Dialect {
		self.info.dialect
	}

	fn describe(&self) -> String {
		self.info.masked()
	}
}
