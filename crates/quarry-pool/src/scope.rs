//! Scoped connection checkout
//!
//! [`ConnectionScope`] owns a checked-out connection and guarantees it goes
//! back to its pool: explicitly via `release().await`, or on drop by
//! spawning the release onto the current runtime. Explicit release is the
//! reliable path; drop release is the safety net for early returns and
//! error paths.

use crate::connection::Connection;
use crate::errors::{PoolError, PoolResult};
use crate::pool::SharedPool;
use crate::types::{ConnectionId, QueryOutcome, Row, SqlValue};
use tokio::runtime::Handle;
use tracing::warn;

#[derive(Debug)]
pub struct ConnectionScope {
	conn: Option<Connection>,
	pool: SharedPool,
}

impl ConnectionScope {
	/// Check a connection out of `pool` and wrap it.
	pub async fn acquire(pool: SharedPool) -> PoolResult<Self> {
		let conn = pool.acquire().await?;
		Ok(Self {
			conn: Some(conn),
			pool,
		})
	}

	/// Access the held connection. `UseAfterRelease` once released.
	pub fn connection(&mut self) -> PoolResult<&mut Connection> {
		self.conn.as_mut().ok_or(PoolError::UseAfterRelease)
	}

	pub fn id(&self) -> PoolResult<ConnectionId> {
		self.conn
			.as_ref()
			.map(|conn| conn.id())
			.ok_or(PoolError::UseAfterRelease)
	}

	pub async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<QueryOutcome> {
		self.connection()?.execute(sql, params).await
	}

	pub async fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> PoolResult<Vec<Row>> {
		self.connection()?.fetch_all(sql, params).await
	}

	/// Return the connection to its pool. Idempotent: the second and later
	/// calls do nothing.
	pub async fn release(&mut self) {
		if let Some(conn) = self.conn.take() {
			self.pool.release(conn).await;
		}
	}

	pub fn is_released(&self) -> bool {
		self.conn.is_none()
	}
}

impl Drop for ConnectionScope {
	fn drop(&mut self) {
		let Some(conn) = self.conn.take() else {
			return;
		};
		match Handle::try_current() {
			Ok(handle) => {
				let pool = self.pool.clone();
				handle.spawn(async move {
					pool.release(conn).await;
				});
			}
			Err(_) => {
				warn!(
					connection_id = %conn.id(),
					"connection scope dropped outside a runtime, closing connection"
				);
			}
		}
	}
}
