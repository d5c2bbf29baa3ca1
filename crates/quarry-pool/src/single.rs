//! Single-connection strategy
//!
//! Capacity is exactly one: the pool opens a connection lazily, hands it
//! out, and takes the same connection back. It tracks the connection id so
//! a foreign handle released into it is recognized and dropped instead of
//! adopted. A second acquire while the connection is out fails with
//! `Exhausted` rather than blocking.

use crate::config::{PoolConfig, PoolStrategy};
use crate::connection::Connection;
use crate::errors::{PoolError, PoolResult};
use crate::factory::Connector;
use crate::pool::{DatabasePool, PoolStats};
use crate::types::ConnectionId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

struct SingleState {
	idle: Option<Connection>,
	/// Id of the connection this pool created, whether idle or checked out.
	tracked: Option<ConnectionId>,
	checked_out: bool,
	closed: bool,
}

pub struct SingleConnectionPool {
	name: String,
	config: PoolConfig,
	connector: Arc<dyn Connector>,
	started: Instant,
	state: Mutex<SingleState>,
}

impl SingleConnectionPool {
	pub fn new(name: &str, config: PoolConfig, connector: Arc<dyn Connector>) -> Self {
		Self {
			name: name.to_string(),
			config,
			connector,
			started: Instant::now(),
			state: Mutex::new(SingleState {
				idle: None,
				tracked: None,
				checked_out: false,
				closed: false,
			}),
		}
	}
}

#[async_trait]
impl DatabasePool for SingleConnectionPool {
	async fn acquire(&self) -> PoolResult<Connection> {
		let mut state = self.state.lock().await;
		if state.closed {
			return Err(PoolError::Closed);
		}
		if state.checked_out {
			return Err(PoolError::Exhausted(self.name.clone()));
		}

		if let Some(mut conn) = state.idle.take() {
			if self.connector.validate(&mut conn).await {
				state.checked_out = true;
				return Ok(conn);
			}
			debug!(pool = %self.name, connection_id = %conn.id(), "discarding stale connection");
			state.tracked = None;
		}

		let conn = self.connector.connect().await?;
		state.tracked = Some(conn.id());
		state.checked_out = true;
		Ok(conn)
	}

	async fn release(&self, mut conn: Connection) {
		let mut state = self.state.lock().await;
		if state.tracked != Some(conn.id()) {
			// Not ours; dropping it closes the backend session.
			debug!(pool = %self.name, connection_id = %conn.id(), "dropping foreign connection");
			return;
		}
		state.checked_out = false;
		if state.closed {
			state.tracked = None;
			return;
		}
		self.connector.reset(&mut conn).await;
		if self.connector.validate(&mut conn).await {
			state.idle = Some(conn);
		} else {
			debug!(pool = %self.name, connection_id = %conn.id(), "discarding broken connection");
			state.tracked = None;
		}
	}

	async fn stats(&self) -> PoolStats {
		let state = self.state.lock().await;
		let current = u32::from(state.tracked.is_some());
		let idle = u32::from(state.idle.is_some());
		PoolStats {
			strategy: PoolStrategy::Single,
			current_connections: current,
			idle_connections: idle,
			max_size: 1,
			max_idle: 1,
			idle_timeout_secs: self.config.idle_timeout_secs,
			uptime_secs: self.started.elapsed().as_secs(),
			is_concurrent: false,
		}
	}

	async fn close(&self) {
		let mut state = self.state.lock().await;
		state.closed = true;
		state.idle = None;
		state.tracked = None;
		state.checked_out = false;
	}

	fn is_concurrent(&self) -> bool {
		false
	}

	fn strategy(&self) -> PoolStrategy {
		PoolStrategy::Single
	}
}
