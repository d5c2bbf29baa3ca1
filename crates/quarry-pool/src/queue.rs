//! Bounded FIFO strategy
//!
//! Idle connections sit in a deque; `current` counts live connections, idle
//! or checked out. At capacity with an empty deque, acquire fails fast with
//! `Exhausted` (no waiting). The lock is a plain mutex and is never held
//! across an await: connect/validate/reset all happen with the lock
//! released, and counters are reconciled afterwards.

use crate::config::{PoolConfig, PoolStrategy};
use crate::connection::Connection;
use crate::errors::{PoolError, PoolResult};
use crate::factory::Connector;
use crate::pool::{DatabasePool, PoolStats};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

struct QueueState {
	idle: VecDeque<Connection>,
	current: u32,
	closed: bool,
}

pub struct BoundedQueuePool {
	name: String,
	config: PoolConfig,
	connector: Arc<dyn Connector>,
	started: Instant,
	state: Mutex<QueueState>,
}

impl BoundedQueuePool {
	pub fn new(name: &str, config: PoolConfig, connector: Arc<dyn Connector>) -> Self {
		Self {
			name: name.to_string(),
			config,
			connector,
			started: Instant::now(),
			state: Mutex::new(QueueState {
				idle: VecDeque::new(),
				current: 0,
				closed: false,
			}),
		}
	}

	fn discard(&self, reason: &str) {
		let mut state = self.state.lock();
		state.current = state.current.saturating_sub(1);
		debug!(pool = %self.name, reason, "discarded connection");
	}
}

#[async_trait]
impl DatabasePool for BoundedQueuePool {
	async fn acquire(&self) -> PoolResult<Connection> {
		// Bounded retry: at most max_size stale idle connections can exist,
		// so max_size + 1 passes always reach a connect or an error.
		for _ in 0..=self.config.max_size {
			let candidate = {
				let mut state = self.state.lock();
				if state.closed {
					return Err(PoolError::Closed);
				}
				if let Some(conn) = state.idle.pop_front() {
					Some(conn)
				} else if state.current < self.config.max_size {
					// Reserve the slot before connecting so a burst of
					// acquires cannot overshoot max_size.
					state.current += 1;
					None
				} else {
					return Err(PoolError::Exhausted(self.name.clone()));
				}
			};

			match candidate {
				Some(mut conn) => {
					if self.connector.validate(&mut conn).await {
						return Ok(conn);
					}
					self.discard("failed validation");
				}
				None => {
					return match self.connector.connect().await {
						Ok(conn) => Ok(conn),
						Err(err) => {
							self.discard("connect failed");
							Err(err)
						}
					};
				}
			}
		}
		Err(PoolError::Exhausted(self.name.clone()))
	}

	async fn release(&self, mut conn: Connection) {
		{
			let state = self.state.lock();
			if state.closed {
				drop(state);
				self.discard("pool closed");
				return;
			}
		}
		self.connector.reset(&mut conn).await;
		if !self.connector.validate(&mut conn).await {
			self.discard("failed validation on release");
			return;
		}
		let mut state = self.state.lock();
		if state.closed || state.idle.len() >= self.config.max_idle as usize {
			state.current = state.current.saturating_sub(1);
			debug!(pool = %self.name, "idle set full, dropping connection");
			return;
		}
		state.idle.push_back(conn);
	}

	async fn stats(&self) -> PoolStats {
		let state = self.state.lock();
		PoolStats {
			strategy: PoolStrategy::Queue,
			current_connections: state.current,
			idle_connections: state.idle.len() as u32,
			max_size: self.config.max_size,
			max_idle: self.config.max_idle,
			idle_timeout_secs: self.config.idle_timeout_secs,
			uptime_secs: self.started.elapsed().as_secs(),
			is_concurrent: true,
		}
	}

	async fn close(&self) {
		let mut state = self.state.lock();
		state.closed = true;
		let drained = state.idle.len() as u32;
		state.idle.clear();
		state.current = 0;
		debug!(pool = %self.name, drained, "pool closed");
	}

	fn is_concurrent(&self) -> bool {
		true
	}

	fn strategy(&self) -> PoolStrategy {
		PoolStrategy::Queue
	}
}
