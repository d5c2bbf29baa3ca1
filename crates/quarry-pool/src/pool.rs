//! Pool trait, stats snapshot and strategy factory

use crate::channel::{ChannelPool, LocalChannelPool};
use crate::config::{PoolConfig, PoolStrategy};
use crate::connection::Connection;
use crate::errors::PoolResult;
use crate::factory::{ConnectionFactory, Connector};
use crate::queue::BoundedQueuePool;
use crate::single::SingleConnectionPool;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A named, bounded pool of backend connections.
///
/// Strategies are interchangeable behind this trait; callers pick one at
/// construction and the rest of the system only sees `Arc<dyn DatabasePool>`.
#[async_trait]
pub trait DatabasePool: Send + Sync {
	/// Check a connection out. Errors with `Exhausted` when the pool is at
	/// `max_size` and no idle connection becomes available, `Closed` after
	/// [`DatabasePool::close`].
	async fn acquire(&self) -> PoolResult<Connection>;

	/// Return a connection. The pool resets and revalidates it; broken or
	/// surplus connections are discarded silently.
	async fn release(&self, conn: Connection);

	/// Point-in-time counters for operational tooling.
	async fn stats(&self) -> PoolStats;

	/// Close the pool: drop idle connections and reject further acquires.
	/// Connections still checked out are discarded when released.
	async fn close(&self);

	/// Whether acquires may proceed concurrently from multiple tasks.
	fn is_concurrent(&self) -> bool;

	fn strategy(&self) -> PoolStrategy;
}

impl std::fmt::Debug for dyn DatabasePool {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DatabasePool")
			.field("strategy", &self.strategy())
			.field("is_concurrent", &self.is_concurrent())
			.finish()
	}
}

/// Shared handle to a pool
pub type SharedPool = Arc<dyn DatabasePool>;

/// Snapshot of one pool's counters
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
	pub strategy: PoolStrategy,
	/// Live connections, idle and checked out together.
	pub current_connections: u32,
	pub idle_connections: u32,
	pub max_size: u32,
	pub max_idle: u32,
	pub idle_timeout_secs: u64,
	pub uptime_secs: u64,
	pub is_concurrent: bool,
}

/// Builds a pool from its config, dispatching on the strategy tag
pub struct PoolFactory;

impl PoolFactory {
	/// Create a pool connecting to `config.url`.
	pub async fn create(name: &str, config: &PoolConfig) -> PoolResult<SharedPool> {
		config.validate()?;
		let connector: Arc<dyn Connector> = Arc::new(ConnectionFactory::from_url(&config.url)?);
		Self::create_with(name, config, connector).await
	}

	/// Create a pool around an explicit connector. Used by tests to inject
	/// stub connectors; `create` delegates here.
	pub async fn create_with(
		name: &str,
		config: &PoolConfig,
		connector: Arc<dyn Connector>,
	) -> PoolResult<SharedPool> {
		config.validate()?;
		let pool: SharedPool = match config.strategy {
			PoolStrategy::Single => {
				Arc::new(SingleConnectionPool::new(name, config.clone(), connector))
			}
			PoolStrategy::Queue => {
				Arc::new(BoundedQueuePool::new(name, config.clone(), connector))
			}
			PoolStrategy::Channel => {
				Arc::new(ChannelPool::new(name, config.clone(), connector).await?)
			}
			PoolStrategy::LocalChannel => {
				Arc::new(LocalChannelPool::new(name, config.clone(), connector).await?)
			}
		};
		Ok(pool)
	}
}
