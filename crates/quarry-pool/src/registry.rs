//! Named pool registry
//!
//! A [`PoolRegistry`] is an owned value; applications can create as many as
//! they need and pass them explicitly. The process-wide instance behind
//! [`global`] is the conventional one the query layer and CLI use.

use crate::config::DatabaseConfig;
use crate::errors::{PoolError, PoolResult};
use crate::pool::{PoolFactory, PoolStats, SharedPool};
use crate::scope::ConnectionScope;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

struct RegistryInner {
	pools: HashMap<String, SharedPool>,
	default: Option<String>,
}

pub struct PoolRegistry {
	inner: RwLock<RegistryInner>,
}

impl PoolRegistry {
	pub fn new() -> Self {
		Self {
			inner: RwLock::new(RegistryInner {
				pools: HashMap::new(),
				default: None,
			}),
		}
	}

	/// Register a pool under `name`. The first registered pool becomes the
	/// default until `set_default` says otherwise.
	pub fn register(&self, name: impl Into<String>, pool: SharedPool) {
		let name = name.into();
		let mut inner = self.inner.write();
		if inner.default.is_none() {
			inner.default = Some(name.clone());
		}
		inner.pools.insert(name, pool);
	}

	pub fn get(&self, name: &str) -> PoolResult<SharedPool> {
		self.inner
			.read()
			.pools
			.get(name)
			.cloned()
			.ok_or_else(|| PoolError::NotFound(name.to_string()))
	}

	pub fn default_pool(&self) -> PoolResult<SharedPool> {
		let inner = self.inner.read();
		let name = inner
			.default
			.as_deref()
			.ok_or_else(|| PoolError::NotFound("default".to_string()))?;
		inner
			.pools
			.get(name)
			.cloned()
			.ok_or_else(|| PoolError::NotFound(name.to_string()))
	}

	pub fn default_name(&self) -> Option<String> {
		self.inner.read().default.clone()
	}

	pub fn set_default(&self, name: &str) -> PoolResult<()> {
		let mut inner = self.inner.write();
		if !inner.pools.contains_key(name) {
			return Err(PoolError::NotFound(name.to_string()));
		}
		inner.default = Some(name.to_string());
		Ok(())
	}

	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.inner.read().pools.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn contains(&self, name: &str) -> bool {
		self.inner.read().pools.contains_key(name)
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().pools.is_empty()
	}

	/// Build and register every pool in `config`, then set the default.
	pub async fn initialize(&self, config: &DatabaseConfig) -> PoolResult<()> {
		config.validate()?;
		for (name, pool_config) in &config.pools {
			let pool = PoolFactory::create(name, pool_config).await?;
			self.register(name.clone(), pool);
			info!(pool = %name, strategy = %pool_config.strategy, "registered pool");
		}
		self.set_default(&config.default)
	}

	/// Check a connection out of the named pool, wrapped in a scope.
	pub async fn acquire(&self, name: &str) -> PoolResult<ConnectionScope> {
		ConnectionScope::acquire(self.get(name)?).await
	}

	/// Check a connection out of the default pool.
	pub async fn acquire_default(&self) -> PoolResult<ConnectionScope> {
		ConnectionScope::acquire(self.default_pool()?).await
	}

	/// Stats snapshots for every registered pool, sorted by name.
	pub async fn stats(&self) -> Vec<(String, PoolStats)> {
		let pools: Vec<(String, SharedPool)> = {
			let inner = self.inner.read();
			let mut pools: Vec<_> = inner
				.pools
				.iter()
				.map(|(name, pool)| (name.clone(), pool.clone()))
				.collect();
			pools.sort_by(|a, b| a.0.cmp(&b.0));
			pools
		};
		let mut stats = Vec::with_capacity(pools.len());
		for (name, pool) in pools {
			stats.push((name, pool.stats().await));
		}
		stats
	}

	/// Close every pool and forget them all.
	pub async fn close_all(&self) {
		let pools: Vec<SharedPool> = {
			let mut inner = self.inner.write();
			inner.default = None;
			inner.pools.drain().map(|(_, pool)| pool).collect()
		};
		for pool in pools {
			pool.close().await;
		}
	}
}

impl Default for PoolRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static GLOBAL: Lazy<PoolRegistry> = Lazy::new(PoolRegistry::new);

/// The process-wide registry.
pub fn global() -> &'static PoolRegistry {
	&GLOBAL
}
