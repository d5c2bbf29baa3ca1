//! Pool and registry configuration
//!
//! Configs are plain serde structs so they deserialize straight out of a
//! `quarry.toml` file, with `with_*` builders for programmatic setup.
//! `validate()` runs at pool construction; a bad config never opens a
//! connection.

use crate::errors::{PoolError, PoolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Checkout strategy of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolStrategy {
	/// One shared connection, reused across checkouts.
	Single,
	/// Bounded FIFO of idle connections, fails fast at capacity.
	Queue,
	/// Channel-backed pool for the multi-thread scheduler; waits up to
	/// 500 ms for an idle connection at capacity.
	Channel,
	/// Channel-backed pool for the current-thread scheduler. Same
	/// algorithm as [`PoolStrategy::Channel`], different expected runtime.
	LocalChannel,
}

impl PoolStrategy {
	pub fn name(&self) -> &'static str {
		match self {
			PoolStrategy::Single => "single",
			PoolStrategy::Queue => "queue",
			PoolStrategy::Channel => "channel",
			PoolStrategy::LocalChannel => "local-channel",
		}
	}
}

impl fmt::Display for PoolStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for PoolStrategy {
	type Err = PoolError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"single" => Ok(PoolStrategy::Single),
			"queue" => Ok(PoolStrategy::Queue),
			"channel" => Ok(PoolStrategy::Channel),
			"local-channel" => Ok(PoolStrategy::LocalChannel),
			other => Err(PoolError::Config(format!(
				"unknown pool strategy `{}` (expected single, queue, channel or local-channel)",
				other
			))),
		}
	}
}

/// Configuration of one named pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
	pub url: String,
	#[serde(default = "default_strategy")]
	pub strategy: PoolStrategy,
	/// Upper bound on live connections (idle + checked out).
	#[serde(default = "default_max_size")]
	pub max_size: u32,
	/// Upper bound on the idle set; releases beyond it discard.
	#[serde(default = "default_max_idle")]
	pub max_idle: u32,
	/// Idle connections older than this are evicted on release.
	/// `0` disables timeout eviction.
	#[serde(default = "default_idle_timeout")]
	pub idle_timeout_secs: u64,
}

fn default_strategy() -> PoolStrategy {
	PoolStrategy::Queue
}

fn default_max_size() -> u32 {
	20
}

fn default_max_idle() -> u32 {
	10
}

fn default_idle_timeout() -> u64 {
	30
}

impl PoolConfig {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			strategy: default_strategy(),
			max_size: default_max_size(),
			max_idle: default_max_idle(),
			idle_timeout_secs: default_idle_timeout(),
		}
	}

	pub fn with_strategy(mut self, strategy: PoolStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	pub fn with_max_size(mut self, max_size: u32) -> Self {
		self.max_size = max_size;
		self
	}

	pub fn with_max_idle(mut self, max_idle: u32) -> Self {
		self.max_idle = max_idle;
		self
	}

	pub fn with_idle_timeout_secs(mut self, secs: u64) -> Self {
		self.idle_timeout_secs = secs;
		self
	}

	pub fn validate(&self) -> PoolResult<()> {
		if self.url.is_empty() {
			return Err(PoolError::Config("database URL must not be empty".into()));
		}
		if self.max_size == 0 {
			return Err(PoolError::Config("max_size must be at least 1".into()));
		}
		if self.max_idle > self.max_size {
			return Err(PoolError::Config(format!(
				"max_idle ({}) must not exceed max_size ({})",
				self.max_idle, self.max_size
			)));
		}
		Ok(())
	}
}

/// Registry-level configuration: every named pool plus the default choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
	#[serde(default = "default_pool_name")]
	pub default: String,
	pub pools: HashMap<String, PoolConfig>,
}

fn default_pool_name() -> String {
	"default".to_string()
}

impl DatabaseConfig {
	pub fn new() -> Self {
		Self {
			default: default_pool_name(),
			pools: HashMap::new(),
		}
	}

	pub fn with_pool(mut self, name: impl Into<String>, config: PoolConfig) -> Self {
		self.pools.insert(name.into(), config);
		self
	}

	pub fn with_default(mut self, name: impl Into<String>) -> Self {
		self.default = name.into();
		self
	}

	pub fn from_toml_str(raw: &str) -> PoolResult<Self> {
		let config: Self = toml::from_str(raw)
			.map_err(|err| PoolError::Config(format!("invalid database config: {}", err)))?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> PoolResult<()> {
		if self.pools.is_empty() {
			return Err(PoolError::Config(
				"database config declares no pools".into(),
			));
		}
		if !self.pools.contains_key(&self.default) {
			return Err(PoolError::Config(format!(
				"default pool `{}` is not declared",
				self.default
			)));
		}
		for (name, pool) in &self.pools {
			pool.validate()
				.map_err(|err| PoolError::Config(format!("pool `{}`: {}", name, err)))?;
		}
		Ok(())
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self::new()
	}
}
