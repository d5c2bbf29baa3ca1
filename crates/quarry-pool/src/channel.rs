//! Channel-backed strategies
//!
//! Two public pools share one core: [`ChannelPool`] expects the
//! multi-thread tokio scheduler, [`LocalChannelPool`] the current-thread
//! scheduler. Under the expected scheduler the idle set is an mpsc channel
//! and acquire waits up to 500 ms at capacity; a couple of connections are
//! opened eagerly at construction. When the expected scheduler is absent
//! the pool degrades to a plain bounded deque with fail-fast acquire and
//! identical capacity accounting.
//!
//! Idle eviction runs as a drain-and-refill pass over the channel on every
//! release. The pass is O(idle set); `idle_timeout_secs = 0` turns it off.

use crate::config::{PoolConfig, PoolStrategy};
use crate::connection::Connection;
use crate::errors::{PoolError, PoolResult};
use crate::factory::Connector;
use crate::pool::{DatabasePool, PoolStats};
use crate::types::ConnectionId;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// How long acquire waits for an idle connection at capacity.
const ACQUIRE_WAIT: Duration = Duration::from_millis(500);

/// How many connections to open eagerly when the channel store comes up.
const PREHEAT: u32 = 2;

enum Store {
	Channel {
		tx: mpsc::Sender<Connection>,
		rx: tokio::sync::Mutex<mpsc::Receiver<Connection>>,
	},
	Fallback {
		idle: parking_lot::Mutex<VecDeque<Connection>>,
	},
}

struct ChannelCore {
	name: String,
	config: PoolConfig,
	connector: Arc<dyn Connector>,
	started: Instant,
	store: Store,
	strategy: PoolStrategy,
	/// Live connections, idle and checked out.
	current: AtomicU32,
	idle: AtomicU32,
	closed: AtomicBool,
	/// When each idle connection was last released, for timeout eviction.
	last_release: parking_lot::Mutex<HashMap<ConnectionId, Instant>>,
}

impl ChannelCore {
	async fn new(
		name: &str,
		config: PoolConfig,
		connector: Arc<dyn Connector>,
		strategy: PoolStrategy,
		expected_flavor: RuntimeFlavor,
	) -> PoolResult<Self> {
		let channel_mode = matches!(
			Handle::try_current().map(|handle| handle.runtime_flavor()),
			Ok(flavor) if flavor == expected_flavor
		);
		let store = if channel_mode {
			let (tx, rx) = mpsc::channel(config.max_size as usize);
			Store::Channel {
				tx,
				rx: tokio::sync::Mutex::new(rx),
			}
		} else {
			warn!(
				pool = %name,
				strategy = %strategy,
				"expected scheduler not running, using bounded fallback mode"
			);
			Store::Fallback {
				idle: parking_lot::Mutex::new(VecDeque::new()),
			}
		};

		let core = Self {
			name: name.to_string(),
			config,
			connector,
			started: Instant::now(),
			store,
			strategy,
			current: AtomicU32::new(0),
			idle: AtomicU32::new(0),
			closed: AtomicBool::new(false),
			last_release: parking_lot::Mutex::new(HashMap::new()),
		};
		core.preheat().await?;
		Ok(core)
	}

	async fn preheat(&self) -> PoolResult<()> {
		let Store::Channel { tx, .. } = &self.store else {
			return Ok(());
		};
		let target = PREHEAT.min(self.config.max_idle);
		for _ in 0..target {
			let conn = self.connector.connect().await?;
			self.current.fetch_add(1, Ordering::AcqRel);
			self.idle.fetch_add(1, Ordering::AcqRel);
			self.last_release.lock().insert(conn.id(), Instant::now());
			if tx.send(conn).await.is_err() {
				self.release_slot();
				self.release_idle_slot();
			}
		}
		debug!(pool = %self.name, connections = target, "preheated channel pool");
		Ok(())
	}

	fn increment_below(counter: &AtomicU32, max: u32) -> bool {
		let mut value = counter.load(Ordering::Acquire);
		while value < max {
			match counter.compare_exchange_weak(
				value,
				value + 1,
				Ordering::AcqRel,
				Ordering::Acquire,
			) {
				Ok(_) => return true,
				Err(seen) => value = seen,
			}
		}
		false
	}

	// Decrement-if-positive: after close zeroes the counters, a straggling
	// release must not wrap them around.
	fn decrement_if_positive(counter: &AtomicU32) {
		let mut value = counter.load(Ordering::Acquire);
		while value > 0 {
			match counter.compare_exchange_weak(
				value,
				value - 1,
				Ordering::AcqRel,
				Ordering::Acquire,
			) {
				Ok(_) => return,
				Err(seen) => value = seen,
			}
		}
	}

	/// Reserve a live-connection slot if the pool is below `max_size`.
	fn try_reserve_slot(&self) -> bool {
		Self::increment_below(&self.current, self.config.max_size)
	}

	fn release_slot(&self) {
		Self::decrement_if_positive(&self.current);
	}

	/// Reserve an idle-set slot if below `max_idle`. Two releases racing for
	/// the last slot must not both win, so the check and the increment are
	/// one CAS.
	fn try_reserve_idle_slot(&self) -> bool {
		Self::increment_below(&self.idle, self.config.max_idle)
	}

	fn release_idle_slot(&self) {
		Self::decrement_if_positive(&self.idle);
	}

	async fn connect_into_slot(&self) -> PoolResult<Connection> {
		match self.connector.connect().await {
			Ok(conn) => Ok(conn),
			Err(err) => {
				self.release_slot();
				Err(err)
			}
		}
	}

	async fn acquire(&self) -> PoolResult<Connection> {
		if self.closed.load(Ordering::Acquire) {
			return Err(PoolError::Closed);
		}
		match &self.store {
			Store::Channel { rx, .. } => self.acquire_channel(rx).await,
			Store::Fallback { idle } => self.acquire_fallback(idle).await,
		}
	}

	async fn acquire_channel(
		&self,
		rx: &tokio::sync::Mutex<mpsc::Receiver<Connection>>,
	) -> PoolResult<Connection> {
		// Bounded retry: each pass either returns, errors, or discards one
		// stale idle connection, of which there are at most max_size.
		for _ in 0..=self.config.max_size {
			if self.idle.load(Ordering::Acquire) == 0 && self.try_reserve_slot() {
				return self.connect_into_slot().await;
			}

			let received = {
				let mut rx = rx.lock().await;
				timeout(ACQUIRE_WAIT, rx.recv()).await
			};
			match received {
				Ok(Some(mut conn)) => {
					self.release_idle_slot();
					self.last_release.lock().remove(&conn.id());
					if self.connector.validate(&mut conn).await {
						return Ok(conn);
					}
					self.release_slot();
					debug!(pool = %self.name, connection_id = %conn.id(), "discarding stale connection");
				}
				Ok(None) => return Err(PoolError::Closed),
				Err(_) => {
					// The idle counter read before the wait can be stale when
					// another task is between its recv and its decrement, so a
					// waiter below max_size re-checks capacity before failing.
					if self.try_reserve_slot() {
						return self.connect_into_slot().await;
					}
					return Err(PoolError::Exhausted(format!(
						"{}: no idle connection within {} ms",
						self.name,
						ACQUIRE_WAIT.as_millis()
					)));
				}
			}
		}
		Err(PoolError::Exhausted(self.name.clone()))
	}

	async fn acquire_fallback(
		&self,
		idle: &parking_lot::Mutex<VecDeque<Connection>>,
	) -> PoolResult<Connection> {
		for _ in 0..=self.config.max_size {
			let candidate = {
				let mut queue = idle.lock();
				match queue.pop_front() {
					Some(conn) => {
						self.release_idle_slot();
						Some(conn)
					}
					None if self.try_reserve_slot() => None,
					None => return Err(PoolError::Exhausted(self.name.clone())),
				}
			};
			match candidate {
				Some(mut conn) => {
					if self.connector.validate(&mut conn).await {
						return Ok(conn);
					}
					self.release_slot();
					debug!(pool = %self.name, connection_id = %conn.id(), "discarding stale connection");
				}
				None => return self.connect_into_slot().await,
			}
		}
		Err(PoolError::Exhausted(self.name.clone()))
	}

	async fn release(&self, mut conn: Connection) {
		if self.closed.load(Ordering::Acquire) {
			self.release_slot();
			return;
		}
		self.connector.reset(&mut conn).await;
		if !self.connector.validate(&mut conn).await {
			self.release_slot();
			debug!(pool = %self.name, connection_id = %conn.id(), "discarding broken connection on release");
			return;
		}
		match &self.store {
			Store::Channel { tx, rx } => {
				self.evict_idle(tx, rx).await;
				if !self.try_reserve_idle_slot() {
					self.release_slot();
					debug!(pool = %self.name, "idle set full, dropping connection");
					return;
				}
				self.last_release.lock().insert(conn.id(), Instant::now());
				if tx.send(conn).await.is_err() {
					self.release_idle_slot();
					self.release_slot();
				}
			}
			Store::Fallback { idle } => {
				let mut queue = idle.lock();
				if queue.len() >= self.config.max_idle as usize {
					self.release_slot();
					debug!(pool = %self.name, "idle set full, dropping connection");
					return;
				}
				self.idle.fetch_add(1, Ordering::AcqRel);
				queue.push_back(conn);
			}
		}
	}

	/// Drain the channel, drop idle connections past their timeout, put the
	/// rest back.
	async fn evict_idle(
		&self,
		tx: &mpsc::Sender<Connection>,
		rx: &tokio::sync::Mutex<mpsc::Receiver<Connection>>,
	) {
		if self.config.idle_timeout_secs == 0 {
			return;
		}
		let max_age = Duration::from_secs(self.config.idle_timeout_secs);
		let mut kept = Vec::new();
		{
			let mut rx = rx.lock().await;
			while let Ok(conn) = rx.try_recv() {
				let expired = self
					.last_release
					.lock()
					.get(&conn.id())
					.is_some_and(|released| released.elapsed() >= max_age);
				if expired {
					self.release_idle_slot();
					self.release_slot();
					self.last_release.lock().remove(&conn.id());
					debug!(pool = %self.name, connection_id = %conn.id(), "evicting idle connection");
				} else {
					kept.push(conn);
				}
			}
		}
		for conn in kept {
			if tx.send(conn).await.is_err() {
				self.release_idle_slot();
				self.release_slot();
			}
		}
	}

	async fn stats(&self) -> PoolStats {
		PoolStats {
			strategy: self.strategy,
			current_connections: self.current.load(Ordering::Acquire),
			idle_connections: self.idle.load(Ordering::Acquire),
			max_size: self.config.max_size,
			max_idle: self.config.max_idle,
			idle_timeout_secs: self.config.idle_timeout_secs,
			uptime_secs: self.started.elapsed().as_secs(),
			is_concurrent: self.is_concurrent(),
		}
	}

	async fn close(&self) {
		self.closed.store(true, Ordering::Release);
		match &self.store {
			Store::Channel { rx, .. } => {
				let mut rx = rx.lock().await;
				while rx.try_recv().is_ok() {}
			}
			Store::Fallback { idle } => {
				idle.lock().clear();
			}
		}
		self.idle.store(0, Ordering::Release);
		self.current.store(0, Ordering::Release);
		self.last_release.lock().clear();
		debug!(pool = %self.name, "pool closed");
	}

	fn is_concurrent(&self) -> bool {
		matches!(self.store, Store::Channel { .. })
	}
}

/// Channel pool for the multi-thread scheduler
pub struct ChannelPool {
	core: ChannelCore,
}

impl ChannelPool {
	pub async fn new(
		name: &str,
		config: PoolConfig,
		connector: Arc<dyn Connector>,
	) -> PoolResult<Self> {
		let core = ChannelCore::new(
			name,
			config,
			connector,
			PoolStrategy::Channel,
			RuntimeFlavor::MultiThread,
		)
		.await?;
		Ok(Self { core })
	}
}

#[async_trait]
impl DatabasePool for ChannelPool {
	async fn acquire(&self) -> PoolResult<Connection> {
		self.core.acquire().await
	}

	async fn release(&self, conn: Connection) {
		self.core.release(conn).await;
	}

	async fn stats(&self) -> PoolStats {
		self.core.stats().await
	}

	async fn close(&self) {
		self.core.close().await;
	}

	fn is_concurrent(&self) -> bool {
		self.core.is_concurrent()
	}

	fn strategy(&self) -> PoolStrategy {
		PoolStrategy::Channel
	}
}

/// Channel pool for the current-thread scheduler
pub struct LocalChannelPool {
	core: ChannelCore,
}

impl LocalChannelPool {
	pub async fn new(
		name: &str,
		config: PoolConfig,
		connector: Arc<dyn Connector>,
	) -> PoolResult<Self> {
		let core = ChannelCore::new(
			name,
			config,
			connector,
			PoolStrategy::LocalChannel,
			RuntimeFlavor::CurrentThread,
		)
		.await?;
		Ok(Self { core })
	}
}

#[async_trait]
impl DatabasePool for LocalChannelPool {
	async fn acquire(&self) -> PoolResult<Connection> {
		self.core.acquire().await
	}

	async fn release(&self, conn: Connection) {
		self.core.release(conn).await;
	}

	async fn stats(&self) -> PoolStats {
		self.core.stats().await
	}

	async fn close(&self) {
		self.core.close().await;
	}

	fn is_concurrent(&self) -> bool {
		self.core.is_concurrent()
	}

	fn strategy(&self) -> PoolStrategy {
		PoolStrategy::LocalChannel
	}
}
