//! Shared test doubles for the pool strategy tests
#![allow(dead_code)]

use async_trait::async_trait;
use quarry_pool::{
	BackendConnection, Connection, Connector, ConnectionId, Dialect, PoolError, PoolResult,
	QueryOutcome, Row, SqlValue,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Connection double that never talks to a database.
pub struct StubConnection {
	id: ConnectionId,
}

impl StubConnection {
	fn new() -> Self {
		Self {
			id: ConnectionId::new(),
		}
	}
}

#[async_trait]
impl BackendConnection for StubConnection {
	fn id(&self) -> ConnectionId {
		self.id
	}

	fn dialect(&self) -> Dialect {
		Dialect::Sqlite
	}

	async fn execute(&mut self, _sql: &str, _params: &[SqlValue]) -> PoolResult<QueryOutcome> {
		Ok(QueryOutcome::default())
	}

	async fn fetch_all(&mut self, _sql: &str, _params: &[SqlValue]) -> PoolResult<Vec<Row>> {
		Ok(Vec::new())
	}

	async fn ping(&mut self) -> PoolResult<()> {
		Ok(())
	}

	async fn rollback(&mut self) -> PoolResult<()> {
		Ok(())
	}
}

/// Connector double with failure injection and call counters.
#[derive(Default)]
pub struct StubConnector {
	pub fail_connect: AtomicBool,
	pub fail_validation: AtomicBool,
	pub connects: AtomicU32,
	pub validations: AtomicU32,
	pub resets: AtomicU32,
}

impl StubConnector {
	pub fn shared() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn connect_count(&self) -> u32 {
		self.connects.load(Ordering::SeqCst)
	}

	pub fn reset_count(&self) -> u32 {
		self.resets.load(Ordering::SeqCst)
	}

	pub fn set_fail_connect(&self, fail: bool) {
		self.fail_connect.store(fail, Ordering::SeqCst);
	}

	pub fn set_fail_validation(&self, fail: bool) {
		self.fail_validation.store(fail, Ordering::SeqCst);
	}
}

#[async_trait]
impl Connector for StubConnector {
	async fn connect(&self) -> PoolResult<Connection> {
		if self.fail_connect.load(Ordering::SeqCst) {
			return Err(PoolError::Backend("injected connect failure".into()));
		}
		self.connects.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(StubConnection::new()))
	}

	async fn validate(&self, _conn: &mut Connection) -> bool {
		self.validations.fetch_add(1, Ordering::SeqCst);
		!self.fail_validation.load(Ordering::SeqCst)
	}

	async fn reset(&self, _conn: &mut Connection) {
		self.resets.fetch_add(1, Ordering::SeqCst);
	}

	fn dialect(&self) -> Dialect {
		Dialect::Sqlite
	}

	fn describe(&self) -> String {
		"stub://".to_string()
	}
}
