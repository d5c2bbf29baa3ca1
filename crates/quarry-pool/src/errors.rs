//! Pool error taxonomy
//!
//! Construction-time problems (`Config`) are fatal and never retried.
//! `Exhausted` is surfaced to the caller, who may retry later; the pools
//! themselves only retry internally when a pooled connection fails
//! validation, and that loop is bounded. Backend failures during
//! validation/reset are swallowed at the connection level and turn into a
//! discard, never into a surfaced error.

use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = std::result::Result<T, PoolError>;

#[derive(Debug, Error)]
pub enum PoolError {
	/// Malformed URI, unknown strategy or capacity invariant violation.
	/// Always raised at construction, before any connection is opened.
	#[error("configuration error: {0}")]
	Config(String),

	/// The pool is at `max_size` and no idle connection became available.
	#[error("no available connections in pool: {0}")]
	Exhausted(String),

	/// A `ConnectionScope` accessor was called after release.
	#[error("connection has already been released")]
	UseAfterRelease,

	/// No pool registered under the given name.
	#[error("pool `{0}` is not registered")]
	NotFound(String),

	/// The pool was closed and must not be reused.
	#[error("pool is closed")]
	Closed,

	/// Error from the underlying database driver.
	#[error("backend error: {0}")]
	Backend(String),
}

impl From<sqlx::Error> for PoolError {
	fn from(err: sqlx::Error) -> Self {
		PoolError::Backend(err.to_string())
	}
}

impl From<url::ParseError> for PoolError {
	fn from(err: url::ParseError) -> Self {
		PoolError::Config(format!("invalid database URL: {}", err))
	}
}
