//! Named connection pools with interchangeable checkout strategies.
//!
//! A pool is configured with a URL, a [`PoolStrategy`] and capacity bounds,
//! then used through [`DatabasePool`] or, more commonly, through a
//! [`ConnectionScope`] checked out of a [`PoolRegistry`]:
//!
//! ```no_run
//! use quarry_pool::{PoolConfig, PoolFactory, PoolStrategy, ConnectionScope};
//!
//! # async fn demo() -> quarry_pool::PoolResult<()> {
//! let config = PoolConfig::new("postgres://app@localhost/app")
//! 	.with_strategy(PoolStrategy::Channel)
//! 	.with_max_size(8);
//! let pool = PoolFactory::create("main", &config).await?;
//!
//! let mut scope = ConnectionScope::acquire(pool).await?;
//! scope.execute("DELETE FROM sessions WHERE expired", &[]).await?;
//! scope.release().await;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod connection;
pub mod errors;
pub mod factory;
pub mod pool;
pub mod queue;
pub mod registry;
pub mod scope;
pub mod single;
pub mod types;
pub mod uri;

pub use channel::{ChannelPool, LocalChannelPool};
pub use config::{DatabaseConfig, PoolConfig, PoolStrategy};
pub use connection::{BackendConnection, Connection};
pub use errors::{PoolError, PoolResult};
pub use factory::{ConnectionFactory, Connector};
pub use pool::{DatabasePool, PoolFactory, PoolStats, SharedPool};
pub use queue::BoundedQueuePool;
pub use registry::{PoolRegistry, global};
pub use scope::ConnectionScope;
pub use single::SingleConnectionPool;
pub use types::{ConnectionId, Dialect, QueryOutcome, Row, SqlValue};
pub use uri::{ConnectionInfo, SqliteTarget};
