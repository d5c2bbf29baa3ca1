mod common;

use common::StubConnector;
use quarry_pool::{PoolConfig, PoolError, PoolFactory, PoolStrategy};

fn stub_config(strategy: PoolStrategy) -> PoolConfig {
	PoolConfig::new("sqlite::memory:")
		.with_strategy(strategy)
		.with_max_size(3)
		.with_max_idle(2)
}

#[tokio::test]
async fn test_queue_counters_round_trip() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();

	let a = pool.acquire().await.unwrap();
	let b = pool.acquire().await.unwrap();
	let stats = pool.stats().await;
	assert_eq!(stats.current_connections, 2);
	assert_eq!(stats.idle_connections, 0);

	pool.release(a).await;
	pool.release(b).await;
	let stats = pool.stats().await;
	assert_eq!(stats.current_connections, 2);
	assert_eq!(stats.idle_connections, 2);
	assert_eq!(connector.connect_count(), 2);
	assert_eq!(connector.reset_count(), 2);
}

#[tokio::test]
async fn test_queue_reuses_idle_before_connecting() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();

	let conn = pool.acquire().await.unwrap();
	pool.release(conn).await;
	let _conn = pool.acquire().await.unwrap();
	assert_eq!(connector.connect_count(), 1);
}

#[tokio::test]
async fn test_queue_exhaustion_at_max_size() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector)
		.await
		.unwrap();

	let _a = pool.acquire().await.unwrap();
	let _b = pool.acquire().await.unwrap();
	let _c = pool.acquire().await.unwrap();
	let err = pool.acquire().await.unwrap_err();
	assert!(matches!(err, PoolError::Exhausted(_)));
}

#[tokio::test]
async fn test_queue_discards_beyond_max_idle() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector)
		.await
		.unwrap();

	let a = pool.acquire().await.unwrap();
	let b = pool.acquire().await.unwrap();
	let c = pool.acquire().await.unwrap();
	pool.release(a).await;
	pool.release(b).await;
	// max_idle is 2, so the third release discards
	pool.release(c).await;
	let stats = pool.stats().await;
	assert_eq!(stats.idle_connections, 2);
	assert_eq!(stats.current_connections, 2);
}

#[tokio::test]
async fn test_queue_connect_failure_frees_the_slot() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue).with_max_size(1).with_max_idle(1);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();

	connector.set_fail_connect(true);
	assert!(matches!(
		pool.acquire().await.unwrap_err(),
		PoolError::Backend(_)
	));

	// The reserved slot must be given back, or the pool is wedged forever.
	connector.set_fail_connect(false);
	let conn = pool.acquire().await.unwrap();
	pool.release(conn).await;
}

#[tokio::test]
async fn test_queue_discards_stale_idle_and_reconnects() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();

	let conn = pool.acquire().await.unwrap();
	pool.release(conn).await;

	// The stale idle connection is discarded and a fresh one opened in the
	// same acquire call.
	connector.set_fail_validation(true);
	let _conn = pool.acquire().await.unwrap();
	assert_eq!(connector.connect_count(), 2);
	let stats = pool.stats().await;
	assert_eq!(stats.current_connections, 1);
	assert_eq!(stats.idle_connections, 0);
}

#[tokio::test]
async fn test_closed_pool_rejects_acquire() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Queue);
	let pool = PoolFactory::create_with("main", &config, connector)
		.await
		.unwrap();

	let conn = pool.acquire().await.unwrap();
	pool.close().await;
	assert!(matches!(pool.acquire().await.unwrap_err(), PoolError::Closed));

	// Releasing after close discards instead of repooling.
	pool.release(conn).await;
	let stats = pool.stats().await;
	assert_eq!(stats.idle_connections, 0);
}

#[tokio::test]
async fn test_single_pool_reuses_the_same_connection() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Single);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();

	let first = pool.acquire().await.unwrap();
	let first_id = first.id();
	pool.release(first).await;

	let second = pool.acquire().await.unwrap();
	assert_eq!(second.id(), first_id);
	assert_eq!(connector.connect_count(), 1);
	pool.release(second).await;
}

#[tokio::test]
async fn test_single_pool_is_exhausted_while_checked_out() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Single);
	let pool = PoolFactory::create_with("main", &config, connector)
		.await
		.unwrap();

	let held = pool.acquire().await.unwrap();
	assert!(matches!(
		pool.acquire().await.unwrap_err(),
		PoolError::Exhausted(_)
	));
	pool.release(held).await;
	let _again = pool.acquire().await.unwrap();
}

#[tokio::test]
async fn test_single_pool_drops_foreign_connection() {
	let connector = StubConnector::shared();
	let config = stub_config(PoolStrategy::Single);
	let pool = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap();
	let other = PoolFactory::create_with("other", &config, connector.clone())
		.await
		.unwrap();

	let ours = pool.acquire().await.unwrap();
	let ours_id = ours.id();
	pool.release(ours).await;

	let foreign = other.acquire().await.unwrap();
	pool.release(foreign).await;

	// The foreign handle must not replace the tracked connection.
	let conn = pool.acquire().await.unwrap();
	assert_eq!(conn.id(), ours_id);
}

#[tokio::test]
async fn test_invalid_config_never_connects() {
	let connector = StubConnector::shared();
	let config = PoolConfig::new("sqlite::memory:")
		.with_max_size(2)
		.with_max_idle(5);
	let err = PoolFactory::create_with("main", &config, connector.clone())
		.await
		.unwrap_err();
	assert!(matches!(err, PoolError::Config(_)));
	assert_eq!(connector.connect_count(), 0);
}
