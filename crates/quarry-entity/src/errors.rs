use quarry_pool::PoolError;
use quarry_query::QueryError;
use thiserror::Error;

pub type EntityResult<T> = std::result::Result<T, EntityError>;

#[derive(Debug, Error)]
pub enum EntityError {
	#[error("entity mapping failed: {0}")]
	Mapping(String),

	#[error(transparent)]
	Query(#[from] QueryError),

	#[error(transparent)]
	Pool(#[from] PoolError),
}
