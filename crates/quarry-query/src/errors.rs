use quarry_pool::PoolError;
use thiserror::Error;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
	#[error("invalid query: {0}")]
	InvalidQuery(String),

	#[error(transparent)]
	Pool(#[from] PoolError),
}
