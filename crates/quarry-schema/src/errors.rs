use quarry_pool::PoolError;
use thiserror::Error;

pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
	#[error("invalid column `{0}`: {1}")]
	InvalidColumn(String, String),

	#[error("invalid schema: {0}")]
	InvalidSchema(String),

	#[error(transparent)]
	Pool(#[from] PoolError),

	#[error("cannot read schema file: {0}")]
	Io(#[from] std::io::Error),
}
