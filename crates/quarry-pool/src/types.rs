//! Common value types shared between the pool and its collaborators

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Supported backend dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
	Postgres,
	Mysql,
	Sqlite,
}

impl Dialect {
	/// Positional placeholder for the `index`-th binding (1-based)
	pub fn placeholder(&self, index: usize) -> String {
		match self {
			Dialect::Postgres => format!("${}", index),
			Dialect::Mysql | Dialect::Sqlite => "?".to_string(),
		}
	}

	pub fn default_port(&self) -> u16 {
		match self {
			Dialect::Postgres => 5432,
			Dialect::Mysql => 3306,
			Dialect::Sqlite => 0,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Dialect::Postgres => "postgres",
			Dialect::Mysql => "mysql",
			Dialect::Sqlite => "sqlite",
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Unique identifier of one backend connection, assigned at creation.
///
/// Identity survives check-out/release cycles, which is what lets the
/// single-connection strategy recognize its own handle coming back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for ConnectionId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for ConnectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Bindable SQL value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Bytes(Vec<u8>),
	Timestamp(chrono::DateTime<chrono::Utc>),
}

impl From<&str> for SqlValue {
	fn from(s: &str) -> Self {
		SqlValue::String(s.to_string())
	}
}

impl From<String> for SqlValue {
	fn from(s: String) -> Self {
		SqlValue::String(s)
	}
}

impl From<i64> for SqlValue {
	fn from(i: i64) -> Self {
		SqlValue::Int(i)
	}
}

impl From<i32> for SqlValue {
	fn from(i: i32) -> Self {
		SqlValue::Int(i as i64)
	}
}

impl From<f64> for SqlValue {
	fn from(f: f64) -> Self {
		SqlValue::Float(f)
	}
}

impl From<bool> for SqlValue {
	fn from(b: bool) -> Self {
		SqlValue::Bool(b)
	}
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
	fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
		SqlValue::Timestamp(dt)
	}
}

impl<T> From<Option<T>> for SqlValue
where
	T: Into<SqlValue>,
{
	fn from(opt: Option<T>) -> Self {
		match opt {
			Some(v) => v.into(),
			None => SqlValue::Null,
		}
	}
}

/// Outcome of a statement execution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOutcome {
	pub rows_affected: u64,
	/// Auto-increment id of the last inserted row; `None` on backends
	/// without the concept (PostgreSQL callers use `RETURNING` instead).
	pub last_insert_id: Option<i64>,
}

/// Row from a query result
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
	pub data: HashMap<String, SqlValue>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: String, value: SqlValue) {
		self.data.insert(key, value);
	}

	pub fn get(&self, key: &str) -> Option<&SqlValue> {
		self.data.get(key)
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		match self.data.get(key) {
			Some(SqlValue::Int(i)) => Some(*i),
			_ => None,
		}
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		match self.data.get(key) {
			Some(SqlValue::String(s)) => Some(s.as_str()),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dialect_placeholders() {
		assert_eq!(Dialect::Postgres.placeholder(3), "$3");
		assert_eq!(Dialect::Mysql.placeholder(3), "?");
		assert_eq!(Dialect::Sqlite.placeholder(1), "?");
	}

	#[test]
	fn test_connection_ids_are_unique() {
		assert_ne!(ConnectionId::new(), ConnectionId::new());
	}

	#[test]
	fn test_sql_value_conversions() {
		assert_eq!(SqlValue::from("a"), SqlValue::String("a".to_string()));
		assert_eq!(SqlValue::from(7i32), SqlValue::Int(7));
		assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
		assert_eq!(SqlValue::from(Some(true)), SqlValue::Bool(true));
	}
}
