//! Entity trait and row bridging
//!
//! Rows are bridged to structs through `serde_json` values, so any struct
//! deriving `Serialize` + `Deserialize` with column-named fields maps
//! without a bespoke derive macro.

use crate::collection::Collection;
use crate::errors::{EntityError, EntityResult};
use crate::pluralize::{pluralize, snake_case};
use quarry_pool::{Row, SharedPool, SqlValue};
use quarry_query::QueryBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A struct mapped to one table row.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
	/// Table name. Defaults to the pluralized snake_case type name
	/// (`BlogPost` maps to `blog_posts`).
	fn table() -> String {
		let type_name = std::any::type_name::<Self>();
		let short = type_name.rsplit("::").next().unwrap_or(type_name);
		pluralize(&snake_case(short))
	}

	fn primary_key() -> &'static str {
		"id"
	}

	/// Primary key value; `None` before the first save.
	fn id(&self) -> Option<i64>;

	/// Set the primary key after an insert assigns one.
	fn set_id(&mut self, id: i64);
}

fn sql_to_json(value: &SqlValue) -> Value {
	match value {
		SqlValue::Null => Value::Null,
		SqlValue::Bool(b) => Value::Bool(*b),
		SqlValue::Int(i) => Value::from(*i),
		SqlValue::Float(f) => serde_json::Number::from_f64(*f)
			.map(Value::Number)
			.unwrap_or(Value::Null),
		SqlValue::String(s) => Value::String(s.clone()),
		SqlValue::Bytes(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
		SqlValue::Timestamp(dt) => Value::String(dt.to_rfc3339()),
	}
}

fn json_to_sql(value: &Value) -> SqlValue {
	match value {
		Value::Null => SqlValue::Null,
		Value::Bool(b) => SqlValue::Bool(*b),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				SqlValue::Int(i)
			} else {
				SqlValue::Float(n.as_f64().unwrap_or(0.0))
			}
		}
		Value::String(s) => SqlValue::String(s.clone()),
		// Nested structures are stored as their JSON text.
		other => SqlValue::String(other.to_string()),
	}
}

/// Convert a result row into an entity.
pub fn from_row<T: Entity>(row: &Row) -> EntityResult<T> {
	let mut object = serde_json::Map::with_capacity(row.data.len());
	for (column, value) in &row.data {
		object.insert(column.clone(), sql_to_json(value));
	}
	serde_json::from_value(Value::Object(object))
		.map_err(|err| EntityError::Mapping(err.to_string()))
}

/// Convert an entity into `(column, value)` pairs, primary key excluded.
pub fn to_columns<T: Entity>(entity: &T) -> EntityResult<Vec<(String, SqlValue)>> {
	let value =
		serde_json::to_value(entity).map_err(|err| EntityError::Mapping(err.to_string()))?;
	let Value::Object(object) = value else {
		return Err(EntityError::Mapping(
			"entity did not serialize to an object".into(),
		));
	};
	Ok(object
		.iter()
		.filter(|(column, _)| column.as_str() != T::primary_key())
		.map(|(column, value)| (column.clone(), json_to_sql(value)))
		.collect())
}

/// Load the entity with the given primary key.
pub async fn find<T: Entity>(pool: SharedPool, id: i64) -> EntityResult<Option<T>> {
	let row = QueryBuilder::new(pool, T::table())
		.where_eq(T::primary_key(), id)
		.first()
		.await?;
	row.as_ref().map(from_row).transpose()
}

/// Load every row of the entity's table.
pub async fn all<T: Entity>(pool: SharedPool) -> EntityResult<Collection<T>> {
	let rows = QueryBuilder::new(pool, T::table())
		.order_by(T::primary_key())
		.get()
		.await?;
	let mut items = Vec::with_capacity(rows.len());
	for row in &rows {
		items.push(from_row(row)?);
	}
	Ok(Collection::from(items))
}

/// Insert the entity, or update it when it already has a primary key.
pub async fn save<T: Entity>(pool: SharedPool, entity: &mut T) -> EntityResult<()> {
	let columns = to_columns(entity)?;
	match entity.id() {
		Some(id) => {
			QueryBuilder::new(pool, T::table())
				.where_eq(T::primary_key(), id)
				.update(columns)
				.await?;
		}
		None => {
			let outcome = QueryBuilder::new(pool, T::table()).insert(columns).await?;
			if let Some(id) = outcome.last_insert_id {
				entity.set_id(id);
			}
		}
	}
	Ok(())
}

/// Delete the entity's row. Returns the number of rows removed.
pub async fn delete<T: Entity>(pool: SharedPool, entity: &T) -> EntityResult<u64> {
	let Some(id) = entity.id() else {
		return Ok(0);
	};
	Ok(QueryBuilder::new(pool, T::table())
		.where_eq(T::primary_key(), id)
		.delete()
		.await?)
}
