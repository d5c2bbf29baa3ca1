//! Fluent SQL string builder
//!
//! Assembles plain SQL with positional bindings and executes it through a
//! [`ConnectionScope`], so the connection goes back to its pool on every
//! path. SQL is written with `?` placeholders and renumbered to `$n` for
//! PostgreSQL at render time.
//!
//! Identifiers are interpolated as given; this layer does no SQL parsing
//! and `raw()` fragments bypass binding entirely. Callers own identifier
//! hygiene.

use crate::errors::{QueryError, QueryResult};
use quarry_pool::{
	ConnectionScope, Dialect, QueryOutcome, Row, SharedPool, SqlValue,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
	And,
	Or,
}

struct WherePart {
	conjunction: Conjunction,
	fragment: String,
}

pub struct QueryBuilder {
	pool: SharedPool,
	table: String,
	columns: Vec<String>,
	wheres: Vec<WherePart>,
	where_params: Vec<SqlValue>,
	joins: Vec<String>,
	group_by: Vec<String>,
	order_by: Vec<String>,
	limit: Option<u64>,
	offset: Option<u64>,
}

impl QueryBuilder {
	pub fn new(pool: SharedPool, table: impl Into<String>) -> Self {
		Self {
			pool,
			table: table.into(),
			columns: Vec::new(),
			wheres: Vec::new(),
			where_params: Vec::new(),
			joins: Vec::new(),
			group_by: Vec::new(),
			order_by: Vec::new(),
			limit: None,
			offset: None,
		}
	}

	pub fn select<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.columns.extend(columns.into_iter().map(Into::into));
		self
	}

	fn push_where(&mut self, conjunction: Conjunction, fragment: String) {
		self.wheres.push(WherePart {
			conjunction,
			fragment,
		});
	}

	pub fn where_op(mut self, column: &str, op: &str, value: impl Into<SqlValue>) -> Self {
		self.push_where(Conjunction::And, format!("{} {} ?", column, op));
		self.where_params.push(value.into());
		self
	}

	pub fn where_eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
		self.where_op(column, "=", value)
	}

	pub fn or_where_op(mut self, column: &str, op: &str, value: impl Into<SqlValue>) -> Self {
		self.push_where(Conjunction::Or, format!("{} {} ?", column, op));
		self.where_params.push(value.into());
		self
	}

	pub fn or_where_eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
		self.or_where_op(column, "=", value)
	}

	pub fn where_in<I, V>(mut self, column: &str, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<SqlValue>,
	{
		let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
		if values.is_empty() {
			// IN () is invalid SQL; an empty set matches nothing.
			self.push_where(Conjunction::And, "1 = 0".to_string());
			return self;
		}
		let placeholders = vec!["?"; values.len()].join(", ");
		self.push_where(
			Conjunction::And,
			format!("{} IN ({})", column, placeholders),
		);
		self.where_params.extend(values);
		self
	}

	pub fn where_null(mut self, column: &str) -> Self {
		self.push_where(Conjunction::And, format!("{} IS NULL", column));
		self
	}

	pub fn where_not_null(mut self, column: &str) -> Self {
		self.push_where(Conjunction::And, format!("{} IS NOT NULL", column));
		self
	}

	/// Raw predicate with its own bindings. Not inspected or quoted.
	pub fn where_raw<I>(mut self, fragment: &str, params: I) -> Self
	where
		I: IntoIterator<Item = SqlValue>,
	{
		self.push_where(Conjunction::And, fragment.to_string());
		self.where_params.extend(params);
		self
	}

	pub fn left_join(mut self, table: &str, left: &str, right: &str) -> Self {
		self.joins
			.push(format!("LEFT JOIN {} ON {} = {}", table, left, right));
		self
	}

	pub fn inner_join(mut self, table: &str, left: &str, right: &str) -> Self {
		self.joins
			.push(format!("INNER JOIN {} ON {} = {}", table, left, right));
		self
	}

	pub fn group_by(mut self, column: &str) -> Self {
		self.group_by.push(column.to_string());
		self
	}

	pub fn order_by(mut self, column: &str) -> Self {
		self.order_by.push(format!("{} ASC", column));
		self
	}

	pub fn order_by_desc(mut self, column: &str) -> Self {
		self.order_by.push(format!("{} DESC", column));
		self
	}

	pub fn limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);
		self
	}

	fn where_sql(&self) -> String {
		let mut sql = String::new();
		for (index, part) in self.wheres.iter().enumerate() {
			if index == 0 {
				sql.push_str(" WHERE ");
			} else {
				sql.push_str(match part.conjunction {
					Conjunction::And => " AND ",
					Conjunction::Or => " OR ",
				});
			}
			sql.push_str(&part.fragment);
		}
		sql
	}

	/// Render the SELECT statement for `dialect`.
	pub fn to_sql(&self, dialect: Dialect) -> String {
		let columns = if self.columns.is_empty() {
			"*".to_string()
		} else {
			self.columns.join(", ")
		};
		let mut sql = format!("SELECT {} FROM {}", columns, self.table);
		for join in &self.joins {
			sql.push(' ');
			sql.push_str(join);
		}
		sql.push_str(&self.where_sql());
		if !self.group_by.is_empty() {
			sql.push_str(" GROUP BY ");
			sql.push_str(&self.group_by.join(", "));
		}
		if !self.order_by.is_empty() {
			sql.push_str(" ORDER BY ");
			sql.push_str(&self.order_by.join(", "));
		}
		if let Some(limit) = self.limit {
			sql.push_str(&format!(" LIMIT {}", limit));
		}
		if let Some(offset) = self.offset {
			sql.push_str(&format!(" OFFSET {}", offset));
		}
		number_placeholders(&sql, dialect)
	}

	async fn scope(&self) -> QueryResult<ConnectionScope> {
		Ok(ConnectionScope::acquire(self.pool.clone()).await?)
	}

	pub async fn get(self) -> QueryResult<Vec<Row>> {
		let mut scope = self.scope().await?;
		let dialect = scope.connection()?.dialect();
		let sql = self.to_sql(dialect);
		debug!(%sql, "running select");
		let result = scope.fetch_all(&sql, &self.where_params).await;
		scope.release().await;
		Ok(result?)
	}

	pub async fn first(self) -> QueryResult<Option<Row>> {
		let rows = self.limit(1).get().await?;
		Ok(rows.into_iter().next())
	}

	pub async fn count(self) -> QueryResult<i64> {
		let counted = Self {
			columns: vec!["COUNT(*) AS aggregate".to_string()],
			order_by: Vec::new(),
			..self
		};
		let rows = counted.get().await?;
		rows.first()
			.and_then(|row| row.get_int("aggregate"))
			.ok_or_else(|| QueryError::InvalidQuery("count returned no aggregate row".into()))
	}

	pub async fn exists(self) -> QueryResult<bool> {
		Ok(self.count().await? > 0)
	}

	pub async fn insert<I, S>(self, values: I) -> QueryResult<QueryOutcome>
	where
		I: IntoIterator<Item = (S, SqlValue)>,
		S: Into<String>,
	{
		let (columns, params): (Vec<String>, Vec<SqlValue>) = values
			.into_iter()
			.map(|(column, value)| (column.into(), value))
			.unzip();
		if columns.is_empty() {
			return Err(QueryError::InvalidQuery("insert with no values".into()));
		}
		let placeholders = vec!["?"; columns.len()].join(", ");
		let sql = format!(
			"INSERT INTO {} ({}) VALUES ({})",
			self.table,
			columns.join(", "),
			placeholders
		);

		let mut scope = self.scope().await?;
		let dialect = scope.connection()?.dialect();
		let sql = number_placeholders(&sql, dialect);
		debug!(%sql, "running insert");
		let result = scope.execute(&sql, &params).await;
		scope.release().await;
		Ok(result?)
	}

	pub async fn update<I, S>(self, values: I) -> QueryResult<u64>
	where
		I: IntoIterator<Item = (S, SqlValue)>,
		S: Into<String>,
	{
		let (columns, mut params): (Vec<String>, Vec<SqlValue>) = values
			.into_iter()
			.map(|(column, value)| (column.into(), value))
			.unzip();
		if columns.is_empty() {
			return Err(QueryError::InvalidQuery("update with no values".into()));
		}
		let assignments = columns
			.iter()
			.map(|column| format!("{} = ?", column))
			.collect::<Vec<_>>()
			.join(", ");
		let sql = format!(
			"UPDATE {} SET {}{}",
			self.table,
			assignments,
			self.where_sql()
		);
		params.extend(self.where_params.iter().cloned());

		let mut scope = self.scope().await?;
		let dialect = scope.connection()?.dialect();
		let sql = number_placeholders(&sql, dialect);
		debug!(%sql, "running update");
		let result = scope.execute(&sql, &params).await;
		scope.release().await;
		Ok(result?.rows_affected)
	}

	pub async fn delete(self) -> QueryResult<u64> {
		let sql = format!("DELETE FROM {}{}", self.table, self.where_sql());

		let mut scope = self.scope().await?;
		let dialect = scope.connection()?.dialect();
		let sql = number_placeholders(&sql, dialect);
		debug!(%sql, "running delete");
		let result = scope.execute(&sql, &self.where_params).await;
		scope.release().await;
		Ok(result?.rows_affected)
	}
}

/// Renumber `?` placeholders into the dialect's positional form (`$1..$n`
/// on PostgreSQL, `?` everywhere else).
///
/// Purely positional: a literal `?` inside a string constant would be
/// renumbered too, which is the documented limit of this layer.
fn number_placeholders(sql: &str, dialect: Dialect) -> String {
	if dialect != Dialect::Postgres {
		return sql.to_string();
	}
	let mut out = String::with_capacity(sql.len() + 8);
	let mut index = 0;
	for ch in sql.chars() {
		if ch == '?' {
			index += 1;
			out.push_str(&dialect.placeholder(index));
		} else {
			out.push(ch);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_number_placeholders_postgres_only() {
		assert_eq!(
			number_placeholders("a = ? AND b IN (?, ?)", Dialect::Postgres),
			"a = $1 AND b IN ($2, $3)"
		);
		assert_eq!(
			number_placeholders("a = ? AND b = ?", Dialect::Sqlite),
			"a = ? AND b = ?"
		);
	}
}
