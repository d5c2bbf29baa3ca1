//! Dialect-aware DDL rendering

use crate::column::{Column, ColumnType, Table};
use crate::errors::SchemaResult;
use quarry_pool::Dialect;

const DEFAULT_STRING_SIZE: u32 = 255;
const DEFAULT_DECIMAL: (u8, u8) = (10, 2);

pub struct SqlGenerator {
	dialect: Dialect,
}

impl SqlGenerator {
	pub fn new(dialect: Dialect) -> Self {
		Self { dialect }
	}

	fn type_sql(&self, column: &Column) -> SchemaResult<String> {
		let sql = match column.column_type {
			ColumnType::Id => match self.dialect {
				Dialect::Postgres => "SERIAL PRIMARY KEY".to_string(),
				Dialect::Mysql => "INT AUTO_INCREMENT PRIMARY KEY".to_string(),
				Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
			},
			ColumnType::Integer => match self.dialect {
				Dialect::Mysql => "INT".to_string(),
				_ => "INTEGER".to_string(),
			},
			ColumnType::BigInteger => match self.dialect {
				Dialect::Sqlite => "INTEGER".to_string(),
				_ => "BIGINT".to_string(),
			},
			ColumnType::Boolean => match self.dialect {
				Dialect::Postgres => "BOOLEAN".to_string(),
				Dialect::Mysql => "TINYINT(1)".to_string(),
				Dialect::Sqlite => "INTEGER".to_string(),
			},
			ColumnType::String => {
				let size = column.size.unwrap_or(DEFAULT_STRING_SIZE);
				match self.dialect {
					Dialect::Sqlite => "TEXT".to_string(),
					_ => format!("VARCHAR({})", size),
				}
			}
			ColumnType::Text => "TEXT".to_string(),
			ColumnType::Float => match self.dialect {
				Dialect::Postgres => "DOUBLE PRECISION".to_string(),
				Dialect::Mysql => "DOUBLE".to_string(),
				Dialect::Sqlite => "REAL".to_string(),
			},
			ColumnType::Decimal => {
				let precision = column.precision.unwrap_or(DEFAULT_DECIMAL.0);
				let scale = column.scale.unwrap_or(DEFAULT_DECIMAL.1);
				match self.dialect {
					Dialect::Sqlite => "NUMERIC".to_string(),
					_ => format!("DECIMAL({}, {})", precision, scale),
				}
			}
			ColumnType::Timestamp => match self.dialect {
				Dialect::Mysql => "DATETIME".to_string(),
				_ => "TIMESTAMP".to_string(),
			},
			ColumnType::Date => "DATE".to_string(),
			ColumnType::Json => match self.dialect {
				Dialect::Postgres => "JSONB".to_string(),
				Dialect::Mysql => "JSON".to_string(),
				Dialect::Sqlite => "TEXT".to_string(),
			},
			ColumnType::Binary => match self.dialect {
				Dialect::Postgres => "BYTEA".to_string(),
				_ => "BLOB".to_string(),
			},
			ColumnType::Enum => {
				let quoted: Vec<String> = column
					.values
					.iter()
					.map(|value| format!("'{}'", value.replace('\'', "''")))
					.collect();
				match self.dialect {
					// Native ENUM exists only on MySQL; elsewhere a CHECK
					// constraint gives the same guarantee.
					Dialect::Mysql => format!("ENUM({})", quoted.join(", ")),
					_ => format!(
						"VARCHAR({}) CHECK ({} IN ({}))",
						DEFAULT_STRING_SIZE,
						column.name,
						quoted.join(", ")
					),
				}
			}
		};
		Ok(sql)
	}

	/// Render one column definition.
	pub fn column_sql(&self, column: &Column) -> SchemaResult<String> {
		column.validate()?;
		let mut sql = format!("{} {}", column.name, self.type_sql(column)?);
		if column.column_type == ColumnType::Id {
			// Id already carries PRIMARY KEY and its increment behavior.
			return Ok(sql);
		}
		if !column.nullable {
			sql.push_str(" NOT NULL");
		}
		if column.unique {
			sql.push_str(" UNIQUE");
		}
		if column.primary {
			sql.push_str(" PRIMARY KEY");
		}
		if column.auto_increment && self.dialect == Dialect::Mysql {
			sql.push_str(" AUTO_INCREMENT");
		}
		if let Some(default) = &column.default {
			sql.push_str(&format!(" DEFAULT {}", default));
		}
		Ok(sql)
	}

	/// Render `CREATE TABLE IF NOT EXISTS` for the whole table, foreign
	/// keys as table-level constraints.
	pub fn create_table(&self, table: &Table) -> SchemaResult<String> {
		table.validate()?;
		let mut parts = Vec::with_capacity(table.columns.len());
		for column in &table.columns {
			parts.push(self.column_sql(column)?);
		}
		for column in &table.columns {
			if let Some(reference) = &column.references {
				parts.push(format!(
					"FOREIGN KEY ({}) REFERENCES {}({})",
					column.name, reference.table, reference.column
				));
			}
		}
		Ok(format!(
			"CREATE TABLE IF NOT EXISTS {} ({})",
			table.name,
			parts.join(", ")
		))
	}

	pub fn drop_table(&self, table_name: &str) -> String {
		format!("DROP TABLE IF EXISTS {}", table_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::errors::SchemaError;
	use rstest::rstest;

	#[rstest]
	#[case(Dialect::Postgres, "SERIAL PRIMARY KEY")]
	#[case(Dialect::Mysql, "INT AUTO_INCREMENT PRIMARY KEY")]
	#[case(Dialect::Sqlite, "INTEGER PRIMARY KEY AUTOINCREMENT")]
	fn test_id_column_per_dialect(#[case] dialect: Dialect, #[case] expected: &str) {
		let sql = SqlGenerator::new(dialect).column_sql(&Column::id()).unwrap();
		assert_eq!(sql, format!("id {}", expected));
	}

	#[test]
	fn test_string_column_sizes() {
		let column = Column::new("email", ColumnType::String).size(190).unique();
		assert_eq!(
			SqlGenerator::new(Dialect::Mysql).column_sql(&column).unwrap(),
			"email VARCHAR(190) NOT NULL UNIQUE"
		);
		assert_eq!(
			SqlGenerator::new(Dialect::Sqlite).column_sql(&column).unwrap(),
			"email TEXT NOT NULL UNIQUE"
		);
	}

	#[test]
	fn test_enum_column_rendering() {
		let column = Column::new("status", ColumnType::Enum).values(["open", "closed"]);
		assert_eq!(
			SqlGenerator::new(Dialect::Mysql).column_sql(&column).unwrap(),
			"status ENUM('open', 'closed') NOT NULL"
		);
		let pg = SqlGenerator::new(Dialect::Postgres).column_sql(&column).unwrap();
		assert!(pg.contains("CHECK (status IN ('open', 'closed'))"), "{}", pg);
	}

	#[test]
	fn test_enum_without_values_rejected() {
		let column = Column::new("status", ColumnType::Enum);
		assert!(matches!(
			SqlGenerator::new(Dialect::Sqlite).column_sql(&column),
			Err(SchemaError::InvalidColumn(_, _))
		));
	}

	#[test]
	fn test_create_table_with_foreign_key() {
		let table = Table::new("posts")
			.column(Column::id())
			.column(Column::new("title", ColumnType::String))
			.column(
				Column::new("user_id", ColumnType::Integer).references("users", "id"),
			);
		let sql = SqlGenerator::new(Dialect::Sqlite).create_table(&table).unwrap();
		assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS posts ("), "{}", sql);
		assert!(
			sql.contains("FOREIGN KEY (user_id) REFERENCES users(id)"),
			"{}",
			sql
		);
	}

	#[test]
	fn test_nullable_and_default() {
		let column = Column::new("bio", ColumnType::Text).nullable();
		assert_eq!(
			SqlGenerator::new(Dialect::Postgres).column_sql(&column).unwrap(),
			"bio TEXT"
		);
		let column = Column::new("active", ColumnType::Boolean).default_expr("1");
		assert_eq!(
			SqlGenerator::new(Dialect::Sqlite).column_sql(&column).unwrap(),
			"active INTEGER NOT NULL DEFAULT 1"
		);
	}
}
