//! Column and table value objects
//!
//! Plain serde structs so a whole schema loads from TOML, with builder
//! methods for programmatic declaration.

use crate::errors::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
	/// Auto-incrementing integer primary key.
	Id,
	Integer,
	BigInteger,
	Boolean,
	String,
	Text,
	Float,
	Decimal,
	Timestamp,
	Date,
	Json,
	Binary,
	Enum,
}

/// Foreign key reference to another table's column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignRef {
	pub table: String,
	pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	#[serde(rename = "type")]
	pub column_type: ColumnType,
	#[serde(default)]
	pub size: Option<u32>,
	#[serde(default)]
	pub precision: Option<u8>,
	#[serde(default)]
	pub scale: Option<u8>,
	#[serde(default)]
	pub nullable: bool,
	#[serde(default)]
	pub unique: bool,
	#[serde(default)]
	pub primary: bool,
	#[serde(default)]
	pub auto_increment: bool,
	/// Rendered verbatim into `DEFAULT ...`; quote string literals yourself.
	#[serde(default)]
	pub default: Option<String>,
	/// Allowed values for [`ColumnType::Enum`].
	#[serde(default)]
	pub values: Vec<String>,
	#[serde(default)]
	pub references: Option<ForeignRef>,
}

impl Column {
	pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
		Self {
			name: name.into(),
			column_type,
			size: None,
			precision: None,
			scale: None,
			nullable: false,
			unique: false,
			primary: false,
			auto_increment: false,
			default: None,
			values: Vec::new(),
			references: None,
		}
	}

	pub fn id() -> Self {
		Self::new("id", ColumnType::Id)
	}

	pub fn size(mut self, size: u32) -> Self {
		self.size = Some(size);
		self
	}

	pub fn precision(mut self, precision: u8, scale: u8) -> Self {
		self.precision = Some(precision);
		self.scale = Some(scale);
		self
	}

	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	pub fn unique(mut self) -> Self {
		self.unique = true;
		self
	}

	pub fn primary(mut self) -> Self {
		self.primary = true;
		self
	}

	pub fn auto_increment(mut self) -> Self {
		self.auto_increment = true;
		self
	}

	pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
		self.default = Some(expr.into());
		self
	}

	pub fn values<I, S>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.values = values.into_iter().map(Into::into).collect();
		self
	}

	pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
		self.references = Some(ForeignRef {
			table: table.into(),
			column: column.into(),
		});
		self
	}

	pub fn validate(&self) -> SchemaResult<()> {
		if self.name.is_empty() {
			return Err(SchemaError::InvalidSchema("column with empty name".into()));
		}
		if self.column_type == ColumnType::Enum && self.values.is_empty() {
			return Err(SchemaError::InvalidColumn(
				self.name.clone(),
				"enum column declares no values".into(),
			));
		}
		if self.column_type != ColumnType::Enum && !self.values.is_empty() {
			return Err(SchemaError::InvalidColumn(
				self.name.clone(),
				"values are only valid on enum columns".into(),
			));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
	pub name: String,
	#[serde(default)]
	pub columns: Vec<Column>,
}

impl Table {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			columns: Vec::new(),
		}
	}

	pub fn column(mut self, column: Column) -> Self {
		self.columns.push(column);
		self
	}

	pub fn validate(&self) -> SchemaResult<()> {
		if self.name.is_empty() {
			return Err(SchemaError::InvalidSchema("table with empty name".into()));
		}
		if self.columns.is_empty() {
			return Err(SchemaError::InvalidSchema(format!(
				"table `{}` declares no columns",
				self.name
			)));
		}
		for column in &self.columns {
			column.validate()?;
		}
		Ok(())
	}
}

/// Whole-database schema, the unit loaded from `database/schema.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
	pub tables: Vec<Table>,
}

impl Schema {
	pub fn new() -> Self {
		Self { tables: Vec::new() }
	}

	pub fn table(mut self, table: Table) -> Self {
		self.tables.push(table);
		self
	}

	pub fn from_toml_str(raw: &str) -> SchemaResult<Self> {
		let schema: Self = toml::from_str(raw)
			.map_err(|err| SchemaError::InvalidSchema(err.to_string()))?;
		schema.validate()?;
		Ok(schema)
	}

	pub fn from_file(path: impl AsRef<std::path::Path>) -> SchemaResult<Self> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml_str(&raw)
	}

	pub fn validate(&self) -> SchemaResult<()> {
		for table in &self.tables {
			table.validate()?;
		}
		Ok(())
	}
}

impl Default for Schema {
	fn default() -> Self {
		Self::new()
	}
}
