//! Schema application through a pool

use crate::column::{Schema, Table};
use crate::errors::SchemaResult;
use crate::generator::SqlGenerator;
use quarry_pool::{ConnectionScope, SharedPool};
use tracing::info;

pub struct SchemaManager {
	pool: SharedPool,
}

impl SchemaManager {
	pub fn new(pool: SharedPool) -> Self {
		Self { pool }
	}

	/// Create every table in declaration order, so referenced tables can be
	/// declared before their dependents.
	pub async fn create_all(&self, schema: &Schema) -> SchemaResult<()> {
		schema.validate()?;
		let mut scope = ConnectionScope::acquire(self.pool.clone()).await?;
		let generator = SqlGenerator::new(scope.connection()?.dialect());
		for table in &schema.tables {
			let sql = match generator.create_table(table) {
				Ok(sql) => sql,
				Err(err) => {
					scope.release().await;
					return Err(err);
				}
			};
			if let Err(err) = scope.execute(&sql, &[]).await {
				scope.release().await;
				return Err(err.into());
			}
			info!(table = %table.name, "created table");
		}
		scope.release().await;
		Ok(())
	}

	/// Drop every table in reverse declaration order.
	pub async fn drop_all(&self, schema: &Schema) -> SchemaResult<()> {
		let mut scope = ConnectionScope::acquire(self.pool.clone()).await?;
		let generator = SqlGenerator::new(scope.connection()?.dialect());
		for table in schema.tables.iter().rev() {
			let sql = generator.drop_table(&table.name);
			if let Err(err) = scope.execute(&sql, &[]).await {
				scope.release().await;
				return Err(err.into());
			}
			info!(table = %table.name, "dropped table");
		}
		scope.release().await;
		Ok(())
	}

	pub async fn create_table(&self, table: &Table) -> SchemaResult<()> {
		let mut scope = ConnectionScope::acquire(self.pool.clone()).await?;
		let generator = SqlGenerator::new(scope.connection()?.dialect());
		let result = match generator.create_table(table) {
			Ok(sql) => scope.execute(&sql, &[]).await.map_err(Into::into),
			Err(err) => Err(err),
		};
		scope.release().await;
		result.map(|_| ())
	}

	pub async fn drop_table(&self, table_name: &str) -> SchemaResult<()> {
		let mut scope = ConnectionScope::acquire(self.pool.clone()).await?;
		let generator = SqlGenerator::new(scope.connection()?.dialect());
		let sql = generator.drop_table(table_name);
		let result = scope.execute(&sql, &[]).await;
		scope.release().await;
		result?;
		Ok(())
	}
}
