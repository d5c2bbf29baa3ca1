//! `quarry seed` — insert seed rows

use crate::project::{ProjectConfig, SeedFile};
use anyhow::{Context, Result};
use console::style;
use quarry_pool::{SqlValue, global};
use quarry_query::Db;
use std::path::Path;

pub async fn run(config_path: &Path, file: Option<&Path>) -> Result<()> {
	let project = ProjectConfig::load(config_path)?;
	global().initialize(&project.database).await?;
	let result = apply(file.unwrap_or(&project.paths.seeds)).await;
	global().close_all().await;
	result
}

/// Insert every row of every seed table, against the already-initialized
/// global registry.
pub async fn apply(path: &Path) -> Result<()> {
	let seed_file = SeedFile::load(path)?;
	for seed in &seed_file.seeds {
		for row in &seed.rows {
			let values: Vec<(String, SqlValue)> = row
				.iter()
				.map(|(column, value)| (column.clone(), toml_to_sql(value)))
				.collect();
			Db::table(&seed.table)?
				.insert(values)
				.await
				.with_context(|| format!("seeding table `{}`", seed.table))?;
		}
		println!(
			"{} seeded {} rows into `{}`",
			style("✓").green(),
			seed.rows.len(),
			seed.table
		);
	}
	Ok(())
}

fn toml_to_sql(value: &toml::Value) -> SqlValue {
	match value {
		toml::Value::String(s) => SqlValue::String(s.clone()),
		toml::Value::Integer(i) => SqlValue::Int(*i),
		toml::Value::Float(f) => SqlValue::Float(*f),
		toml::Value::Boolean(b) => SqlValue::Bool(*b),
		toml::Value::Datetime(dt) => SqlValue::String(dt.to_string()),
		// Nested values are stored as their TOML text.
		other => SqlValue::String(other.to_string()),
	}
}
