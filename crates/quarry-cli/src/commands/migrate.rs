//! `quarry migrate` — apply the declared schema

use crate::commands::seed;
use crate::project::ProjectConfig;
use anyhow::{Context, Result};
use console::style;
use quarry_pool::global;
use quarry_schema::{Schema, SchemaManager};
use std::path::Path;

pub async fn run(config_path: &Path, fresh: bool, with_seed: bool) -> Result<()> {
	let project = ProjectConfig::load(config_path)?;
	let schema = Schema::from_file(&project.paths.schema)
		.with_context(|| format!("cannot load {}", project.paths.schema.display()))?;

	global().initialize(&project.database).await?;
	let result = apply(&project, &schema, fresh, with_seed).await;
	global().close_all().await;
	result
}

async fn apply(
	project: &ProjectConfig,
	schema: &Schema,
	fresh: bool,
	with_seed: bool,
) -> Result<()> {
	let manager = SchemaManager::new(global().default_pool()?);
	if fresh {
		manager.drop_all(schema).await?;
		println!("{} dropped {} tables", style("✓").green(), schema.tables.len());
	}
	manager.create_all(schema).await?;
	println!(
		"{} created {} tables on pool `{}`",
		style("✓").green().bold(),
		schema.tables.len(),
		project.database.default
	);

	if with_seed {
		seed::apply(&project.paths.seeds).await?;
	}
	Ok(())
}
