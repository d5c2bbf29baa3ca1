//! Project configuration (`quarry.toml`) and seed file loading

use anyhow::{Context, Result, bail};
use quarry_pool::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPaths {
	#[serde(default = "default_schema_path")]
	pub schema: PathBuf,
	#[serde(default = "default_seeds_path")]
	pub seeds: PathBuf,
}

fn default_schema_path() -> PathBuf {
	PathBuf::from("database/schema.toml")
}

fn default_seeds_path() -> PathBuf {
	PathBuf::from("database/seeds.toml")
}

impl Default for ProjectPaths {
	fn default() -> Self {
		Self {
			schema: default_schema_path(),
			seeds: default_seeds_path(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
	pub database: DatabaseConfig,
	#[serde(default)]
	pub paths: ProjectPaths,
}

impl ProjectConfig {
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			bail!(
				"{} not found; run `quarry init` to scaffold a project",
				path.display()
			);
		}
		let raw = std::fs::read_to_string(path)
			.with_context(|| format!("cannot read {}", path.display()))?;
		let config: Self = toml::from_str(&raw)
			.with_context(|| format!("cannot parse {}", path.display()))?;
		config.database.validate()?;
		Ok(config)
	}
}

/// Seed rows for one table, in insertion order
#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
	pub table: String,
	#[serde(default)]
	pub rows: Vec<toml::value::Table>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
	#[serde(default)]
	pub seeds: Vec<Seed>,
}

impl SeedFile {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)
			.with_context(|| format!("cannot read {}", path.display()))?;
		toml::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
	}
}
