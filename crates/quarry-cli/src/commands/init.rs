//! `quarry init` — scaffold a project

use anyhow::{Context, Result, bail};
use console::style;
use std::path::Path;

const PROJECT_TEMPLATE: &str = r#"[database]
default = "main"

[database.pools.main]
url = "sqlite://quarry.db"
strategy = "queue"
max_size = 10
max_idle = 5
idle_timeout_secs = 30
"#;

const SCHEMA_TEMPLATE: &str = r#"[[tables]]
name = "users"

[[tables.columns]]
name = "id"
type = "id"

[[tables.columns]]
name = "name"
type = "string"

[[tables.columns]]
name = "email"
type = "string"
unique = true
"#;

const SEEDS_TEMPLATE: &str = r#"[[seeds]]
table = "users"

[[seeds.rows]]
name = "ada"
email = "ada@example.com"
"#;

pub fn run(config_path: &Path) -> Result<()> {
	if config_path.exists() {
		bail!("{} already exists", config_path.display());
	}

	write_file(config_path, PROJECT_TEMPLATE)?;
	write_file(Path::new("database/schema.toml"), SCHEMA_TEMPLATE)?;
	write_file(Path::new("database/seeds.toml"), SEEDS_TEMPLATE)?;

	println!(
		"{} project scaffolded; edit {} and run `quarry migrate`",
		style("✓").green().bold(),
		config_path.display()
	);
	Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
	if path.exists() {
		println!("{} {} exists, skipping", style("-").dim(), path.display());
		return Ok(());
	}
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent)
			.with_context(|| format!("cannot create {}", parent.display()))?;
	}
	std::fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))?;
	println!("{} wrote {}", style("✓").green(), path.display());
	Ok(())
}
