//! `quarry status` — per-pool stats snapshots

use crate::project::ProjectConfig;
use anyhow::Result;
use console::style;
use quarry_pool::global;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
	let project = ProjectConfig::load(config_path)?;
	global().initialize(&project.database).await?;

	for (name, stats) in global().stats().await {
		let marker = if name == project.database.default {
			style("*").yellow().bold().to_string()
		} else {
			" ".to_string()
		};
		println!(
			"{} {} [{}] connections {}/{} (idle {}, max idle {}), idle timeout {}s, concurrent: {}",
			marker,
			style(&name).bold(),
			stats.strategy,
			stats.current_connections,
			stats.max_size,
			stats.idle_connections,
			stats.max_idle,
			stats.idle_timeout_secs,
			stats.is_concurrent,
		);
	}

	global().close_all().await;
	Ok(())
}
