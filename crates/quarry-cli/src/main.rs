//! `quarry` — project tooling for the Quarry database runtime

mod commands;
mod project;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry", version, about = "Quarry database tooling")]
struct Cli {
	/// Path to the project config
	#[arg(long, global = true, default_value = "quarry.toml")]
	config: PathBuf,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Scaffold quarry.toml, a schema file and a seeds file
	Init,
	/// Create the declared tables
	Migrate {
		/// Drop all declared tables first
		#[arg(long)]
		fresh: bool,
		/// Insert seed rows after migrating
		#[arg(long)]
		seed: bool,
	},
	/// Insert seed rows
	Seed {
		/// Seed file to use instead of the configured one
		#[arg(long)]
		file: Option<PathBuf>,
	},
	/// Show per-pool connection stats
	Status,
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let cli = Cli::parse();
	match dispatch(cli).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{} {:#}", style("error:").red().bold(), err);
			ExitCode::FAILURE
		}
	}
}

async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Command::Init => commands::init::run(&cli.config),
		Command::Migrate { fresh, seed } => {
			commands::migrate::run(&cli.config, fresh, seed).await
		}
		Command::Seed { file } => commands::seed::run(&cli.config, file.as_deref()).await,
		Command::Status => commands::status::run(&cli.config).await,
	}
}
