mod cli;
mod db;
mod error;
mod models;
mod run;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // stdout carries command output; diagnostics go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db_path = match cli.db {
        Some(path) => path,
        None => get_db_path()?,
    };
    tracing::debug!(path = %db_path.display(), "using database");

    run::command(cli.command, &db_path)
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-tracker", "ExpenseTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("expense.db"))
}
