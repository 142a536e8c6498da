use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use web_quiz::catalog::{export_catalog, import_catalog};
use web_quiz::db;
use web_quiz::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories, questions and choices from csv files in a directory
    Import { path: PathBuf },
    /// Export categories, questions and choices as csv files into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pool = db::establish_connection(&cli.db_path.display().to_string())
        .await
        .context("Cannot connect to DB")?;
    db::run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => export_catalog(&pool, &path).await.context("Cannot export"),
        Commands::Import { path } => import_catalog(&pool, &path).await.context("Cannot import"),
    }
}
