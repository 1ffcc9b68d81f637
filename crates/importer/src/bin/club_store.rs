use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use importer::{ImporterError, check_store, import_records, init_store, read_document};
use storage::{error::StorageError, store::JsonFileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "club-store")]
#[command(about = "Chess club student store maintenance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "STUDENTS_DB_PATH", default_value = "data/students.json")]
    db: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty store
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Report corrupted records and duplicate ids
    Check,
    /// Append students from another store document
    Import {
        file: PathBuf,

        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("club_store={},importer={},storage={}", log_level, log_level, log_level)
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    match cli.command {
        Commands::Init { force } => {
            init_store(&cli.db, force)
                .await
                .context("Failed to initialize store")?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => handle_check(&cli.db).await,
        Commands::Import { file, dry_run } => {
            handle_import(&cli.db, &file, dry_run).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn handle_check(db: &Path) -> anyhow::Result<ExitCode> {
    tracing::info!("Checking store {}", db.display());

    let store = JsonFileStore::new(db);
    let report = check_store(&store)
        .await
        .map_err(|e| missing_store_hint(e, db))
        .context("Failed to check store")?;
    report.log();

    if report.is_clean() {
        tracing::info!("✓ Store is clean");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(
            "Found {} corrupted record(s) and {} duplicate id(s)",
            report.corrupted.len(),
            report.duplicates.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

async fn handle_import(db: &Path, file: &Path, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!("Loading students from: {}", file.display());

    let document = read_document(file)
        .await
        .context("Failed to read import file")?;
    tracing::info!("Loaded {} incoming record(s)", document.students.len());

    let store = JsonFileStore::new(db);
    let report = import_records(&store, document.students, dry_run)
        .await
        .map_err(|e| missing_store_hint(e, db))
        .context("Failed to import students")?;
    report.log();

    tracing::info!("✓ Import completed successfully!");
    Ok(())
}

fn missing_store_hint(error: ImporterError, db: &Path) -> ImporterError {
    match error {
        ImporterError::StorageError(StorageError::StoreMissing) => {
            ImporterError::StoreMissing(db.to_path_buf())
        }
        other => other,
    }
}
