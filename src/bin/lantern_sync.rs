//! lantern-sync: Export the image catalog to Parquet for embedding tools
//!
//! Reads every row of the `images` table, builds a `text` column from each
//! row's analysis JSON and writes the result to a single Parquet file. The
//! file is rebuilt from scratch on every run.
//!
//! Usage:
//!   # images.db -> ls-data/input.parquet
//!   lantern-sync
//!
//!   # Different store and destination
//!   lantern-sync --db catalog.db --output-dir ./scopes --output-file photos.parquet
//!
//! Set RUST_LOG to change verbosity (default: lantern=info).

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use lantern::{run_sync, SyncConfig, SyncOutcome};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lantern-sync")]
#[command(about = "Export image analysis records to Parquet", long_about = None)]
struct Args {
    /// SQLite store holding the `images` table (default: images.db)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Directory to write into, created if missing (default: ls-data)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// File name inside the output directory (default: input.parquet)
    #[arg(long)]
    output_file: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lantern=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Build config
    let mut config = SyncConfig::default();
    if let Some(db) = args.db {
        config.store_path = db;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(file) = args.output_file {
        config.output_filename = file;
    }

    let outcome = run_sync(&config)
        .with_context(|| format!("Sync from {} failed", config.store_path.display()))?;

    if let SyncOutcome::Exported(report) = outcome {
        if !report.failed_rows.is_empty() {
            tracing::warn!(
                "{} of {} rows exported with empty text",
                report.failed_rows.len(),
                report.rows
            );
        }

        println!("\nTo visualize this data in Latent Scope:");
        println!("1. Run: ls-serve");
        println!("2. Go to http://localhost:5001");
        println!("3. Create a new scope using '{}'", report.output_path.display());
    }

    Ok(())
}
