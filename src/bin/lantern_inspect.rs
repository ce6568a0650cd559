//! lantern-inspect: Print the columns and first rows of a Parquet file
//!
//! Usage:
//!   # Inspect the default export (ls-data/input.parquet)
//!   lantern-inspect
//!
//!   # Any other file, five rows
//!   lantern-inspect scopes/photos.parquet --rows 5

use anyhow::Result;
use clap::Parser;
use lantern::inspect::inspect_file;
use lantern::SyncConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lantern-inspect")]
#[command(about = "Show the schema and first rows of a Parquet file", long_about = None)]
struct Args {
    /// Parquet file (default: the sync output path)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Number of rows to print
    #[arg(long, default_value_t = 3)]
    rows: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args
        .input
        .unwrap_or_else(|| SyncConfig::default().output_path());

    if !path.exists() {
        println!("File not found: {}", path.display());
        return Ok(());
    }

    let inspection = inspect_file(&path, args.rows)?;

    println!("Columns: {:?}", inspection.columns);
    println!("\nFirst {} rows (of {}):", inspection.rows.len(), inspection.total_rows);
    for row in &inspection.rows {
        println!("{}", row);
    }

    Ok(())
}
