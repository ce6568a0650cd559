//! The extract → transform → export pipeline
//!
//! A run reads every record from the image store, derives the `text` column
//! from each record's analysis document and writes the result to a single
//! Parquet file. The output is rebuilt from scratch on every run.

pub mod transform;
pub mod writer;

pub use transform::{parse_analysis, synthesize_row, synthesize_text, transform, RowFailure, Transformed};
pub use writer::{ensure_output_dir, export_schema, rows_to_batch, ExportWriter, TEXT_COLUMN};

use crate::error::SyncError;
use crate::extractor::extract_images;
use crate::types::SyncConfig;
use std::path::PathBuf;

/// Summary of a run that wrote an output file
#[derive(Debug)]
pub struct SyncReport {
    /// Rows written, always equal to the rows fetched
    pub rows: usize,

    /// Rows exported with empty text because their analysis failed to decode
    pub failed_rows: Vec<RowFailure>,

    pub output_path: PathBuf,
}

#[derive(Debug)]
pub enum SyncOutcome {
    /// The store had no rows; nothing was written
    Empty,
    Exported(SyncReport),
}

/// Run one sync: Extract → (stop if empty) → Transform → Export
pub fn run_sync(config: &SyncConfig) -> Result<SyncOutcome, SyncError> {
    tracing::info!("Connecting to database: {}", config.store_path.display());
    let records = extract_images(&config.store_path)?;
    tracing::info!(rows = records.len(), "Fetched {} records.", records.len());

    if records.is_empty() {
        tracing::info!("No data found. Exiting.");
        return Ok(SyncOutcome::Empty);
    }

    let Transformed { rows, failures } = transform(records);

    ensure_output_dir(&config.output_dir)?;
    let writer = ExportWriter::new(config.output_path());
    writer.write(&rows)?;
    tracing::info!("Data exported to {}", writer.output_path().display());

    Ok(SyncOutcome::Exported(SyncReport {
        rows: rows.len(),
        failed_rows: failures,
        output_path: writer.output_path().to_path_buf(),
    }))
}
