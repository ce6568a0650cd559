use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to open image store {}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to query image store")]
    Query(#[source] rusqlite::Error),

    /// The `id` column must hold integers
    #[error("row {row} of the image store has a non-integer id ({found})")]
    InvalidId { row: usize, found: &'static str },

    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

/// Underlying cause of a failed export
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Per-row failure while decoding `analysis`. Never fatal.
#[derive(Debug, Error)]
pub enum RowTransformError {
    #[error("invalid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("analysis must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}
