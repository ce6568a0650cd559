//! Read back an exported Parquet file: column names and the first rows

use anyhow::{Context, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Row;
use std::fs::File;
use std::path::Path;

/// Schema and leading rows of a Parquet file
#[derive(Debug)]
pub struct Inspection {
    pub columns: Vec<String>,
    pub total_rows: i64,
    pub rows: Vec<Row>,
}

/// Open `path` and collect its column names plus up to `limit` rows
pub fn inspect_file(path: &Path, limit: usize) -> Result<Inspection> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("Failed to read Parquet footer of {}", path.display()))?;

    let file_meta = reader.metadata().file_metadata();
    let columns = file_meta
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let total_rows = file_meta.num_rows();

    let mut rows = Vec::with_capacity(limit);
    for row in reader.get_row_iter(None).context("Failed to iterate rows")?.take(limit) {
        rows.push(row.context("Failed to decode row")?);
    }

    Ok(Inspection {
        columns,
        total_rows,
        rows,
    })
}
