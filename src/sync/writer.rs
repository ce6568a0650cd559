use crate::error::{SyncError, WriteError};
use crate::extractor::IMAGE_COLUMNS;
use crate::types::ExportRow;
use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the synthesized text column
pub const TEXT_COLUMN: &str = "text";

/// Arrow schema of the exported file: the six source columns followed by `text`
pub fn export_schema() -> SchemaRef {
    let mut fields = vec![Field::new(IMAGE_COLUMNS[0], DataType::Int64, false)];
    for name in &IMAGE_COLUMNS[1..] {
        fields.push(Field::new(*name, DataType::Utf8, true));
    }
    fields.push(Field::new(TEXT_COLUMN, DataType::Utf8, false));
    Arc::new(Schema::new(fields))
}

/// Build a single record batch holding every export row
pub fn rows_to_batch(rows: &[ExportRow]) -> Result<RecordBatch, arrow_schema::ArrowError> {
    let ids = Int64Array::from_iter_values(rows.iter().map(|r| r.record.id));
    let texts = StringArray::from_iter_values(rows.iter().map(|r| r.text.as_str()));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(ids),
        string_column(rows, |r| r.record.filename.as_deref()),
        string_column(rows, |r| r.record.path.as_deref()),
        string_column(rows, |r| r.record.analysis.as_deref()),
        string_column(rows, |r| r.record.metadata.as_deref()),
        string_column(rows, |r| r.record.created_at.as_deref()),
        Arc::new(texts),
    ];

    RecordBatch::try_new(export_schema(), columns)
}

fn string_column(rows: &[ExportRow], get: impl Fn(&ExportRow) -> Option<&str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(get).collect::<Vec<_>>()))
}

/// Writes export rows to a Parquet file, replacing it atomically
pub struct ExportWriter {
    output_path: PathBuf,
    props: WriterProperties,
}

impl ExportWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        ExportWriter {
            output_path: output_path.into(),
            props: WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Sibling path the file is staged at before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .output_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.output_path.with_file_name(name)
    }

    /// Serialize `rows` to the output path.
    ///
    /// The file is staged next to the destination and renamed into place, so
    /// a failed write leaves any previous file untouched.
    pub fn write(&self, rows: &[ExportRow]) -> Result<(), SyncError> {
        let staging = self.staging_path();

        let result = self
            .write_staged(&staging, rows)
            .and_then(|()| std::fs::rename(&staging, &self.output_path).map_err(WriteError::from));

        result.map_err(|source| {
            let _ = std::fs::remove_file(&staging);
            SyncError::Write {
                path: self.output_path.clone(),
                source,
            }
        })
    }

    fn write_staged(&self, staging: &Path, rows: &[ExportRow]) -> Result<(), WriteError> {
        let batch = rows_to_batch(rows)?;

        let file = File::create(staging)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.props.clone()))?;
        writer.write(&batch)?;
        let file = writer.into_inner()?;
        file.sync_all()?;

        Ok(())
    }
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<(), SyncError> {
    std::fs::create_dir_all(dir).map_err(|source| SyncError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageRecord;
    use arrow_array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn row(id: i64, text: &str) -> ExportRow {
        ExportRow {
            record: ImageRecord {
                id,
                filename: Some(format!("{}.jpg", id)),
                path: None,
                analysis: Some("{}".to_string()),
                metadata: Some("{}".to_string()),
                created_at: Some("2024-01-01".to_string()),
            },
            text: text.to_string(),
        }
    }

    fn read_back(path: &Path) -> Vec<RecordBatch> {
        let file = File::open(path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        reader.collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_schema_columns() {
        let schema = export_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "filename", "path", "analysis", "metadata", "created_at", "text"]
        );
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert!(!schema.field(6).is_nullable());
    }

    #[test]
    fn test_batch_keeps_nulls() {
        let batch = rows_to_batch(&[row(1, "hello")]).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert!(batch.column(2).is_null(0));
        assert!(!batch.column(1).is_null(0));
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.parquet");
        let writer = ExportWriter::new(&path);

        writer.write(&[row(1, "first"), row(2, "")]).unwrap();

        let batches = read_back(&path);
        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 2);

        let text = batches[0]
            .column_by_name("text")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(text.value(0), "first");
        assert_eq!(text.value(1), "");

        assert!(!dir.path().join("input.parquet.tmp").exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.parquet");
        std::fs::write(&path, b"stale").unwrap();

        ExportWriter::new(&path).write(&[row(5, "fresh")]).unwrap();

        let batches = read_back(&path);
        assert_eq!(batches[0].num_rows(), 1);
    }

    #[test]
    fn test_failed_write_leaves_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.parquet");
        std::fs::write(&path, b"previous").unwrap();
        // A directory in the staging slot makes File::create fail
        std::fs::create_dir(dir.path().join("input.parquet.tmp")).unwrap();

        let err = ExportWriter::new(&path).write(&[row(1, "x")]).unwrap_err();

        assert!(matches!(err, SyncError::Write { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn test_failed_rename_removes_staged_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.parquet");
        // A non-empty directory at the destination makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"data").unwrap();

        let err = ExportWriter::new(&path).write(&[row(1, "x")]).unwrap_err();

        assert!(matches!(err, SyncError::Write { source: WriteError::Io(_), .. }));
        assert!(!dir.path().join("input.parquet.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("ls-data").join("nested");

        ensure_output_dir(&nested).unwrap();
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_output_dir_fails_on_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("ls-data");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let err = ensure_output_dir(&blocker).unwrap_err();
        assert!(matches!(err, SyncError::CreateDir { .. }));
    }
}
