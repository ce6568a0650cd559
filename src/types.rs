use serde::Deserialize;
use std::path::PathBuf;

/// One row of the `images` table
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: i64,
    pub filename: Option<String>,
    pub path: Option<String>,

    /// JSON-encoded analysis document, decoded by the transformer
    pub analysis: Option<String>,

    /// Opaque JSON, passed through unmodified
    pub metadata: Option<String>,

    pub created_at: Option<String>,
}

/// The decoded `analysis` column. Fields other than these four are ignored.
///
/// Missing fields take their default. An explicit `null` is a type error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisDocument {
    pub summary: String,
    pub tags: Vec<String>,
    pub objects: Vec<String>,
    pub scene_type: String,
}

/// A source record plus its synthesized text - one row of the output file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub record: ImageRecord,
    pub text: String,
}

/// Configuration for a sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Location of the SQLite image store
    pub store_path: PathBuf,

    /// Directory the Parquet file is written into (created if missing)
    pub output_dir: PathBuf,

    /// File name of the Parquet file inside `output_dir`
    pub output_filename: String,
}

impl SyncConfig {
    pub fn new(
        store_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_filename: impl Into<String>,
    ) -> Self {
        SyncConfig {
            store_path: store_path.into(),
            output_dir: output_dir.into(),
            output_filename: output_filename.into(),
        }
    }

    /// Full path of the exported file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            store_path: PathBuf::from("images.db"),
            output_dir: PathBuf::from("ls-data"),
            output_filename: String::from("input.parquet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let config = SyncConfig::default();
        assert_eq!(config.output_path(), PathBuf::from("ls-data").join("input.parquet"));
        assert_eq!(config.store_path, PathBuf::from("images.db"));
    }

    #[test]
    fn test_analysis_defaults() {
        let doc: AnalysisDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, AnalysisDocument::default());
    }

    #[test]
    fn test_analysis_null_fields_are_errors() {
        for raw in [
            r#"{"summary": "A cat", "tags": null}"#,
            r#"{"objects": null}"#,
            r#"{"summary": null}"#,
            r#"{"scene_type": null}"#,
        ] {
            let result: Result<AnalysisDocument, _> = serde_json::from_str(raw);
            assert!(result.is_err(), "{} should not decode", raw);
        }
    }

    #[test]
    fn test_analysis_ignores_unknown_fields() {
        let doc: AnalysisDocument =
            serde_json::from_str(r#"{"summary": "A dog", "colors": ["red"], "confidence": 0.9}"#).unwrap();
        assert_eq!(doc.summary, "A dog");
    }

    #[test]
    fn test_analysis_rejects_wrong_field_type() {
        let result: Result<AnalysisDocument, _> = serde_json::from_str(r#"{"tags": "not-a-list"}"#);
        assert!(result.is_err());
    }
}
