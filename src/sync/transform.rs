use crate::error::RowTransformError;
use crate::types::{AnalysisDocument, ExportRow, ImageRecord};
use serde::Deserialize;
use serde_json::Value;

/// A row whose `analysis` could not be decoded
#[derive(Debug)]
pub struct RowFailure {
    pub id: i64,
    pub error: RowTransformError,
}

/// Output of the transform step: one export row per input record, plus the
/// failures that degraded some of those rows to empty text
#[derive(Debug, Default)]
pub struct Transformed {
    pub rows: Vec<ExportRow>,
    pub failures: Vec<RowFailure>,
}

/// Decode an `analysis` column value. Absent or empty input is the empty document.
pub fn parse_analysis(raw: Option<&str>) -> Result<AnalysisDocument, RowTransformError> {
    let raw = match raw {
        None | Some("") => return Ok(AnalysisDocument::default()),
        Some(raw) => raw,
    };

    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(RowTransformError::NotAnObject {
            found: json_kind(&value),
        });
    }

    Ok(AnalysisDocument::deserialize(value)?)
}

/// Render the embedding text for one document
pub fn synthesize_text(doc: &AnalysisDocument) -> String {
    format!(
        "{}\nTags: {}\nObjects: {}\nScene: {}",
        doc.summary,
        doc.tags.join(" "),
        doc.objects.join(" "),
        doc.scene_type
    )
}

/// Synthesized text for a single record
pub fn synthesize_row(record: &ImageRecord) -> Result<String, RowTransformError> {
    let doc = parse_analysis(record.analysis.as_deref())?;
    Ok(synthesize_text(&doc))
}

/// Attach synthesized text to every record, preserving order and count.
///
/// A record that fails to decode keeps its place with empty text and is
/// listed in `failures`.
pub fn transform(records: Vec<ImageRecord>) -> Transformed {
    let mut out = Transformed {
        rows: Vec::with_capacity(records.len()),
        failures: Vec::new(),
    };

    for record in records {
        let text = match synthesize_row(&record) {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(id = record.id, %error, "Error parsing row {}", record.id);
                out.failures.push(RowFailure { id: record.id, error });
                String::new()
            }
        };
        out.rows.push(ExportRow { record, text });
    }

    out
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
