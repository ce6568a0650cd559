use crate::error::SyncError;
use crate::types::ImageRecord;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, OpenFlags, Row};
use std::path::Path;

/// The fixed projection read from the store
pub const IMAGE_QUERY: &str =
    "SELECT id, filename, path, analysis, metadata, created_at FROM images";

/// Column names of the projection, in query order
pub const IMAGE_COLUMNS: [&str; 6] = ["id", "filename", "path", "analysis", "metadata", "created_at"];

/// Read every image record from the SQLite store at `store_path`.
///
/// The store is opened read-only and the connection is dropped before
/// returning, whether or not the query succeeded. A missing file or a file
/// that is not a database is a `SyncError::Connection`; a missing table or
/// column is a `SyncError::Query`. Every `id` must be an SQLite INTEGER,
/// otherwise the run stops with `SyncError::InvalidId`.
pub fn extract_images(store_path: &Path) -> Result<Vec<ImageRecord>, SyncError> {
    let conn = open_store(store_path)?;
    read_images(&conn, store_path)
}

fn open_store(store_path: &Path) -> Result<Connection, SyncError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    Connection::open_with_flags(store_path, flags).map_err(|source| SyncError::Connection {
        path: store_path.to_path_buf(),
        source,
    })
}

fn read_images(conn: &Connection, store_path: &Path) -> Result<Vec<ImageRecord>, SyncError> {
    let classify = |err: rusqlite::Error| classify_error(store_path, err);

    let mut stmt = conn.prepare(IMAGE_QUERY).map_err(classify)?;
    let mut rows = stmt.query([]).map_err(classify)?;

    let mut images = Vec::new();
    while let Some(row) = rows.next().map_err(classify)? {
        let id = match row.get_ref(0).map_err(classify)? {
            ValueRef::Integer(id) => id,
            other => {
                return Err(SyncError::InvalidId {
                    row: images.len(),
                    found: storage_class(other),
                })
            }
        };
        images.push(image_from_row(id, row).map_err(classify)?);
    }

    Ok(images)
}

fn image_from_row(id: i64, row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id,
        filename: text_column(row, 1)?,
        path: text_column(row, 2)?,
        analysis: text_column(row, 3)?,
        metadata: text_column(row, 4)?,
        created_at: text_column(row, 5)?,
    })
}

fn storage_class(value: ValueRef<'_>) -> &'static str {
    match value {
        ValueRef::Null => "NULL",
        ValueRef::Integer(_) => "INTEGER",
        ValueRef::Real(_) => "REAL",
        ValueRef::Text(_) => "TEXT",
        ValueRef::Blob(_) => "BLOB",
    }
}

/// SQLite columns are dynamically typed, so accept any storage class and
/// render it as text. NULL stays `None`.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    };
    Ok(value)
}

/// Opening is lazy in SQLite: a file that is not a database only fails once
/// the first statement is prepared. Report that as a connection failure.
fn classify_error(store_path: &Path, err: rusqlite::Error) -> SyncError {
    match err.sqlite_error_code() {
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::CannotOpen) => SyncError::Connection {
            path: store_path.to_path_buf(),
            source: err,
        },
        _ => SyncError::Query(err),
    }
}
