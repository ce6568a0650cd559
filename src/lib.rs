//! # Lantern - image analysis export for embedding tools
//!
//! Pulls image analysis records out of a SQLite catalog, turns each record's
//! JSON analysis into a short text description and writes everything to a
//! Parquet file that embedding and visualization tools can load directly.
//!
//! ## Modules
//!
//! - **extractor**: Read the `images` table from the SQLite store
//! - **sync**: Transform records and export them to Parquet
//! - **inspect**: Read an exported file back (schema and first rows)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lantern::{run_sync, SyncConfig, SyncOutcome};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SyncConfig::default(); // images.db -> ls-data/input.parquet
//!
//! match run_sync(&config)? {
//!     SyncOutcome::Empty => println!("nothing to export"),
//!     SyncOutcome::Exported(report) => {
//!         println!("{} rows -> {}", report.rows, report.output_path.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Text synthesis
//!
//! ```rust
//! use lantern::sync::{parse_analysis, synthesize_text};
//!
//! let doc = parse_analysis(Some(r#"{"summary":"A cat","tags":["pet","cat"]}"#)).unwrap();
//! assert_eq!(synthesize_text(&doc), "A cat\nTags: pet cat\nObjects: \nScene: ");
//! ```

pub mod error;
pub mod extractor;
pub mod inspect;
pub mod sync;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{RowTransformError, SyncError, WriteError};
pub use extractor::extract_images;
pub use sync::{run_sync, SyncOutcome, SyncReport};
pub use types::{AnalysisDocument, ExportRow, ImageRecord, SyncConfig};
