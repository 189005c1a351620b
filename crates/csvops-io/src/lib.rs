//! CSV sources and sinks for csvops.
//!
//! Every operation here streams records from disk through the row-level
//! logic in `csvops-core` and writes results back out.
//!
//! # Features
//!
//! - **Reading**: Ragged rows, BOM stripping, configurable delimiter
//! - **Atomic Writing**: Outputs appear only once complete, so in-place rewrites are safe
//! - **Dedupe / Filter**: File-level wrappers over the core engine
//! - **Split / Merge**: Chunk one file, or concatenate a directory of files
//! - **Inspection**: Column statistics and head preview
//! - **SQLite Export**: One transaction per import, TEXT columns
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvops_io::{CsvFormat, DedupeOptions, NoProgress, dedupe_file};
//!
//! let options = DedupeOptions {
//!     key_columns: vec!["email".to_string()],
//!     ..DedupeOptions::default()
//! };
//! let report = dedupe_file(
//!     Path::new("users.csv"),
//!     Path::new("users.csv"),
//!     &CsvFormat::default(),
//!     &options,
//!     &NoProgress,
//! )?;
//! println!("removed {}", report.stats.duplicates_removed);
//! ```

mod dedupe;
mod error;
mod filter;
mod format;
mod inspect;
mod merge;
mod progress;
mod reader;
mod split;
mod sqlite;
mod writer;

// === Error Types ===
pub use error::{CsvIoError, Result};

// === Format, Reading, Writing ===
pub use format::CsvFormat;
pub use progress::{NoProgress, Progress};
pub use reader::{CsvSource, Rows, count_records};
pub use writer::{AtomicCsvWriter, RowSink, StdoutSink};

// === Operations ===
pub use dedupe::{DedupeOptions, DedupeReport, dedupe_file};
pub use filter::{Destination, FilterOptions, FilterReport, filter_file};
pub use inspect::{DEFAULT_PREVIEW_ROWS, Preview, collect_stats, read_preview};
pub use merge::{
    DEFAULT_MERGE_OUTPUT, MergeOptions, MergeReport, SkippedFile, list_csv_files, merge_dir,
};
pub use split::{DEFAULT_ROWS_PER_FILE, SplitOptions, SplitReport, chunk_path, split_file};
pub use sqlite::{
    IfExists, SqliteOptions, SqliteReport, default_table_name, export_to_sqlite,
    quote_identifier,
};
