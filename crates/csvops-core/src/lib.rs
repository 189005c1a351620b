//! Row-level logic for the csvops toolkit.
//!
//! This crate holds everything that operates on rows that have already been
//! read: it never opens files, parses command lines, or draws progress bars.
//!
//! # Features
//!
//! - **Column Resolution**: Map requested column names onto header positions
//! - **Key Extraction**: Build composite keys from a row and a [`KeySpec`]
//! - **Deduplication**: Single-pass, order-preserving first/last-occurrence selection
//! - **Filtering**: Equality, substring, and numeric comparisons on one column
//! - **Column Statistics**: Unique, empty, and most frequent values per column
//!
//! # Example
//!
//! ```
//! use csvops_core::{CaseSensitivity, KeepPolicy, KeySpec, dedupe};
//!
//! let header = vec!["id".to_string(), "value".to_string()];
//! let spec = KeySpec::from_header(&header, &["ID"], CaseSensitivity::Insensitive).unwrap();
//!
//! let rows = vec![
//!     vec!["a".to_string(), "1".to_string()],
//!     vec!["b".to_string(), "2".to_string()],
//!     vec!["a".to_string(), "3".to_string()],
//! ];
//! let outcome = dedupe(rows, &spec, KeepPolicy::Last);
//!
//! assert_eq!(outcome.rows[0], vec!["a".to_string(), "3".to_string()]);
//! assert_eq!(outcome.stats.duplicates_removed, 1);
//! ```

mod dedupe;
mod error;
mod filter;
mod key;
mod resolve;
mod stats;

// === Error Types ===
pub use error::{ConfigError, RowError};

// === Keys ===
pub use key::{CaseSensitivity, CompositeKey, KEY_SEPARATOR, KeySpec, Row};

// === Column Resolution ===
pub use resolve::{resolve_column, resolve_columns};

// === Deduplication ===
pub use dedupe::{DedupeOutcome, DedupeStats, Deduper, KeepPolicy, RowOutcome, dedupe};

// === Filtering ===
pub use filter::{Condition, FilterSpec};

// === Statistics ===
pub use stats::{ColumnStats, DEFAULT_TOP_VALUES, StatsAccumulator, TableStats, ValueCount};
