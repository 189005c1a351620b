//! Error types for row-level operations.

use thiserror::Error;

/// Configuration problems detected before any row is processed.
///
/// These abort the whole operation and are reported to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A requested column does not appear in the header.
    #[error("column '{column}' not found in header")]
    UnknownColumn { column: String },

    /// No key columns were given.
    #[error("at least one key column is required")]
    NoKeyColumns,

    /// Two requested key columns resolve to the same header position.
    #[error("key column '{column}' is listed more than once")]
    DuplicateKeyColumn { column: String },

    /// The same position appears twice in an explicit position list.
    #[error("key position {position} is listed more than once")]
    DuplicateKeyPosition { position: usize },

    /// Chunk size for splitting must be positive.
    #[error("rows per chunk must be greater than zero")]
    InvalidChunkSize,

    /// A filter needs at least one condition to evaluate.
    #[error("at least one filter condition is required")]
    NoFilterCondition,
}

/// Per-row conditions. These never abort an operation; callers skip the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row is too short to reach every configured column.
    #[error("row has {actual} fields but at least {required} are required")]
    ShortRow { required: usize, actual: usize },
}
