//! Error types for CSV input and output.

use std::path::{Path, PathBuf};

use csvops_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while reading, writing, or exporting CSV data.
#[derive(Debug, Error)]
pub enum CsvIoError {
    // === File System Errors ===
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or persist an output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list or create a directory.
    #[error("failed to access directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// A record could not be parsed.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record could not be written.
    #[error("failed to write CSV to {target}: {source}")]
    CsvWrite {
        target: String,
        #[source]
        source: csv::Error,
    },

    /// The input has no records at all, not even a header.
    #[error("input is empty: {path}")]
    EmptyInput { path: PathBuf },

    /// Delimiter flag was not a single ASCII character.
    #[error("invalid delimiter '{value}': expected a single ASCII character")]
    InvalidDelimiter { value: String },

    /// A data row does not match the header width.
    #[error("row {row} of {path} has {actual} fields but the header has {expected}")]
    RowWidth {
        path: PathBuf,
        row: u64,
        expected: usize,
        actual: usize,
    },

    // === Export Errors ===
    #[error("SQLite error on {path}: {source}")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    // === Configuration ===
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CsvIoError {
    /// Classifies an open/read failure, keeping "not found" distinct.
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn parse(path: &Path, source: csv::Error) -> Self {
        Self::CsvParse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn sqlite(path: &Path, source: rusqlite::Error) -> Self {
        Self::Sqlite {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for CSV I/O operations.
pub type Result<T> = std::result::Result<T, CsvIoError>;
