//! Read-only views of a file: statistics and head preview.

use std::path::Path;

use csvops_core::{Row, StatsAccumulator, TableStats};
use tracing::info;

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;

/// Default number of rows shown by a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Computes per-column statistics over every data row.
pub fn collect_stats(
    input: &Path,
    format: &CsvFormat,
    top_n: usize,
    progress: &dyn Progress,
) -> Result<TableStats> {
    let mut source = CsvSource::open(input, format, true)?;
    let header = source.header().map(<[String]>::to_vec).unwrap_or_default();
    let mut acc = StatsAccumulator::new(header);
    for row in source.rows() {
        acc.push(&row?);
        progress.advance(1);
    }
    progress.finish();
    let stats = acc.finish(top_n);
    info!(rows = stats.rows, columns = stats.columns.len(), "stats complete");
    Ok(stats)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub header: Option<Row>,
    pub rows: Vec<Row>,
}

/// Reads the header (when `has_header`) and at most `limit` rows.
///
/// An input with no records at all is an error.
pub fn read_preview(
    input: &Path,
    format: &CsvFormat,
    has_header: bool,
    limit: usize,
) -> Result<Preview> {
    let mut source = CsvSource::open(input, format, has_header)?;
    let header = source.header().map(<[String]>::to_vec);
    let rows: Vec<Row> = source.rows().take(limit).collect::<Result<_>>()?;
    if header.is_none() && rows.is_empty() && source.next_row()?.is_none() {
        return Err(CsvIoError::EmptyInput {
            path: input.to_path_buf(),
        });
    }
    Ok(Preview { header, rows })
}
