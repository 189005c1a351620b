//! File-level row filtering.

use std::path::{Path, PathBuf};

use csvops_core::{CaseSensitivity, Condition, FilterSpec, resolve_column};
use tracing::{debug, info};

use crate::error::Result;
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;
use crate::writer::{AtomicCsvWriter, RowSink, StdoutSink};

/// Where filtered rows go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Column name, matched exactly against the header.
    pub column: String,
    pub conditions: Vec<Condition>,
    pub include_header: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub total_rows: u64,
    pub matched_rows: u64,
    /// Rows too short to reach the filter column.
    pub skipped_rows: u64,
}

/// Streams rows of `input` that satisfy any of the conditions.
///
/// A file destination is written atomically, so it may be the input itself.
pub fn filter_file(
    input: &Path,
    destination: &Destination,
    format: &CsvFormat,
    options: &FilterOptions,
    progress: &dyn Progress,
) -> Result<FilterReport> {
    let mut source = CsvSource::open(input, format, true)?;
    let header = source.header().map(<[String]>::to_vec).unwrap_or_default();
    let column = resolve_column(&header, &options.column, CaseSensitivity::Sensitive)?;
    let spec = FilterSpec::new(column, options.conditions.clone())?;
    debug!(column, conditions = spec.conditions().len(), "filter resolved");

    let header = options.include_header.then_some(header.as_slice());
    let report = match destination {
        Destination::Stdout => {
            let mut sink = StdoutSink::new(format);
            let report = filter_rows(&mut source, header, &spec, &mut sink, progress)?;
            sink.flush()?;
            report
        }
        Destination::File(path) => {
            let mut sink = AtomicCsvWriter::new(path, format)?;
            let report = filter_rows(&mut source, header, &spec, &mut sink, progress)?;
            sink.finish()?;
            report
        }
    };
    progress.finish();

    info!(
        total = report.total_rows,
        matched = report.matched_rows,
        skipped = report.skipped_rows,
        "filter complete"
    );
    Ok(report)
}

fn filter_rows<S: RowSink>(
    source: &mut CsvSource,
    header: Option<&[String]>,
    spec: &FilterSpec,
    sink: &mut S,
    progress: &dyn Progress,
) -> Result<FilterReport> {
    if let Some(header) = header {
        sink.write_row(header)?;
    }
    let mut report = FilterReport::default();
    while let Some(row) = source.next_row()? {
        report.total_rows += 1;
        progress.advance(1);
        match spec.evaluate(&row) {
            Ok(true) => {
                report.matched_rows += 1;
                sink.write_row(&row)?;
            }
            Ok(false) => {}
            Err(_) => report.skipped_rows += 1,
        }
    }
    Ok(report)
}
