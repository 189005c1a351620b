//! File-level deduplication.

use std::path::{Path, PathBuf};

use csvops_core::{CaseSensitivity, DedupeStats, Deduper, KeepPolicy, KeySpec};
use tracing::{debug, info};

use crate::error::Result;
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;
use crate::writer::AtomicCsvWriter;

/// Settings for a dedupe run.
#[derive(Debug, Clone, Default)]
pub struct DedupeOptions {
    /// Key column names, resolved against the header.
    pub key_columns: Vec<String>,
    pub keep: KeepPolicy,
    /// Applies to both column-name matching and key comparison.
    pub case: CaseSensitivity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeReport {
    pub output: PathBuf,
    pub stats: DedupeStats,
}

/// Deduplicates `input` into `output`. The two may be the same file.
///
/// The header is written unchanged, followed by the retained rows. Nothing
/// is written when key resolution fails.
pub fn dedupe_file(
    input: &Path,
    output: &Path,
    format: &CsvFormat,
    options: &DedupeOptions,
    progress: &dyn Progress,
) -> Result<DedupeReport> {
    let mut source = CsvSource::open(input, format, true)?;
    let header = source.header().map(<[String]>::to_vec).unwrap_or_default();
    let spec = KeySpec::from_header(&header, &options.key_columns, options.case)?;
    debug!(
        positions = ?spec.positions(),
        keep = ?options.keep,
        case = ?options.case,
        "resolved key columns"
    );

    let mut deduper = Deduper::new(&spec, options.keep);
    for row in source.rows() {
        deduper.push(row?);
        progress.advance(1);
    }
    let outcome = deduper.finish();
    progress.finish();

    let mut writer = AtomicCsvWriter::new(output, format)?;
    writer.write_record(&header)?;
    for row in &outcome.rows {
        writer.write_record(row)?;
    }
    let output = writer.finish()?;

    info!(
        output = %output.display(),
        total = outcome.stats.total_rows,
        unique = outcome.stats.unique_rows,
        duplicates = outcome.stats.duplicates_removed,
        skipped = outcome.stats.skipped_rows,
        "dedupe complete"
    );
    Ok(DedupeReport {
        output,
        stats: outcome.stats,
    })
}
