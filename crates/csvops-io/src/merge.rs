//! Concatenation of every CSV file in a directory.

use std::path::{Path, PathBuf};

use csvops_core::Row;
use tracing::{debug, info, warn};

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;
use crate::writer::AtomicCsvWriter;

/// Default output file name for merges.
pub const DEFAULT_MERGE_OUTPUT: &str = "merged.csv";

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    /// Every file starts with a header; only the first one is kept.
    pub has_header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// CSV files found in the input directory.
    pub discovered: usize,
    /// Files whose rows reached the output.
    pub files_merged: usize,
    pub rows: u64,
    pub skipped: Vec<SkippedFile>,
    /// `None` when no CSV files were found and nothing was written.
    pub output: Option<PathBuf>,
}

/// Lists `*.csv` files (suffix matched case-insensitively) sorted by path.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| CsvIoError::Directory {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CsvIoError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reads a whole file so a parse failure skips it without partial output.
fn read_all(path: &Path, format: &CsvFormat) -> Result<Vec<Row>> {
    let mut source = CsvSource::open(path, format, false)?;
    source.rows().collect()
}

/// Merges the CSV files of `input_dir` into one output file.
///
/// Unreadable files are skipped with a warning; empty files contribute
/// nothing. With headers on, the first non-empty file's header is written
/// once and the first record of every file is dropped.
pub fn merge_dir(
    format: &CsvFormat,
    options: &MergeOptions,
    progress: &dyn Progress,
) -> Result<MergeReport> {
    let files: Vec<PathBuf> = list_csv_files(&options.input_dir)?
        .into_iter()
        .filter(|path| !same_file(path, &options.output))
        .collect();
    let mut report = MergeReport {
        discovered: files.len(),
        ..MergeReport::default()
    };
    if files.is_empty() {
        warn!(dir = %options.input_dir.display(), "no CSV files found to merge");
        return Ok(report);
    }

    let mut writer = AtomicCsvWriter::new(&options.output, format)?;
    let mut header_written = false;
    for path in files {
        let records = match read_all(&path, format) {
            Ok(records) => records,
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping file");
                report.skipped.push(SkippedFile {
                    path,
                    reason: error.to_string(),
                });
                progress.advance(1);
                continue;
            }
        };
        if records.is_empty() {
            debug!(path = %path.display(), "empty file");
            progress.advance(1);
            continue;
        }

        let mut rows = records.iter();
        if options.has_header {
            let header = rows.next();
            if !header_written && let Some(header) = header {
                writer.write_record(header)?;
                header_written = true;
            }
        }
        for row in rows {
            writer.write_record(row)?;
            report.rows += 1;
        }
        report.files_merged += 1;
        progress.advance(1);
    }
    report.output = Some(writer.finish()?);
    progress.finish();

    info!(
        files = report.files_merged,
        rows = report.rows,
        skipped = report.skipped.len(),
        output = %options.output.display(),
        "merge complete"
    );
    Ok(report)
}
