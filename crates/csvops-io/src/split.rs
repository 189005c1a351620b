//! Record-aware chunking of one CSV file into several.

use std::path::{Path, PathBuf};

use csvops_core::ConfigError;
use tracing::{debug, info};

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;
use crate::writer::AtomicCsvWriter;

/// Default maximum data rows per chunk.
pub const DEFAULT_ROWS_PER_FILE: usize = 1000;

#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub output_dir: PathBuf,
    /// Maximum data rows per chunk (header excluded). Must be positive.
    pub rows_per_file: usize,
    /// Treat the first record as a header and repeat it in every chunk.
    pub has_header: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            rows_per_file: DEFAULT_ROWS_PER_FILE,
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub rows: u64,
    pub files: Vec<PathBuf>,
}

/// Path of the `part`-th chunk (1-based).
pub fn chunk_path(output_dir: &Path, part: usize) -> PathBuf {
    output_dir.join(format!("part_{part}.csv"))
}

/// Splits `input` into `part_<n>.csv` files holding at most
/// `rows_per_file` rows each. Only one chunk is open at a time.
pub fn split_file(
    input: &Path,
    format: &CsvFormat,
    options: &SplitOptions,
    progress: &dyn Progress,
) -> Result<SplitReport> {
    if options.rows_per_file == 0 {
        return Err(ConfigError::InvalidChunkSize.into());
    }
    std::fs::create_dir_all(&options.output_dir).map_err(|source| CsvIoError::Directory {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut source = CsvSource::open(input, format, options.has_header)?;
    let header = source.header().map(<[String]>::to_vec);

    let mut report = SplitReport::default();
    let mut current: Option<AtomicCsvWriter> = None;
    let mut rows_in_chunk = 0usize;

    while let Some(row) = source.next_row()? {
        let mut writer = match current.take() {
            Some(writer) => writer,
            None => {
                let path = chunk_path(&options.output_dir, report.files.len() + 1);
                debug!(path = %path.display(), "starting chunk");
                let mut writer = AtomicCsvWriter::new(&path, format)?;
                if let Some(header) = &header {
                    writer.write_record(header)?;
                }
                writer
            }
        };
        writer.write_record(&row)?;
        rows_in_chunk += 1;
        report.rows += 1;
        progress.advance(1);

        if rows_in_chunk == options.rows_per_file {
            report.files.push(writer.finish()?);
            rows_in_chunk = 0;
        } else {
            current = Some(writer);
        }
    }
    if let Some(partial) = current.take() {
        report.files.push(partial.finish()?);
    }
    progress.finish();

    info!(
        rows = report.rows,
        files = report.files.len(),
        output_dir = %options.output_dir.display(),
        "split complete"
    );
    Ok(report)
}
