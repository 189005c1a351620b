//! Streaming CSV record source.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, Reader, StringRecord};
use csvops_core::Row;

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;

/// Reads a delimited file in order, optionally splitting off the header row.
///
/// Rows may have any width; the UTF-8 BOM is removed from the first field.
pub struct CsvSource {
    path: PathBuf,
    reader: Reader<File>,
    header: Option<Row>,
    record: StringRecord,
    first_pending: bool,
}

impl CsvSource {
    /// Opens `path`. With `has_header`, the first record becomes the header
    /// and an input without any record is an error.
    pub fn open(path: &Path, format: &CsvFormat, has_header: bool) -> Result<Self> {
        let file = File::open(path).map_err(|e| CsvIoError::read(path, e))?;
        let reader = format.reader_builder().from_reader(file);
        let mut source = Self {
            path: path.to_path_buf(),
            reader,
            header: None,
            record: StringRecord::new(),
            first_pending: true,
        };
        if has_header {
            let header = source.next_row()?.ok_or_else(|| CsvIoError::EmptyInput {
                path: path.to_path_buf(),
            })?;
            source.header = Some(header);
        }
        Ok(source)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Reads the next row, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|e| CsvIoError::parse(&self.path, e))?;
        if !more {
            return Ok(None);
        }
        let mut row: Row = self.record.iter().map(str::to_string).collect();
        if self.first_pending {
            self.first_pending = false;
            if let Some(first) = row.first_mut()
                && let Some(stripped) = first.strip_prefix('\u{feff}')
            {
                *first = stripped.to_string();
            }
        }
        Ok(Some(row))
    }

    /// Iterates over the remaining data rows.
    pub fn rows(&mut self) -> Rows<'_> {
        Rows { source: self }
    }
}

pub struct Rows<'a> {
    source: &'a mut CsvSource,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_row().transpose()
    }
}

/// Counts data records without decoding them, for sizing progress bars.
pub fn count_records(path: &Path, format: &CsvFormat, has_header: bool) -> Result<u64> {
    let file = File::open(path).map_err(|e| CsvIoError::read(path, e))?;
    let mut reader = format.reader_builder().from_reader(file);
    let mut record = ByteRecord::new();
    let mut count = 0u64;
    while reader
        .read_byte_record(&mut record)
        .map_err(|e| CsvIoError::parse(path, e))?
    {
        count += 1;
    }
    if has_header {
        count = count.saturating_sub(1);
    }
    Ok(count)
}
