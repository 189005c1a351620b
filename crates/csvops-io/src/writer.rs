//! Atomic CSV sink.
//!
//! Records go to a temporary file next to the destination, which replaces
//! the destination only on [`AtomicCsvWriter::finish`]. Dropping the writer
//! early removes the temporary file, so a failed run never leaves a
//! half-written output behind. Writing over the input file is safe for the
//! same reason.

use std::io::{BufWriter, StdoutLock};
use std::path::{Path, PathBuf};

use csv::Writer;
use tempfile::{Builder, NamedTempFile};

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;

pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    /// Creates the temporary file in the destination's directory.
    pub fn new(final_path: impl AsRef<Path>, format: &CsvFormat) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent_dir = match final_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |source: std::io::Error| CsvIoError::FileWrite {
            path: final_path.clone(),
            source,
        };
        let temp_file = temp_builder()
            .tempfile_in(&parent_dir)
            .map_err(write_err)?;
        // The rename replaces the inode, so carry the old file's mode over.
        if let Ok(metadata) = std::fs::metadata(&final_path) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }
        Ok(Self {
            writer: format.writer(BufWriter::new(temp_file)),
            final_path,
        })
    }

    pub fn write_record<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .map_err(|source| CsvIoError::CsvWrite {
                target: self.final_path.display().to_string(),
                source,
            })
    }

    /// Flushes and moves the temporary file over the destination.
    pub fn finish(self) -> Result<PathBuf> {
        let buf_writer = self.writer.into_inner().map_err(|e| CsvIoError::FileWrite {
            path: self.final_path.clone(),
            source: std::io::Error::other(e.error().to_string()),
        })?;
        let named_temp = buf_writer
            .into_inner()
            .map_err(|e| CsvIoError::FileWrite {
                path: self.final_path.clone(),
                source: std::io::Error::other(e.error().to_string()),
            })?;
        named_temp
            .persist(&self.final_path)
            .map_err(|e| CsvIoError::FileWrite {
                path: self.final_path.clone(),
                source: e.error,
            })?;
        Ok(self.final_path)
    }
}

/// Temp files default to owner-only access; new outputs should get the
/// usual umask-derived mode instead.
fn temp_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

/// Destination for rows produced by an operation.
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> Result<()>;
}

impl RowSink for AtomicCsvWriter {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.write_record(row)
    }
}

/// Writes rows to standard output.
pub struct StdoutSink {
    writer: Writer<StdoutLock<'static>>,
}

impl StdoutSink {
    pub fn new(format: &CsvFormat) -> Self {
        Self {
            writer: format.writer(std::io::stdout().lock()),
        }
    }

    pub fn flush(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| CsvIoError::CsvWrite {
            target: "stdout".to_string(),
            source: e.into(),
        })
    }
}

impl RowSink for StdoutSink {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer
            .write_record(row)
            .map_err(|source| CsvIoError::CsvWrite {
                target: "stdout".to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_successful_write() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("output.csv");

        let mut writer = AtomicCsvWriter::new(&final_path, &CsvFormat::default()).unwrap();
        writer.write_record(["Name", "Age"]).unwrap();
        writer.write_record(["Alice", "30"]).unwrap();
        writer.write_record(["Bob"]).unwrap();
        let result_path = writer.finish().unwrap();

        assert_eq!(result_path, final_path);
        let content = fs::read_to_string(&final_path).unwrap();
        assert_eq!(content, "Name,Age\nAlice,30\nBob\n");
    }

    #[test]
    fn test_drop_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("output.csv");

        {
            let mut writer = AtomicCsvWriter::new(&final_path, &CsvFormat::default()).unwrap();
            writer.write_record(["partial"]).unwrap();
        }

        assert!(!final_path.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("shared.csv");
        fs::write(&final_path, "old\n").unwrap();
        fs::set_permissions(&final_path, fs::Permissions::from_mode(0o640)).unwrap();

        let mut writer = AtomicCsvWriter::new(&final_path, &CsvFormat::default()).unwrap();
        writer.write_record(["new"]).unwrap();
        writer.finish().unwrap();

        let mode = fs::metadata(&final_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read_to_string(&final_path).unwrap(), "new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let reference = temp_dir.path().join("reference.csv");
        fs::write(&reference, "x\n").unwrap();
        let final_path = temp_dir.path().join("fresh.csv");

        let writer = AtomicCsvWriter::new(&final_path, &CsvFormat::default()).unwrap();
        writer.finish().unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&final_path), mode(&reference));
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("data.csv");
        fs::write(&final_path, "old\n").unwrap();

        let format = CsvFormat::from_delimiter(";").unwrap();
        let mut writer = AtomicCsvWriter::new(&final_path, &format).unwrap();
        writer.write_record(["a", "b"]).unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&final_path).unwrap(), "a;b\n");
    }
}
