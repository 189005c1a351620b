//! Delimited text format settings.

use csv::{ReaderBuilder, Writer, WriterBuilder};

use crate::error::{CsvIoError, Result};

/// Field delimiter shared by readers and writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: u8,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvFormat {
    /// Parses a delimiter flag such as `","`, `";"`, or `"\t"`.
    ///
    /// The two-character escape `\t` is accepted for tab.
    pub fn from_delimiter(value: &str) -> Result<Self> {
        let delimiter = match value {
            "\\t" => b'\t',
            _ => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii() && ch != '"' && ch != '\n' && ch != '\r' => {
                        ch as u8
                    }
                    _ => {
                        return Err(CsvIoError::InvalidDelimiter {
                            value: value.to_string(),
                        });
                    }
                }
            }
        };
        Ok(Self { delimiter })
    }

    /// Reader that tolerates rows of any width and never consumes a header.
    pub(crate) fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true);
        builder
    }

    pub(crate) fn writer<W: std::io::Write>(&self, inner: W) -> Writer<W> {
        WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delimiter() {
        assert_eq!(CsvFormat::from_delimiter(";").unwrap().delimiter, b';');
        assert_eq!(CsvFormat::from_delimiter("\\t").unwrap().delimiter, b'\t');
        assert_eq!(CsvFormat::from_delimiter("\t").unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_from_delimiter_rejects_invalid() {
        for value in ["", ";;", "é", "\""] {
            assert!(matches!(
                CsvFormat::from_delimiter(value),
                Err(CsvIoError::InvalidDelimiter { .. })
            ));
        }
    }
}
