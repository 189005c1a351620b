//! Export of a CSV file into a SQLite table of TEXT columns.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::{debug, info, info_span};

use crate::error::{CsvIoError, Result};
use crate::format::CsvFormat;
use crate::progress::Progress;
use crate::reader::CsvSource;

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IfExists {
    /// Drop and recreate the table.
    #[default]
    Replace,
    /// Insert into the existing table.
    Append,
    /// Leave the existing table untouched and import nothing.
    Skip,
}

#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub database: PathBuf,
    /// Defaults to the sanitized input file stem.
    pub table: Option<String>,
    pub if_exists: IfExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteReport {
    pub database: PathBuf,
    pub table: String,
    pub rows: u64,
    /// The table existed and `IfExists::Skip` left it alone.
    pub skipped_existing: bool,
}

/// Table name derived from a file name: every character outside
/// `[A-Za-z0-9_]` becomes `_`.
pub fn default_table_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "data".to_string()
    } else {
        cleaned
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column names for the table. Blank names become `column_<n>` and names
/// repeated case-insensitively get a numeric suffix, since SQLite compares
/// column names without case.
fn column_names(header: &[String]) -> Vec<String> {
    let mut used = BTreeSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let trimmed = raw.trim();
            let base = if trimmed.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                trimmed.to_string()
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while !used.insert(name.to_lowercase()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

/// SQLite resolves table names without case, so `orders` finds `Orders`.
fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        [table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

/// Loads every data row of `input` into `options.table` inside one
/// transaction. A row whose width differs from the header aborts the
/// import and rolls it back.
pub fn export_to_sqlite(
    input: &Path,
    format: &CsvFormat,
    options: &SqliteOptions,
    progress: &dyn Progress,
) -> Result<SqliteReport> {
    let table = options
        .table
        .clone()
        .unwrap_or_else(|| default_table_name(input));
    let span = info_span!("sqlite_export", table = %table);
    let _guard = span.enter();

    let mut source = CsvSource::open(input, format, true)?;
    let header = source.header().map(<[String]>::to_vec).unwrap_or_default();
    let columns = column_names(&header);

    let db_path = &options.database;
    let sql_err = |e: rusqlite::Error| CsvIoError::sqlite(db_path, e);
    let mut conn = Connection::open(db_path).map_err(sql_err)?;

    let mut report = SqliteReport {
        database: db_path.clone(),
        table: table.clone(),
        rows: 0,
        skipped_existing: false,
    };
    let exists = table_exists(&conn, &table).map_err(sql_err)?;
    if exists && options.if_exists == IfExists::Skip {
        info!("table exists, skipping import");
        report.skipped_existing = true;
        return Ok(report);
    }

    let quoted_table = quote_identifier(&table);
    let tx = conn.transaction().map_err(sql_err)?;
    if exists && options.if_exists == IfExists::Replace {
        debug!("dropping existing table");
        tx.execute(&format!("DROP TABLE {quoted_table}"), [])
            .map_err(sql_err)?;
    }
    let definitions: Vec<String> = columns
        .iter()
        .map(|name| format!("{} TEXT", quote_identifier(name)))
        .collect();
    tx.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {quoted_table} ({})",
            definitions.join(", ")
        ),
        [],
    )
    .map_err(sql_err)?;

    let placeholders = vec!["?"; columns.len()].join(", ");
    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {quoted_table} VALUES ({placeholders})"
            ))
            .map_err(sql_err)?;
        while let Some(row) = source.next_row()? {
            if row.len() != columns.len() {
                return Err(CsvIoError::RowWidth {
                    path: input.to_path_buf(),
                    row: report.rows + 1,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            stmt.execute(params_from_iter(row.iter())).map_err(sql_err)?;
            report.rows += 1;
            progress.advance(1);
        }
    }
    tx.commit().map_err(sql_err)?;
    progress.finish();

    info!(
        rows = report.rows,
        database = %db_path.display(),
        "sqlite export complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_name() {
        assert_eq!(default_table_name(Path::new("/tmp/sales-2024.v2.csv")), "sales_2024_v2");
        assert_eq!(default_table_name(Path::new("orders.csv")), "orders");
        assert_eq!(default_table_name(Path::new("")), "data");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("plain"), "\"plain\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_column_names_fill_blanks_and_dedupe() {
        let header: Vec<String> = ["id", "", "ID", "name", "id"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(
            column_names(&header),
            vec!["id", "column_2", "ID_2", "name", "id_3"]
        );
    }
}
