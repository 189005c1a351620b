//! CLI argument definitions for csvops.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use csvops_core::{CaseSensitivity, Condition, KeepPolicy};
use csvops_io::{CsvFormat, DEFAULT_MERGE_OUTPUT, DEFAULT_PREVIEW_ROWS, DEFAULT_ROWS_PER_FILE, IfExists};

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "csvops",
    version,
    about = "CSV toolkit - dedupe, filter, split, merge, and inspect CSV files",
    long_about = "Streaming operations on delimited text files.\n\n\
                  Deduplicates by key columns, filters rows, splits and merges files,\n\
                  reports column statistics, and exports to SQLite."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Never draw progress bars.
    #[arg(long = "no-progress", global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove duplicate rows by one or more key columns.
    Dedupe(DedupeArgs),

    /// Keep rows whose column value matches any condition.
    Filter(FilterArgs),

    /// Concatenate every CSV file in a directory.
    Merge(MergeArgs),

    /// Split a CSV file into fixed-size chunks.
    Split(SplitArgs),

    /// Show per-column statistics.
    Stats(StatsArgs),

    /// Show the first rows as a table.
    Preview(PreviewArgs),

    /// Load a CSV file into a SQLite table.
    ToSqlite(SqliteArgs),
}

/// Delimiter shared by commands that read or write CSV.
#[derive(Args)]
pub struct FormatArgs {
    /// Field delimiter: a single ASCII character, or \t for tab.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: String,
}

impl FormatArgs {
    pub fn csv_format(&self) -> csvops_io::Result<CsvFormat> {
        CsvFormat::from_delimiter(&self.delimiter)
    }
}

#[derive(Args)]
pub struct DedupeArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output CSV file. May be the input file.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Comma-separated key column names.
    #[arg(
        short = 'k',
        long = "key",
        value_name = "COLUMNS",
        value_delimiter = ',',
        required = true
    )]
    pub key: Vec<String>,

    /// Keep the last occurrence of each key instead of the first.
    #[arg(long = "keep-last")]
    pub keep_last: bool,

    /// Compare key values and column names case-sensitively.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

impl DedupeArgs {
    pub fn keep(&self) -> KeepPolicy {
        KeepPolicy::from_keep_last(self.keep_last)
    }

    pub fn case(&self) -> CaseSensitivity {
        CaseSensitivity::from_flag(self.case_sensitive)
    }
}

#[derive(Args)]
pub struct FilterArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output CSV file (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Column to test, matched exactly against the header.
    #[arg(short = 'c', long = "column", value_name = "NAME")]
    pub column: String,

    /// Value equals this string exactly.
    #[arg(long = "eq", value_name = "VALUE")]
    pub eq: Option<String>,

    /// Value contains this substring (case-insensitive).
    #[arg(long = "contains", value_name = "TEXT")]
    pub contains: Option<String>,

    /// Value is a number greater than this.
    #[arg(long = "gt", value_name = "NUMBER", allow_negative_numbers = true)]
    pub gt: Option<f64>,

    /// Value is a number less than this.
    #[arg(long = "lt", value_name = "NUMBER", allow_negative_numbers = true)]
    pub lt: Option<f64>,

    /// Omit the header from the output.
    #[arg(long = "no-header")]
    pub no_header: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

impl FilterArgs {
    /// Conditions in flag order: eq, contains, gt, lt.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(value) = &self.eq {
            conditions.push(Condition::Equals(value.clone()));
        }
        if let Some(needle) = &self.contains {
            conditions.push(Condition::contains(needle));
        }
        if let Some(bound) = self.gt {
            conditions.push(Condition::GreaterThan(bound));
        }
        if let Some(bound) = self.lt {
            conditions.push(Condition::LessThan(bound));
        }
        conditions
    }
}

#[derive(Args)]
pub struct MergeArgs {
    /// Directory containing the CSV files to merge.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Output CSV file.
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = DEFAULT_MERGE_OUTPUT)]
    pub output: PathBuf,

    /// Files have no header row.
    #[arg(long = "no-header")]
    pub no_header: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Directory for the part_<n>.csv files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "./output")]
    pub output_dir: PathBuf,

    /// Maximum data rows per output file.
    #[arg(long = "rows", value_name = "N", default_value_t = DEFAULT_ROWS_PER_FILE)]
    pub rows: usize,

    /// Input has no header row.
    #[arg(long = "no-header")]
    pub no_header: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Print statistics as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Number of rows to show.
    #[arg(short = 'n', long = "rows", value_name = "N", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Do not treat the first row as a header.
    #[arg(long = "no-header")]
    pub no_header: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

#[derive(Args)]
pub struct SqliteArgs {
    /// Input CSV file.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// SQLite database file, created if missing.
    #[arg(short = 'o', long = "output", value_name = "DB")]
    pub output: PathBuf,

    /// Table name (default: input file name, sanitized).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// What to do when the table already exists.
    #[arg(long = "if-exists", value_enum, default_value = "replace")]
    pub if_exists: IfExistsArg,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// CLI choices for an existing SQLite table.
#[derive(Clone, Copy, ValueEnum)]
pub enum IfExistsArg {
    Replace,
    Append,
    Skip,
}

impl From<IfExistsArg> for IfExists {
    fn from(value: IfExistsArg) -> Self {
        match value {
            IfExistsArg::Replace => IfExists::Replace,
            IfExistsArg::Append => IfExists::Append,
            IfExistsArg::Skip => IfExists::Skip,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
