use anyhow::{Context, Result};
use tracing::{info, info_span};

use csvops_core::{DEFAULT_TOP_VALUES, DedupeStats, TableStats};
use csvops_io::{
    DedupeOptions, Destination, FilterOptions, FilterReport, MergeOptions, MergeReport,
    SplitOptions, SplitReport, SqliteOptions, SqliteReport, collect_stats, dedupe_file,
    export_to_sqlite, filter_file, list_csv_files, merge_dir, read_preview, split_file,
};

use crate::cli::{
    DedupeArgs, FilterArgs, MergeArgs, PreviewArgs, SplitArgs, SqliteArgs, StatsArgs,
};
use crate::progress::TerminalProgress;
use crate::summary::preview_table;

pub fn run_dedupe(args: &DedupeArgs, show_progress: bool) -> Result<DedupeStats> {
    let span = info_span!("dedupe", input = %args.input.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let options = DedupeOptions {
        key_columns: args.key.clone(),
        keep: args.keep(),
        case: args.case(),
    };
    let progress =
        TerminalProgress::for_records(show_progress, &args.input, &format, true, "dedupe");
    let report = dedupe_file(&args.input, &args.output, &format, &options, &progress)
        .with_context(|| format!("dedupe {}", args.input.display()))?;
    Ok(report.stats)
}

pub fn run_filter(args: &FilterArgs, show_progress: bool) -> Result<FilterReport> {
    let span = info_span!("filter", input = %args.input.display(), column = %args.column);
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let options = FilterOptions {
        column: args.column.clone(),
        conditions: args.conditions(),
        include_header: !args.no_header,
    };
    let destination = match &args.output {
        Some(path) => Destination::File(path.clone()),
        None => Destination::Stdout,
    };
    // A bar on stderr would interleave with rows on a terminal stdout.
    let show_progress = show_progress && destination != Destination::Stdout;
    let progress =
        TerminalProgress::for_records(show_progress, &args.input, &format, true, "filter");
    filter_file(&args.input, &destination, &format, &options, &progress)
        .with_context(|| format!("filter {}", args.input.display()))
}

pub fn run_split(args: &SplitArgs, show_progress: bool) -> Result<SplitReport> {
    let span = info_span!("split", input = %args.input.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let has_header = !args.no_header;
    let options = SplitOptions {
        output_dir: args.output_dir.clone(),
        rows_per_file: args.rows,
        has_header,
    };
    let progress =
        TerminalProgress::for_records(show_progress, &args.input, &format, has_header, "split");
    split_file(&args.input, &format, &options, &progress)
        .with_context(|| format!("split {}", args.input.display()))
}

pub fn run_merge(args: &MergeArgs, show_progress: bool) -> Result<MergeReport> {
    let span = info_span!("merge", input_dir = %args.input_dir.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let options = MergeOptions {
        input_dir: args.input_dir.clone(),
        output: args.output.clone(),
        has_header: !args.no_header,
    };
    let file_count = list_csv_files(&args.input_dir)
        .map(|files| files.len() as u64)
        .unwrap_or(0);
    let progress = TerminalProgress::for_items(show_progress, file_count, "merge");
    merge_dir(&format, &options, &progress)
        .with_context(|| format!("merge {}", args.input_dir.display()))
}

pub fn run_stats(args: &StatsArgs, show_progress: bool) -> Result<TableStats> {
    let span = info_span!("stats", input = %args.input.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let progress =
        TerminalProgress::for_records(show_progress, &args.input, &format, true, "stats");
    collect_stats(&args.input, &format, DEFAULT_TOP_VALUES, &progress)
        .with_context(|| format!("stats {}", args.input.display()))
}

/// Stats as pretty-printed JSON.
pub fn stats_json(stats: &TableStats) -> Result<String> {
    serde_json::to_string_pretty(stats).context("serialize stats")
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let span = info_span!("preview", input = %args.input.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let preview = read_preview(&args.input, &format, !args.no_header, args.rows)
        .with_context(|| format!("preview {}", args.input.display()))?;
    info!(rows = preview.rows.len(), "preview ready");
    println!("{}", preview_table(&preview));
    Ok(())
}

pub fn run_to_sqlite(args: &SqliteArgs, show_progress: bool) -> Result<SqliteReport> {
    let span = info_span!("to_sqlite", input = %args.input.display());
    let _guard = span.enter();
    let format = args.format.csv_format()?;
    let options = SqliteOptions {
        database: args.output.clone(),
        table: args.table.clone(),
        if_exists: args.if_exists.into(),
    };
    let progress =
        TerminalProgress::for_records(show_progress, &args.input, &format, true, "to-sqlite");
    export_to_sqlite(&args.input, &format, &options, &progress).with_context(|| {
        format!(
            "export {} to {}",
            args.input.display(),
            args.output.display()
        )
    })
}
