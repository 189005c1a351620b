use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use csvops_core::{DedupeStats, TableStats};
use csvops_io::{FilterReport, MergeReport, Preview, SplitReport, SqliteReport};

pub fn print_dedupe_summary(stats: &DedupeStats) {
    println!("{}", dedupe_table(stats));
}

pub fn dedupe_table(stats: &DedupeStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Total rows"),
        header_cell("Unique"),
        header_cell("Duplicates removed"),
        header_cell("Skipped"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.total_rows).add_attribute(Attribute::Bold),
        Cell::new(stats.unique_rows),
        count_cell(stats.duplicates_removed, Color::Yellow),
        count_cell(stats.skipped_rows, Color::Red),
    ]);
    table
}

/// Filtered rows may be going to stdout, so the summary goes to stderr.
pub fn print_filter_summary(report: &FilterReport) {
    eprintln!(
        "Matched {} of {} rows",
        report.matched_rows, report.total_rows
    );
    if report.skipped_rows > 0 {
        eprintln!(
            "Skipped {} rows too short for the filter column",
            report.skipped_rows
        );
    }
}

pub fn print_split_summary(report: &SplitReport) {
    println!(
        "Split {} rows into {} files",
        report.rows,
        report.files.len()
    );
    for path in &report.files {
        println!("  {}", path.display());
    }
}

pub fn print_merge_summary(report: &MergeReport) {
    match &report.output {
        Some(output) => println!(
            "Merged {} rows from {} files into {}",
            report.rows,
            report.files_merged,
            output.display()
        ),
        None => println!("No CSV files found to merge"),
    }
    if !report.skipped.is_empty() {
        eprintln!("Skipped files:");
        for skipped in &report.skipped {
            eprintln!("- {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

pub fn print_sqlite_summary(report: &SqliteReport) {
    if report.skipped_existing {
        println!(
            "Table '{}' already exists in {}; skipped",
            report.table,
            report.database.display()
        );
    } else {
        println!(
            "Imported {} rows into table '{}' in {}",
            report.rows,
            report.table,
            report.database.display()
        );
    }
}

pub fn stats_table(stats: &TableStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Unique"),
        header_cell("Empty"),
        header_cell("Top values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &stats.columns {
        let top = if column.top_values.is_empty() {
            dim_cell("-")
        } else {
            let listed: Vec<String> = column
                .top_values
                .iter()
                .map(|top| format!("{} ({})", top.value, top.count))
                .collect();
            Cell::new(listed.join(", "))
        };
        table.add_row(vec![
            Cell::new(&column.name).add_attribute(Attribute::Bold),
            Cell::new(column.unique_values),
            count_cell(column.empty_fields, Color::Yellow),
            top,
        ]);
    }
    table
}

pub fn print_stats(stats: &TableStats) {
    println!("Rows: {}", stats.rows);
    println!("{}", stats_table(stats));
}

pub fn preview_table(preview: &Preview) -> Table {
    let mut table = Table::new();
    if let Some(header) = &preview.header {
        table.set_header(header.iter().map(|name| header_cell(name)));
    }
    apply_table_style(&mut table);
    for row in &preview.rows {
        table.add_row(row);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
