//! End-to-end tests for the file operations against real temp files.

use std::fs;
use std::path::Path;

use csvops_core::{Condition, ConfigError, KeepPolicy};
use csvops_io::{
    CsvFormat, CsvIoError, DedupeOptions, Destination, FilterOptions, MergeOptions, NoProgress,
    SplitOptions, chunk_path, collect_stats, dedupe_file, filter_file, merge_dir, read_preview,
    split_file,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn dedupe_options(columns: &[&str], keep: KeepPolicy) -> DedupeOptions {
    DedupeOptions {
        key_columns: columns.iter().map(|c| (*c).to_string()).collect(),
        keep,
        ..DedupeOptions::default()
    }
}

// === Dedupe ===

#[test]
fn dedupe_in_place_replaces_input() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "users.csv",
        "id,name\n1,Alice\n2,Bob\n1,Alicia\n3,Cara\n",
    );

    let report = dedupe_file(
        &input,
        &input,
        &CsvFormat::default(),
        &dedupe_options(&["id"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.stats.total_rows, 4);
    assert_eq!(report.stats.duplicates_removed, 1);
    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "id,name\n1,Alice\n2,Bob\n3,Cara\n"
    );
    // Only the rewritten input remains; no temp file is left behind.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn dedupe_in_place_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "users.csv", "id\n1\n1\n");
    fs::set_permissions(&input, fs::Permissions::from_mode(0o644)).unwrap();

    dedupe_file(
        &input,
        &input,
        &CsvFormat::default(),
        &dedupe_options(&["id"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap();

    let mode = fs::metadata(&input).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(fs::read_to_string(&input).unwrap(), "id\n1\n");
}

#[test]
fn dedupe_keep_last_keeps_first_position() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "in.csv",
        "email,plan\nA@x.io,free\nb@x.io,free\na@x.io,pro\n",
    );
    let output = dir.path().join("out.csv");

    // Column name matched case-insensitively by default.
    let report = dedupe_file(
        &input,
        &output,
        &CsvFormat::default(),
        &dedupe_options(&["EMAIL"], KeepPolicy::Last),
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.output, output);
    assert_eq!(report.stats.unique_rows, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "email,plan\na@x.io,pro\nb@x.io,free\n"
    );
}

#[test]
fn dedupe_skips_short_rows() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "a,b,c\n1,2,3\n9\n1,2,4\n");
    let output = dir.path().join("out.csv");

    let report = dedupe_file(
        &input,
        &output,
        &CsvFormat::default(),
        &dedupe_options(&["a", "c"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.stats.skipped_rows, 1);
    assert_eq!(report.stats.unique_rows, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "a,b,c\n1,2,3\n1,2,4\n"
    );
}

#[test]
fn dedupe_unknown_column_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id,name\n1,a\n");
    let output = dir.path().join("out.csv");

    let err = dedupe_file(
        &input,
        &output,
        &CsvFormat::default(),
        &dedupe_options(&["missing"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CsvIoError::Config(ConfigError::UnknownColumn { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn dedupe_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = dedupe_file(
        &dir.path().join("nope.csv"),
        &dir.path().join("out.csv"),
        &CsvFormat::default(),
        &dedupe_options(&["id"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, CsvIoError::FileNotFound { .. }));
}

#[test]
fn dedupe_semicolon_delimiter() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id;v\n1;a\n1;b\n");
    let output = dir.path().join("out.csv");
    let format = CsvFormat::from_delimiter(";").unwrap();

    dedupe_file(
        &input,
        &output,
        &format,
        &dedupe_options(&["id"], KeepPolicy::First),
        &NoProgress,
    )
    .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "id;v\n1;a\n");
}

// === Filter ===

#[test]
fn filter_to_file_with_or_conditions() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "sales.csv",
        "region,amount\nNorth,10\nSouth,250\nEast,n/a\nNorthwest,5\n",
    );
    let output = dir.path().join("filtered.csv");
    let options = FilterOptions {
        column: "amount".to_string(),
        conditions: vec![Condition::GreaterThan(100.0), Condition::Equals("5".into())],
        include_header: true,
    };

    let report = filter_file(
        &input,
        &Destination::File(output.clone()),
        &CsvFormat::default(),
        &options,
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.total_rows, 4);
    assert_eq!(report.matched_rows, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "region,amount\nSouth,250\nNorthwest,5\n"
    );
}

#[test]
fn filter_without_header() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "name,city\nAnn,Berlin\nBo,Paris\nCy\n");
    let output = dir.path().join("out.csv");
    let options = FilterOptions {
        column: "city".to_string(),
        conditions: vec![Condition::contains("BER")],
        include_header: false,
    };

    let report = filter_file(
        &input,
        &Destination::File(output.clone()),
        &CsvFormat::default(),
        &options,
        &NoProgress,
    )
    .unwrap();

    assert_eq!(report.skipped_rows, 1);
    assert_eq!(fs::read_to_string(&output).unwrap(), "Ann,Berlin\n");
}

#[test]
fn filter_column_name_is_exact() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "City\nRome\n");
    let options = FilterOptions {
        column: "city".to_string(),
        conditions: vec![Condition::Equals("Rome".into())],
        include_header: true,
    };

    let err = filter_file(
        &input,
        &Destination::File(dir.path().join("out.csv")),
        &CsvFormat::default(),
        &options,
        &NoProgress,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CsvIoError::Config(ConfigError::UnknownColumn { .. })
    ));
}

// === Split ===

#[test]
fn split_repeats_header_in_every_chunk() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id\n1\n2\n3\n4\n5\n");
    let out_dir = dir.path().join("parts");
    let options = SplitOptions {
        output_dir: out_dir.clone(),
        rows_per_file: 2,
        has_header: true,
    };

    let report = split_file(&input, &CsvFormat::default(), &options, &NoProgress).unwrap();

    assert_eq!(report.rows, 5);
    assert_eq!(report.files.len(), 3);
    assert_eq!(fs::read_to_string(chunk_path(&out_dir, 1)).unwrap(), "id\n1\n2\n");
    assert_eq!(fs::read_to_string(chunk_path(&out_dir, 2)).unwrap(), "id\n3\n4\n");
    assert_eq!(fs::read_to_string(chunk_path(&out_dir, 3)).unwrap(), "id\n5\n");
}

#[test]
fn split_exact_multiple_has_no_trailing_chunk() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "1\n2\n3\n4\n");
    let out_dir = dir.path().join("parts");
    let options = SplitOptions {
        output_dir: out_dir.clone(),
        rows_per_file: 2,
        has_header: false,
    };

    let report = split_file(&input, &CsvFormat::default(), &options, &NoProgress).unwrap();

    assert_eq!(report.files.len(), 2);
    assert!(!chunk_path(&out_dir, 3).exists());
    assert_eq!(fs::read_to_string(chunk_path(&out_dir, 2)).unwrap(), "3\n4\n");
}

#[test]
fn split_header_only_writes_no_files() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id,name\n");
    let out_dir = dir.path().join("parts");
    let options = SplitOptions {
        output_dir: out_dir.clone(),
        ..SplitOptions::default()
    };

    let report = split_file(&input, &CsvFormat::default(), &options, &NoProgress).unwrap();

    assert!(report.files.is_empty());
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn split_rejects_zero_rows_per_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id\n1\n");
    let options = SplitOptions {
        output_dir: dir.path().join("parts"),
        rows_per_file: 0,
        has_header: true,
    };

    let err = split_file(&input, &CsvFormat::default(), &options, &NoProgress).unwrap_err();
    assert!(matches!(
        err,
        CsvIoError::Config(ConfigError::InvalidChunkSize)
    ));
}

// === Merge ===

#[test]
fn merge_writes_single_header_and_skips_bad_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.csv", "id,v\n1,x\n");
    write(dir.path(), "b.CSV", "id,v\n2,y\n3,z\n");
    write(dir.path(), "c.csv", "");
    write(dir.path(), "notes.txt", "ignored\n");
    fs::write(dir.path().join("d.csv"), b"id,v\n\xff\xfe,bad\n").unwrap();
    let output = dir.path().join("merged.csv");
    fs::write(&output, "stale,content\n").unwrap();

    let options = MergeOptions {
        input_dir: dir.path().to_path_buf(),
        output: output.clone(),
        has_header: true,
    };
    let report = merge_dir(&CsvFormat::default(), &options, &NoProgress).unwrap();

    // merged.csv itself is not an input
    assert_eq!(report.discovered, 4);
    assert_eq!(report.files_merged, 2);
    assert_eq!(report.rows, 3);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("d.csv"));
    assert_eq!(report.output.as_deref(), Some(output.as_path()));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "id,v\n1,x\n2,y\n3,z\n"
    );
}

#[test]
fn merge_without_headers_keeps_every_record() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write(&inputs, "1.csv", "a,1\n");
    write(&inputs, "2.csv", "b,2\n");
    let output = dir.path().join("all.csv");

    let options = MergeOptions {
        input_dir: inputs,
        output: output.clone(),
        has_header: false,
    };
    let report = merge_dir(&CsvFormat::default(), &options, &NoProgress).unwrap();

    assert_eq!(report.rows, 2);
    assert_eq!(fs::read_to_string(&output).unwrap(), "a,1\nb,2\n");
}

#[test]
fn merge_empty_directory_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("merged.csv");
    let options = MergeOptions {
        input_dir: dir.path().to_path_buf(),
        output: output.clone(),
        has_header: true,
    };

    let report = merge_dir(&CsvFormat::default(), &options, &NoProgress).unwrap();

    assert_eq!(report.discovered, 0);
    assert!(report.output.is_none());
    assert!(!output.exists());
}

// === Stats / Preview ===

#[test]
fn stats_over_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "id,city\n1,Rome\n2, Rome \n3,\n4,Oslo\n");

    let stats = collect_stats(&input, &CsvFormat::default(), 5, &NoProgress).unwrap();

    assert_eq!(stats.rows, 4);
    let city = &stats.columns[1];
    assert_eq!(city.name, "city");
    assert_eq!(city.unique_values, 2);
    assert_eq!(city.empty_fields, 1);
    assert_eq!(city.top_values[0].value, "Rome");
    assert_eq!(city.top_values[0].count, 2);
}

#[test]
fn preview_limits_rows() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "h\n1\n2\n3\n");

    let preview = read_preview(&input, &CsvFormat::default(), true, 2).unwrap();
    assert_eq!(preview.header, Some(vec!["h".to_string()]));
    assert_eq!(preview.rows.len(), 2);

    let preview = read_preview(&input, &CsvFormat::default(), false, 10).unwrap();
    assert!(preview.header.is_none());
    assert_eq!(preview.rows.len(), 4);
}

#[test]
fn preview_empty_file_is_error() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "empty.csv", "");
    for limit in [5, 0] {
        let err = read_preview(&input, &CsvFormat::default(), false, limit).unwrap_err();
        assert!(matches!(err, CsvIoError::EmptyInput { .. }));
    }
}

#[test]
fn preview_zero_rows_of_non_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "in.csv", "1,2\n");
    let preview = read_preview(&input, &CsvFormat::default(), false, 0).unwrap();
    assert!(preview.header.is_none());
    assert!(preview.rows.is_empty());
}
