//! csvops command-line entry point.

use clap::Parser;

use csvops_cli::cli::{Cli, Command};
use csvops_cli::commands::{
    run_dedupe, run_filter, run_merge, run_preview, run_split, run_stats, run_to_sqlite,
    stats_json,
};
use csvops_cli::logging::{LogConfig, init_logging};
use csvops_cli::summary::{
    print_dedupe_summary, print_filter_summary, print_merge_summary, print_split_summary,
    print_sqlite_summary, print_stats,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = LogConfig::from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let progress = !cli.no_progress;
    match &cli.command {
        Command::Dedupe(args) => print_dedupe_summary(&run_dedupe(args, progress)?),
        Command::Filter(args) => print_filter_summary(&run_filter(args, progress)?),
        Command::Merge(args) => print_merge_summary(&run_merge(args, progress)?),
        Command::Split(args) => print_split_summary(&run_split(args, progress)?),
        Command::Stats(args) => {
            let stats = run_stats(args, progress)?;
            if args.json {
                println!("{}", stats_json(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        Command::Preview(args) => run_preview(args)?,
        Command::ToSqlite(args) => print_sqlite_summary(&run_to_sqlite(args, progress)?),
    }
    Ok(())
}
