//! Thin CLI harness (SPEC_FULL §10): wires config loading, the scan
//! pipeline, and a summary table to stdout. This is not the renderer
//! collaborator §6 describes — it prints the counters §7 requires and
//! nothing else; C4/ADR rendering lives outside this crate's scope.

mod ast;
mod config;
mod error;
mod logging;
mod model;
mod parsing;
mod pipeline;
mod scanners;
mod types;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use config::Config;
use error::ScanError;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use pipeline::CancellationToken;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scanarch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Static scanner dispatch and aggregation engine for architecture discovery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a repository, run the enabled scanners, and print a summary.
    Scan {
        /// Root directory to scan. Overrides `scan.root` from the config file.
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Path to a `scanarch.yaml` configuration document. Missing or
        /// malformed files fall back to defaults (§6) — this is a logged
        /// warning, never a CLI error.
        #[arg(short, long, default_value = "scanarch.yaml")]
        config: PathBuf,

        /// Extra scanner IDs to enable on top of the configured groups.
        #[arg(long = "enable", value_delimiter = ',')]
        enable: Vec<String>,

        /// Scanner IDs to disable even if a configured group enables them.
        #[arg(long = "disable", value_delimiter = ',')]
        disable: Vec<String>,
    },
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { root, config, enable, disable } => run_scan(&root, &config, enable, disable),
    }
}

fn run_scan(root: &std::path::Path, config_path: &std::path::Path, enable: Vec<String>, disable: Vec<String>) -> ExitCode {
    let mut config = Config::load(config_path);
    config.scan.root = root.to_path_buf();
    config.scanners.enabled.extend(enable);
    config.scanners.disabled.extend(disable);

    let cancellation = CancellationToken::new();
    match pipeline::scan(&config.scan.root, &config, &cancellation) {
        Ok((model, summary)) => {
            print_summary(&summary);
            let _ = model; // read-only handoff point for a renderer collaborator (§6)
            ExitCode::SUCCESS
        }
        Err(ScanError::Cancelled) => {
            eprintln!("{}", "scan cancelled".red());
            ExitCode::FAILURE
        }
        Err(err @ ScanError::FatalIo { .. }) => {
            eprintln!("{}", format!("scan failed: {err}").red());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{}", format!("scan failed: {err}").red());
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &pipeline::ScanSummary) {
    let colorize = std::io::stdout().is_terminal();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("files scanned"),
        Cell::new("files skipped"),
        Cell::new("scanners run"),
        Cell::new("findings emitted"),
        Cell::new("nodes"),
        Cell::new("edges"),
    ]);
    table.add_row(vec![
        summary.files_scanned.to_string(),
        summary.files_skipped.to_string(),
        summary.scanners_run.to_string(),
        summary.findings_emitted.to_string(),
        summary.nodes.to_string(),
        summary.edges.to_string(),
    ]);

    if colorize {
        println!("{}", "scan summary".green().bold());
    } else {
        println!("scan summary");
    }
    println!("{table}");
}
