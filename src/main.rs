//! markdiff - word-level side-by-side diff for text and markup files
//!
//! markdiff provides:
//! - Longest-common-subsequence alignment over whitespace-separated words
//! - Line reconciliation so both versions render row by row
//! - Report, side-by-side HTML and JSON output
//! - Pairwise comparison of two directory trees

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backends;
mod cli;
mod core;
mod flows;

/// Log to stderr; RUST_LOG takes precedence over the flags
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}
