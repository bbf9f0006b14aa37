//! CLI entry point for the DataLens interactive shell.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod commands;
mod repl;
mod session;

use session::Session;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Interactive tabular data exploration and profiling",
    long_about = "Load a CSV file, a shared spreadsheet link or a PostgreSQL table,\n\
                  inspect a sample, and generate a descriptive-statistics report\n\
                  as a self-contained HTML file.\n\n\
                  EXAMPLES:\n  \
                  # Start the shell\n  \
                  datalens\n\n  \
                  # Open a CSV on startup\n  \
                  datalens data.csv\n\n  \
                  # Write reports somewhere else\n  \
                  datalens --reports-dir /tmp/reports"
)]
struct Args {
    /// CSV file to open before entering the shell
    input: Option<PathBuf>,

    /// Directory where generated HTML reports are written
    #[arg(short, long, default_value = "./reports")]
    reports_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let mut session = Session::new(args.reports_dir.clone());

    if let Some(path) = &args.input {
        if let Err(e) = commands::open_file(&mut session, path) {
            eprintln!("error: {e}");
        }
    }

    repl::run(&mut session).await
}
