//! export-iphone-sms - Export SMS from an iPhone backup.
//!
//! Locates the SMS `SQLite` database inside an iPhone backup directory,
//! lets the user pick one when several backups hold one, and exports the
//! messages as text, CSV, JSON, XML or HTML.
//!
//!   export-iphone-sms txt
//!   export-iphone-sms -E latin1 txt > sms.txt
//!   export-iphone-sms -b /path/to/backup/copy csv > sms.csv
//!
//! Exit status: 0 success, 1 error, 2 several databases in quiet mode,
//! 3 unsupported format, 4 no database found.

mod application;
mod cli;
mod domain;
mod infrastructure;

#[cfg(test)]
mod test_support;

use std::io;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    CandidateSelector, DatabaseLocator, ExportEngine, MessageLoader, RecordFilter, Selection,
};
use cli::Cli;
use domain::{AppConfig, EXIT_SUCCESS};
use infrastructure::{load_config, OutputTarget};

fn main() {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

/// Main application logic.
fn run(cli: &Cli) -> domain::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    setup_logging(config.export.quiet, cli.verbose);

    export_sms(cli, &config)
}

/// Locates, selects and exports one SMS database.
///
/// A missing or ambiguous backup is reported before an unknown format, and
/// an unknown format before invalid option values.
fn export_sms(cli: &Cli, config: &AppConfig) -> domain::Result<()> {
    let locator = DatabaseLocator::from_config(&config.discovery);
    let candidates = locator.locate();

    let mut selector =
        CandidateSelector::new(config.export.quiet, io::stdin().lock(), io::stderr());
    let candidate = match selector.select(locator.root(), candidates)? {
        Selection::Selected(candidate) => candidate,
        Selection::Quit => return Ok(()),
    };

    let mut engine = ExportEngine::new();
    engine.ensure_supported(&cli.format)?;

    let encoding = config.export.output_encoding()?;
    let filter = RecordFilter::new(cli.address.as_deref())?;

    let mut loader = MessageLoader::open(&candidate.path, filter)?;

    let mut stdout = io::stdout().lock();
    let target = cli
        .output
        .clone()
        .map_or(OutputTarget::Writer(&mut stdout), OutputTarget::File);

    let exported = engine.export(
        &mut loader,
        &cli.format,
        target,
        encoding,
        config.export.mode,
    );
    let closed = loader.close();

    exported?;
    closed
}

/// Setup tracing/logging. Logs go to stderr so stdout stays a clean export.
fn setup_logging(quiet: bool, verbosity: u8) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}
