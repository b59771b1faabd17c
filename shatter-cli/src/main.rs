//! `shatter` binary.
//!
//! Installs logging, runs the parsed command and prints its summary on
//! stdout. Failures are logged with their stable codes before the process
//! exits with [`ExitCode::FAILURE`].

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use shatter_cli::{
    cli::{Cli, CliError, RunSummary, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn print_summary(summary: &RunSummary) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(summary, &mut out).context("could not write the run summary")?;
    out.flush().context("could not flush stdout")
}

/// Stable codes attached to a failure, when the failing layer defines them.
fn failure_codes(err: &anyhow::Error) -> (Option<&'static str>, Option<&'static str>) {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (
            Some(core.code().as_str()),
            core.removal_code().map(|code| code.as_str()),
        ),
        Some(CliError::Synthetic(synthetic)) => (Some(synthetic.code().as_str()), None),
        _ => (None, None),
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let outcome = run_cli(Cli::parse())
        .context("resilience run failed")
        .and_then(|summary| print_summary(&summary));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, removal_code) = failure_codes(&err);
            error!(
                error = %format_args!("{err:#}"),
                code = code.map(field::display),
                removal_code = removal_code.map(field::display),
                "shatter failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to carry this diagnostic"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("shatter: cannot initialise logging: {err}");
}
