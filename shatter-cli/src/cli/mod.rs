//! Command-line interface for resilience analysis of crawled overlays.
//!
//! The `resilience` command loads one or more crawl edge lists, runs the
//! targeted and random removal analyses on each, and writes the decay
//! curves as CSV.

mod commands;
mod report;

pub use commands::{
    Cli, CliError, Command, CrawlSummary, ResilienceCommand, RunSummary, render_summary, run_cli,
};
pub use report::CsvRow;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
