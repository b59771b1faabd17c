//! Command implementations and argument parsing for the shatter CLI.

use std::cmp::Ordering;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use shatter_core::{
    DiGraph, ExecutionStrategy, Resilience, ResilienceBuilder, ResilienceError, SyntheticError,
    Topology, barabasi_albert, erdos_renyi,
};
use shatter_providers_edgelist::{EdgeListProvider, EdgeListProviderError, crawl_id};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::report::{CsvRow, CurveTables, write_rows};

const DEFAULT_GRAPH_NAME: &str = "ipfs";
const DEFAULT_OUTPUT_DIR: &str = "csv";
const DEFAULT_ITERATIONS: usize = 10;
const DEFAULT_REMOVAL_RATIO: f64 = 0.9;
const ERDOS_RENYI_LABEL: &str = "erdos-renyi";
const BARABASI_ALBERT_LABEL: &str = "barabasi-albert";
const ATTACHMENT_POWER: f64 = 2.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "shatter", about = "Measure how crawled overlay graphs fall apart.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run targeted and random removal on each crawl and export the curves.
    Resilience(ResilienceCommand),
}

/// Options accepted by the `resilience` command.
#[derive(Debug, Args, Clone)]
pub struct ResilienceCommand {
    /// Crawl edge lists (`source,target` CSV). Processed in sorted order.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Name of the crawled network, used as `graph_type` and output folder.
    #[arg(long = "graph-name", default_value = DEFAULT_GRAPH_NAME)]
    pub graph_name: String,

    /// Root directory for the exported CSV files.
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Random-removal trials per graph.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Fraction of vertices removed per run, in `[0, 1)`.
    #[arg(long = "removal-ratio", default_value_t = DEFAULT_REMOVAL_RATIO)]
    pub removal_ratio: f64,

    /// Seed applied afresh to every crawl.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Erdős–Rényi and Barabási–Albert graphs of matching size to analyse
    /// alongside each crawl.
    #[arg(long = "random-graphs", default_value_t = 0)]
    pub random_graphs: usize,

    /// Drop peers that were seen but never crawled (out-degree zero).
    #[arg(long = "ignore-uncrawlable")]
    pub ignore_uncrawlable: bool,

    /// Spread random trials across threads.
    #[arg(long)]
    pub parallel: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An output directory could not be created.
    #[error("failed to create `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A crawl edge list could not be loaded.
    #[error("failed to load `{path}`: {source}")]
    Load {
        /// Crawl file that failed to load.
        path: PathBuf,
        /// Underlying provider error.
        #[source]
        source: EdgeListProviderError,
    },
    /// A CSV report could not be written.
    #[error("failed to write `{path}`: {source}")]
    Csv {
        /// Report path.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// A comparison graph could not be generated.
    #[error(transparent)]
    Synthetic(#[from] SyntheticError),
    /// Configuration or simulation failed.
    #[error(transparent)]
    Core(#[from] ResilienceError),
}

/// Per-crawl outcome of the `resilience` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Crawl identifier derived from the file name.
    pub id: String,
    /// Vertices analysed, after any sink removal.
    pub vertices: usize,
    /// Edges analysed, after any sink removal.
    pub edges: usize,
    /// Vertices dropped as uncrawlable.
    pub removed_sinks: usize,
    /// Targeted rows exported for this crawl, comparison graphs included.
    pub targeted_rows: usize,
    /// Random rows exported for this crawl, comparison graphs included.
    pub random_rows: usize,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Crawls in processing order.
    pub crawls: Vec<CrawlSummary>,
    /// Files written, per-crawl files first.
    pub files: Vec<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, analysis or export fails. Nothing is
/// retried; the first failure ends the run.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use shatter_cli::cli::{Cli, Command, ResilienceCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let crawl = dir.path().join("peerGraph_1.csv");
/// std::fs::write(&crawl, "source,target\na,b\nb,c\nc,a\n")?;
/// let cli = Cli {
///     command: Command::Resilience(ResilienceCommand {
///         paths: vec![crawl],
///         graph_name: "demo".into(),
///         output_dir: dir.path().join("out"),
///         iterations: 2,
///         removal_ratio: 0.9,
///         seed: 0,
///         random_graphs: 0,
///         ignore_uncrawlable: false,
///         parallel: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.crawls[0].id, "1");
/// assert_eq!(summary.files.len(), 4);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<RunSummary, CliError> {
    match cli.command {
        Command::Resilience(command) => {
            Span::current().record("command", field::display("resilience"));
            run_resilience(command)
        }
    }
}

#[instrument(
    name = "cli.resilience",
    err,
    skip(command),
    fields(
        inputs = command.paths.len(),
        graph_name = %command.graph_name,
        iterations = command.iterations,
        removal_ratio = command.removal_ratio,
        seed = command.seed,
    ),
)]
pub(super) fn run_resilience(command: ResilienceCommand) -> Result<RunSummary, CliError> {
    let strategy = if command.parallel {
        ExecutionStrategy::Parallel
    } else {
        ExecutionStrategy::Sequential
    };
    let resilience = ResilienceBuilder::new()
        .with_removal_ratio(command.removal_ratio)
        .with_iterations(command.iterations)
        .with_seed(command.seed)
        .with_execution_strategy(strategy)
        .build()?;

    let output_root = command.output_dir.join(&command.graph_name);
    let crawl_dir = output_root.join("crawls");
    create_dir(&crawl_dir)?;

    let mut paths = command.paths.clone();
    paths.sort();

    let mut aggregate = CurveTables::default();
    let mut crawls = Vec::with_capacity(paths.len());
    let mut files = Vec::new();
    for path in &paths {
        let (summary, tables) = analyse_crawl(&resilience, &command, path)?;
        files.push(export(
            &crawl_dir.join(format!("targeted_resilience_{}.csv", summary.id)),
            &tables.targeted,
        )?);
        files.push(export(
            &crawl_dir.join(format!("random_resilience_{}.csv", summary.id)),
            &tables.random,
        )?);
        aggregate.append(&tables);
        crawls.push(summary);
    }

    if let (Some(first), Some(last)) = (crawls.first(), crawls.last()) {
        let span = format!("{}_to_{}", first.id, last.id);
        files.push(export(
            &output_root.join(format!("targeted_resilience_{span}.csv")),
            &aggregate.targeted,
        )?);
        files.push(export(
            &output_root.join(format!("random_resilience_{span}.csv")),
            &aggregate.random,
        )?);
    }

    info!(crawls = crawls.len(), files = files.len(), "resilience command completed");
    Ok(RunSummary { crawls, files })
}

#[instrument(
    name = "cli.crawl",
    err,
    skip(resilience, command, path),
    fields(path = %path.display(), id = field::Empty, vertices = field::Empty, edges = field::Empty),
)]
fn analyse_crawl(
    resilience: &Resilience,
    command: &ResilienceCommand,
    path: &Path,
) -> Result<(CrawlSummary, CurveTables), CliError> {
    let id = crawl_id(path);
    let mut graph = EdgeListProvider::try_from_path(command.graph_name.as_str(), path)
        .map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .into_graph();
    let removed_sinks = if command.ignore_uncrawlable {
        graph.remove_sinks()
    } else {
        0
    };

    let span = Span::current();
    span.record("id", field::display(&id));
    span.record("vertices", graph.vertex_count());
    span.record("edges", graph.edge_count());

    let mut tables = CurveTables::default();
    tables.push_analysis(&resilience.analyse(&graph)?, &command.graph_name, &id);
    for (label, comparison) in comparison_graphs(resilience, &graph, command.random_graphs)? {
        tables.push_analysis(&resilience.analyse(&comparison)?, label, &id);
    }

    info!(
        targeted_rows = tables.targeted.len(),
        random_rows = tables.random.len(),
        removed_sinks,
        "crawl analysed"
    );
    let summary = CrawlSummary {
        id,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        removed_sinks,
        targeted_rows: tables.targeted.len(),
        random_rows: tables.random.len(),
    };
    Ok((summary, tables))
}

/// Builds `count` Erdős–Rényi graphs followed by `count` Barabási–Albert
/// graphs matching `crawl`'s size, from a stream seeded like the analysis.
fn comparison_graphs(
    resilience: &Resilience,
    crawl: &DiGraph,
    count: usize,
) -> Result<Vec<(&'static str, DiGraph)>, SyntheticError> {
    let nodes = crawl.vertex_count();
    let edges = crawl.edge_count();
    if count == 0 || nodes == 0 {
        return Ok(Vec::new());
    }
    let out_edges = mean_out_degree(edges, nodes);

    let mut rng = resilience.rng();
    let mut graphs = Vec::with_capacity(2 * count);
    for _ in 0..count {
        graphs.push((ERDOS_RENYI_LABEL, erdos_renyi(nodes, edges, &mut rng)?));
    }
    for _ in 0..count {
        graphs.push((
            BARABASI_ALBERT_LABEL,
            barabasi_albert(nodes, out_edges, ATTACHMENT_POWER, &mut rng)?,
        ));
    }
    Ok(graphs)
}

/// Mean out-degree `edges / nodes` rounded to the nearest integer, ties to
/// even.
pub(super) fn mean_out_degree(edges: usize, nodes: usize) -> usize {
    if nodes == 0 {
        return 0;
    }
    let quotient = edges / nodes;
    let twice_remainder = 2 * (edges % nodes);
    match twice_remainder.cmp(&nodes) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + quotient % 2,
    }
}

fn export(path: &Path, rows: &[CsvRow]) -> Result<PathBuf, CliError> {
    write_rows(path, rows).map_err(|source| CliError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

fn create_dir(path: &Path) -> Result<(), CliError> {
    fs::create_dir_all(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use shatter_cli::cli::{CrawlSummary, RunSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = RunSummary {
///     crawls: vec![CrawlSummary {
///         id: "42".into(),
///         vertices: 10,
///         edges: 10,
///         removed_sinks: 0,
///         targeted_rows: 9,
///         random_rows: 90,
///     }],
///     files: vec!["csv/ipfs/targeted_resilience_42_to_42.csv".into()],
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("crawls: 1\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &RunSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "crawls: {}", summary.crawls.len())?;
    for crawl in &summary.crawls {
        writeln!(
            writer,
            "{}\tvertices={}\tedges={}\tremoved_sinks={}\ttargeted_rows={}\trandom_rows={}",
            crawl.id,
            crawl.vertices,
            crawl.edges,
            crawl.removed_sinks,
            crawl.targeted_rows,
            crawl.random_rows,
        )?;
    }
    writeln!(writer, "files: {}", summary.files.len())?;
    for file in &summary.files {
        writeln!(writer, "{}", file.display())?;
    }
    Ok(())
}
