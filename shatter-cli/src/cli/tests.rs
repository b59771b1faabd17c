//! Unit tests for the CLI commands and CSV export.

use super::commands::{mean_out_degree, run_resilience};
use super::test_helpers::{command, read_column, temp_dir, write_crawl};
use super::{Cli, CliError, Command, CrawlSummary, RunSummary, render_summary, run_cli};

use std::collections::BTreeSet;
use std::fs;

use clap::Parser;
use rstest::rstest;
use shatter_core::ResilienceError;
use shatter_providers_edgelist::EdgeListProviderError;
use shatter_test_support::fixtures::{cycle_edges, path_edges, star_edges};
use shatter_test_support::tracing::RecordingLayer;
use tracing::Level;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn clap_applies_defaults() {
    let cli = Cli::try_parse_from(["shatter", "resilience", "crawl.csv"]).expect("args parse");
    let Command::Resilience(parsed) = cli.command;
    assert_eq!(parsed.paths, [std::path::PathBuf::from("crawl.csv")]);
    assert_eq!(parsed.graph_name, "ipfs");
    assert_eq!(parsed.output_dir, std::path::PathBuf::from("csv"));
    assert_eq!(parsed.iterations, 10);
    assert_eq!(parsed.removal_ratio, 0.9);
    assert_eq!(parsed.seed, 0);
    assert_eq!(parsed.random_graphs, 0);
    assert!(!parsed.ignore_uncrawlable);
    assert!(!parsed.parallel);
}

#[rstest]
fn clap_parses_every_option() {
    let cli = Cli::try_parse_from([
        "shatter",
        "resilience",
        "b.csv",
        "a.csv",
        "--graph-name",
        "eth",
        "--output-dir",
        "results",
        "--iterations",
        "3",
        "--removal-ratio",
        "0.5",
        "--seed",
        "9",
        "--random-graphs",
        "2",
        "--ignore-uncrawlable",
        "--parallel",
    ])
    .expect("args parse");
    let Command::Resilience(parsed) = cli.command;
    assert_eq!(parsed.paths.len(), 2);
    assert_eq!(parsed.graph_name, "eth");
    assert_eq!(parsed.iterations, 3);
    assert_eq!(parsed.removal_ratio, 0.5);
    assert_eq!(parsed.seed, 9);
    assert_eq!(parsed.random_graphs, 2);
    assert!(parsed.ignore_uncrawlable);
    assert!(parsed.parallel);
}

#[rstest]
fn clap_requires_an_input() {
    assert!(Cli::try_parse_from(["shatter", "resilience"]).is_err());
}

#[rstest]
fn resilience_writes_per_crawl_and_aggregated_csv() -> TestResult {
    let dir = temp_dir();
    let later = write_crawl(&dir, "200", &cycle_edges(10))?;
    let earlier = write_crawl(&dir, "100", &cycle_edges(10))?;

    let summary = run_resilience(command(&dir, vec![later, earlier]))?;

    let ids: Vec<_> = summary.crawls.iter().map(|crawl| crawl.id.as_str()).collect();
    assert_eq!(ids, ["100", "200"]);
    assert!(summary.crawls.iter().all(|crawl| crawl.targeted_rows == 9));
    assert!(summary.crawls.iter().all(|crawl| crawl.random_rows == 18));

    let root = dir.path().join("out").join("ipfs");
    let expected = [
        root.join("crawls/targeted_resilience_100.csv"),
        root.join("crawls/random_resilience_100.csv"),
        root.join("crawls/targeted_resilience_200.csv"),
        root.join("crawls/random_resilience_200.csv"),
        root.join("targeted_resilience_100_to_200.csv"),
        root.join("random_resilience_100_to_200.csv"),
    ];
    assert_eq!(summary.files, expected);
    assert!(expected.iter().all(|path| path.is_file()));

    let aggregated_ids = read_column(&root.join("random_resilience_100_to_200.csv"), "id")?;
    assert_eq!(aggregated_ids.len(), 36);
    assert_eq!(aggregated_ids.first().map(String::as_str), Some("100"));
    assert_eq!(aggregated_ids.last().map(String::as_str), Some("200"));

    let targeted_trials = read_column(&root.join("crawls/targeted_resilience_100.csv"), "trial")?;
    assert!(targeted_trials.iter().all(String::is_empty));
    let random_trials = read_column(&root.join("crawls/random_resilience_100.csv"), "trial")?;
    assert_eq!(random_trials.first().map(String::as_str), Some("0"));
    assert_eq!(random_trials.last().map(String::as_str), Some("1"));
    Ok(())
}

#[rstest]
fn resilience_is_reproducible_across_runs() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "7", &path_edges(30))?;

    let mut first = command(&dir, vec![crawl.clone()]);
    first.output_dir = dir.path().join("first");
    let mut second = command(&dir, vec![crawl]);
    second.output_dir = dir.path().join("second");
    run_resilience(first)?;
    run_resilience(second)?;

    let relative = "ipfs/crawls/random_resilience_7.csv";
    assert_eq!(
        fs::read(dir.path().join("first").join(relative))?,
        fs::read(dir.path().join("second").join(relative))?
    );
    Ok(())
}

#[rstest]
fn ignore_uncrawlable_drops_sinks() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "1", &star_edges(4))?;
    let mut options = command(&dir, vec![crawl]);
    options.ignore_uncrawlable = true;

    let summary = run_resilience(options)?;
    let crawl = &summary.crawls[0];
    assert_eq!(crawl.removed_sinks, 4);
    assert_eq!(crawl.vertices, 1);
    assert_eq!(crawl.edges, 0);
    assert_eq!(crawl.targeted_rows, 0);
    Ok(())
}

#[rstest]
fn random_graphs_are_analysed_alongside_the_crawl() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "5", &cycle_edges(10))?;
    let mut options = command(&dir, vec![crawl]);
    options.random_graphs = 1;

    let summary = run_resilience(options)?;
    assert_eq!(summary.crawls[0].targeted_rows, 27);
    assert_eq!(summary.crawls[0].random_rows, 54);

    let path = dir.path().join("out/ipfs/crawls/targeted_resilience_5.csv");
    let graph_types: BTreeSet<_> = read_column(&path, "graph_type")?.into_iter().collect();
    let expected: BTreeSet<String> = ["barabasi-albert", "erdos-renyi", "ipfs"]
        .into_iter()
        .map(str::to_owned)
        .collect();
    assert_eq!(graph_types, expected);
    Ok(())
}

#[rstest]
fn parallel_flag_runs_trials_across_threads() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "3", &cycle_edges(12))?;
    let mut options = command(&dir, vec![crawl]);
    options.parallel = true;
    let summary = run_resilience(options)?;
    assert_eq!(summary.crawls[0].random_rows, 2 * 10);
    Ok(())
}

#[rstest]
fn invalid_ratio_is_a_core_error() {
    let dir = temp_dir();
    let mut options = command(&dir, vec![dir.path().join("unused.csv")]);
    options.removal_ratio = 1.5;
    let err = run_resilience(options).expect_err("ratio must be rejected");
    assert!(matches!(
        err,
        CliError::Core(ResilienceError::InvalidRemovalRatio { .. })
    ));
}

#[rstest]
fn missing_crawl_is_a_load_error() {
    let dir = temp_dir();
    let missing = dir.path().join("peerGraph_9.csv");
    let err = run_resilience(command(&dir, vec![missing.clone()]))
        .expect_err("missing crawl must fail");
    match err {
        CliError::Load { path, source } => {
            assert_eq!(path, missing);
            assert!(matches!(source, EdgeListProviderError::Io(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn run_cli_dispatches_resilience() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "1", &cycle_edges(4))?;
    let summary = run_cli(Cli {
        command: Command::Resilience(command(&dir, vec![crawl])),
    })?;
    assert_eq!(summary.crawls.len(), 1);
    Ok(())
}

#[rstest]
fn resilience_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let crawl = write_crawl(&dir, "11", &cycle_edges(6))?;

    let (summary, layer) = RecordingLayer::capture(|| run_resilience(command(&dir, vec![crawl])));
    summary?;

    let resilience = layer.span("cli.resilience").expect("cli.resilience span must exist");
    assert_eq!(resilience.field("inputs"), Some("1"));
    assert_eq!(resilience.field("graph_name"), Some("ipfs"));
    assert_eq!(resilience.field("iterations"), Some("2"));

    let crawl = layer.span("cli.crawl").expect("cli.crawl span must exist");
    assert_eq!(crawl.field("id"), Some("11"));
    assert_eq!(crawl.field("vertices"), Some("6"));
    assert_eq!(crawl.field("edges"), Some("6"));
    assert!(crawl.field("path").is_some_and(|path| path.ends_with("peerGraph_11.csv")));

    assert!(layer.span("core.targeted").is_some());
    assert!(
        layer
            .events_with_message("resilience command completed")
            .iter()
            .any(|event| event.level == Level::INFO && event.field("files") == Some("4"))
    );
    Ok(())
}

#[rstest]
fn render_summary_lists_crawls_and_files() -> TestResult {
    let summary = RunSummary {
        crawls: vec![CrawlSummary {
            id: "42".into(),
            vertices: 10,
            edges: 12,
            removed_sinks: 1,
            targeted_rows: 9,
            random_rows: 90,
        }],
        files: vec!["out/ipfs/random_resilience_42_to_42.csv".into()],
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert_eq!(
        text,
        "crawls: 1\n\
         42\tvertices=10\tedges=12\tremoved_sinks=1\ttargeted_rows=9\trandom_rows=90\n\
         files: 1\n\
         out/ipfs/random_resilience_42_to_42.csv\n"
    );
    Ok(())
}

#[rstest]
#[case::exact(12, 4, 3)]
#[case::below_half(9, 4, 2)]
#[case::above_half(11, 4, 3)]
#[case::half_to_even_down(5, 2, 2)]
#[case::half_to_even_up(7, 2, 4)]
#[case::half_to_zero(1, 2, 0)]
#[case::no_nodes(3, 0, 0)]
fn mean_out_degree_rounds_ties_to_even(
    #[case] edges: usize,
    #[case] nodes: usize,
    #[case] expected: usize,
) {
    assert_eq!(mean_out_degree(edges, nodes), expected);
}
