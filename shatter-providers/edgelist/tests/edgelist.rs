#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Integration tests for loading crawled edge lists.
use std::{fs, io::Cursor};

use rstest::rstest;
use shatter_core::Topology;
use shatter_providers_edgelist::{EdgeListProvider, EdgeListProviderError};
use shatter_test_support::fixtures::{crawl_csv, cycle_edges, star_edges};

#[rstest]
fn loads_a_crawl_csv_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("peerGraph_42.csv");
    fs::write(&path, crawl_csv(&cycle_edges(6)))?;

    let provider = EdgeListProvider::try_from_path("ipfs", &path)?;
    assert_eq!(provider.name(), "ipfs");
    assert_eq!(provider.graph().vertex_count(), 6);
    assert_eq!(provider.graph().edge_count(), 6);
    assert_eq!(provider.graph().weak_component_sizes(), vec![6]);
    Ok(())
}

#[rstest]
fn simplifies_loops_and_duplicates() {
    let csv = "source,target\na,b\na,b\nb,b\nb,a\n";
    let provider =
        EdgeListProvider::try_from_reader("dupes", Cursor::new(csv)).expect("provider must load");
    assert_eq!(provider.graph().vertex_count(), 2);
    assert_eq!(provider.graph().edge_count(), 2);
}

#[rstest]
fn vertices_follow_first_appearance() {
    let provider = EdgeListProvider::try_from_reader("star", Cursor::new(crawl_csv(&star_edges(3))))
        .expect("provider must load");
    let graph = provider.into_graph();
    let labels: Vec<_> = graph
        .vertices()
        .map(|vertex| graph.label(vertex).expect("live vertex").to_owned())
        .collect();
    assert_eq!(labels, ["0", "1", "2", "3"]);
}

#[rstest]
#[case("peer,target\na,b\n", "source")]
#[case("source,neighbour\na,b\n", "target")]
fn missing_columns_are_reported(#[case] csv: &str, #[case] column: &str) {
    let err = EdgeListProvider::try_from_reader("bad", Cursor::new(csv))
        .expect_err("header must be rejected");
    assert!(matches!(
        err,
        EdgeListProviderError::MissingColumn { column: found } if found == column
    ));
}

#[rstest]
fn header_only_input_is_empty() {
    let err = EdgeListProvider::try_from_reader("empty", Cursor::new("source,target\n"))
        .expect_err("empty input must be rejected");
    assert!(matches!(err, EdgeListProviderError::EmptyInput));
}

#[rstest]
fn rows_with_blank_endpoints_are_skipped() {
    let csv = "source,target\na,\nb,\nc,d\n, e\n";
    let provider =
        EdgeListProvider::try_from_reader("blanks", Cursor::new(csv)).expect("provider must load");
    let graph = provider.into_graph();
    let labels: Vec<_> = graph
        .vertices()
        .map(|vertex| graph.label(vertex).expect("live vertex").to_owned())
        .collect();
    assert_eq!(labels, ["c", "d"]);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.weak_component_sizes(), vec![2]);
}

#[rstest]
fn only_blank_rows_are_empty_input() {
    let err = EdgeListProvider::try_from_reader("blanks", Cursor::new("source,target\na,\n,b\n"))
        .expect_err("blank rows carry no edges");
    assert!(matches!(err, EdgeListProviderError::EmptyInput));
}

#[rstest]
fn ragged_rows_are_csv_errors() {
    let err = EdgeListProvider::try_from_reader("ragged", Cursor::new("source,target\na,b,c\n"))
        .expect_err("ragged rows must be rejected");
    assert!(matches!(err, EdgeListProviderError::Csv(_)));
}

#[rstest]
fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = EdgeListProvider::try_from_path("gone", dir.path().join("absent.csv"))
        .expect_err("missing file must be rejected");
    assert!(matches!(err, EdgeListProviderError::Io(_)));
}
