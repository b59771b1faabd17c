//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests write crawl files into a temporary directory and read
//! the exported CSV back. These helpers keep the cases short.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use shatter_test_support::fixtures::{Edge, crawl_csv};
use tempfile::TempDir;

use super::ResilienceCommand;

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_crawl(dir: &TempDir, id: &str, edges: &[Edge]) -> io::Result<PathBuf> {
    let path = dir.path().join(format!("peerGraph_{id}.csv"));
    fs::write(&path, crawl_csv(edges))?;
    Ok(path)
}

/// Command with small defaults writing under `dir/out`.
pub(super) fn command(dir: &TempDir, paths: Vec<PathBuf>) -> ResilienceCommand {
    ResilienceCommand {
        paths,
        graph_name: "ipfs".into(),
        output_dir: dir.path().join("out"),
        iterations: 2,
        removal_ratio: 0.9,
        seed: 0,
        random_graphs: 0,
        ignore_uncrawlable: false,
        parallel: false,
    }
}

/// Values of `column` for every row of the CSV at `path`.
pub(super) fn read_column(path: &Path, column: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .unwrap_or_else(|| panic!("column `{column}` missing from {}", path.display()));
    reader
        .records()
        .map(|record| record.map(|row| row.get(index).unwrap_or_default().to_owned()))
        .collect()
}
