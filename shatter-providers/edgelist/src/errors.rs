use std::io;

use thiserror::Error;

/// Failure to load a crawled edge list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EdgeListProviderError {
    /// The input could not be opened or read.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The input is not well-formed CSV.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The header row lacks a required column.
    #[error("column `{column}` not found in edge-list header")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },
    /// The input has a header but no edges.
    #[error("edge list contains no edges")]
    EmptyInput,
    /// The graph rejected the crawled vertices.
    #[error("graph error: {0}")]
    Graph(#[from] shatter_core::GraphError),
}
