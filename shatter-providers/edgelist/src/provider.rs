//! CSV ingestion for crawler edge lists.
use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use shatter_core::{DiGraph, Topology};
use tracing::{debug, instrument};

use crate::errors::EdgeListProviderError;

const SOURCE_COLUMN: &str = "source";
const TARGET_COLUMN: &str = "target";
const CRAWL_PREFIX: &str = "peerGraph_";

/// Crawled peer graph loaded from a `source,target` edge list.
///
/// Loops and repeated edges in the input are dropped; vertices are numbered
/// in order of first appearance.
#[derive(Debug, Clone)]
pub struct EdgeListProvider {
    name: String,
    graph: DiGraph,
}

impl EdgeListProvider {
    /// Loads an edge list from a CSV file.
    ///
    /// # Errors
    /// Returns [`EdgeListProviderError::Io`] if the file cannot be opened and
    /// any error documented on [`EdgeListProvider::try_from_reader`].
    #[instrument(name = "provider.edgelist.load", err, skip(name, path), fields(path = %path.as_ref().display()))]
    pub fn try_from_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, EdgeListProviderError> {
        let file = File::open(path.as_ref())?;
        Self::try_from_reader(name, file)
    }

    /// Loads an edge list from any reader producing headed CSV.
    ///
    /// Columns other than `source` and `target` are ignored, as are rows
    /// with a blank endpoint.
    ///
    /// # Errors
    /// Returns [`EdgeListProviderError::MissingColumn`] when either column is
    /// absent, [`EdgeListProviderError::EmptyInput`] when no usable edge rows
    /// follow the header, and [`EdgeListProviderError::Csv`] for malformed rows.
    ///
    /// # Examples
    /// ```
    /// use shatter_core::Topology;
    /// use shatter_providers_edgelist::EdgeListProvider;
    ///
    /// let csv = "source,target,rtt\na,b,12\nb,c,8\na,b,15\n";
    /// let provider = EdgeListProvider::try_from_reader("demo", csv.as_bytes())?;
    /// assert_eq!(provider.graph().vertex_count(), 3);
    /// assert_eq!(provider.graph().edge_count(), 2);
    /// # Ok::<(), shatter_providers_edgelist::EdgeListProviderError>(())
    /// ```
    pub fn try_from_reader<R: Read>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, EdgeListProviderError> {
        let mut rows = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = rows.headers()?.clone();
        let source = column_index(&headers, SOURCE_COLUMN)?;
        let target = column_index(&headers, TARGET_COLUMN)?;

        let mut edges = Vec::new();
        let mut skipped = 0_usize;
        let mut record = StringRecord::new();
        while rows.read_record(&mut record)? {
            match endpoints(&record, source, target) {
                Some((from, to)) => edges.push((from.to_owned(), to.to_owned())),
                None => skipped += 1,
            }
        }
        if edges.is_empty() {
            return Err(EdgeListProviderError::EmptyInput);
        }

        let edge_rows = edges.len();
        let graph = DiGraph::from_edges(edges)?;
        let name = name.into();
        debug!(
            name = %name,
            rows = edge_rows,
            skipped,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "loaded edge list"
        );
        Ok(Self { name, graph })
    }

    /// Returns the provider name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the simplified crawl graph.
    #[must_use]
    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }

    /// Consumes the provider and returns its graph.
    #[must_use]
    pub fn into_graph(self) -> DiGraph {
        self.graph
    }
}

/// Both endpoints of a row, or `None` when either one is blank.
fn endpoints(record: &StringRecord, source: usize, target: usize) -> Option<(&str, &str)> {
    let from = record.get(source).filter(|label| !label.is_empty())?;
    let to = record.get(target).filter(|label| !label.is_empty())?;
    Some((from, to))
}

fn column_index(
    headers: &StringRecord,
    column: &'static str,
) -> Result<usize, EdgeListProviderError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or(EdgeListProviderError::MissingColumn { column })
}

/// Identifier of the crawl stored at `path`.
///
/// Crawlers name their output `peerGraph_<timestamp>.csv`; the identifier is
/// the file stem with that prefix removed. Other stems are used unchanged.
///
/// # Examples
/// ```
/// use shatter_providers_edgelist::crawl_id;
///
/// assert_eq!(crawl_id("crawls/peerGraph_2023-01-05.csv"), "2023-01-05");
/// assert_eq!(crawl_id("other.csv"), "other");
/// ```
#[must_use]
pub fn crawl_id(path: impl AsRef<Path>) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix(CRAWL_PREFIX) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => stem,
    }
}
