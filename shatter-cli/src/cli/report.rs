//! CSV export of decay curves.

use std::path::Path;

use csv::Writer;
use serde::Serialize;
use shatter_core::{ReportRow, ResilienceAnalysis};

const HEADER: [&str; 5] = [
    "fraction_removed",
    "largest_component_share",
    "trial",
    "graph_type",
    "id",
];

/// One exported row: a removal step labelled with the graph it came from.
///
/// `trial` is empty for targeted rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    /// Fraction of the initial vertices removed before the step.
    pub fraction_removed: f64,
    /// Largest weak component as a percentage of the remaining vertices.
    pub largest_component_share: f64,
    /// Random trial index.
    pub trial: Option<usize>,
    /// Crawled network name or synthetic model label.
    pub graph_type: String,
    /// Crawl identifier.
    pub id: String,
}

impl CsvRow {
    fn labelled(row: ReportRow, graph_type: &str, id: &str) -> Self {
        Self {
            fraction_removed: row.fraction_removed,
            largest_component_share: row.largest_component_share,
            trial: row.trial,
            graph_type: graph_type.to_owned(),
            id: id.to_owned(),
        }
    }
}

/// Targeted and random rows collected for one or more graphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct CurveTables {
    pub(super) targeted: Vec<CsvRow>,
    pub(super) random: Vec<CsvRow>,
}

impl CurveTables {
    pub(super) fn push_analysis(&mut self, analysis: &ResilienceAnalysis, graph_type: &str, id: &str) {
        self.targeted.extend(
            analysis
                .targeted
                .rows()
                .map(|row| CsvRow::labelled(row, graph_type, id)),
        );
        self.random.extend(
            analysis
                .random
                .rows()
                .map(|row| CsvRow::labelled(row, graph_type, id)),
        );
    }

    pub(super) fn append(&mut self, other: &Self) {
        self.targeted.extend_from_slice(&other.targeted);
        self.random.extend_from_slice(&other.random);
    }
}

/// Writes `rows` to `path` with a header, replacing any existing file.
pub(super) fn write_rows(path: &Path, rows: &[CsvRow]) -> Result<(), csv::Error> {
    let mut writer = Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(HEADER)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
