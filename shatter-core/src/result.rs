//! Result types for resilience runs.
//!
//! A removal run produces one [`RemovalRecord`] per step. Records are grouped
//! into a [`TrialResult`], and repeated trials are concatenated into a
//! [`ResilienceReport`] whose [`ReportRow`]s feed tabular exports.

/// Connectivity observed after one removal step.
///
/// # Examples
/// ```
/// use shatter_core::RemovalRecord;
///
/// let record = RemovalRecord::new(0.25, 80.0);
/// assert_eq!(record.fraction_removed(), 0.25);
/// assert_eq!(record.largest_component_share(), 80.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovalRecord {
    fraction_removed: f64,
    largest_component_share: f64,
}

impl RemovalRecord {
    /// Creates a record from a removed fraction and a component share in
    /// percent.
    #[must_use]
    pub const fn new(fraction_removed: f64, largest_component_share: f64) -> Self {
        Self {
            fraction_removed,
            largest_component_share,
        }
    }

    /// Fraction of the *initial* vertices removed before this step's
    /// deletion, i.e. `step / n0`.
    #[must_use]
    pub const fn fraction_removed(&self) -> f64 {
        self.fraction_removed
    }

    /// Percentage of the remaining vertices that sit in the largest weakly
    /// connected component after this step's deletion.
    #[must_use]
    pub const fn largest_component_share(&self) -> f64 {
        self.largest_component_share
    }
}

/// Zero-based index of a repeated trial.
///
/// # Examples
/// ```
/// use shatter_core::TrialIndex;
///
/// let index = TrialIndex::new(3);
/// assert_eq!(index.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrialIndex(usize);

impl TrialIndex {
    /// Creates a trial index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(index: usize) -> Self { Self(index) }

    /// Returns the underlying index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// The ordered records of one removal run.
///
/// Targeted runs are deterministic and carry no trial index; random runs
/// are tagged by the aggregator.
///
/// # Examples
/// ```
/// use shatter_core::{RemovalRecord, TrialIndex, TrialResult};
///
/// let result = TrialResult::new(vec![RemovalRecord::new(0.0, 100.0)]);
/// assert_eq!(result.trial(), None);
///
/// let tagged = result.tagged(TrialIndex::new(2));
/// assert_eq!(tagged.trial(), Some(TrialIndex::new(2)));
/// assert_eq!(tagged.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrialResult {
    trial: Option<TrialIndex>,
    records: Vec<RemovalRecord>,
}

impl TrialResult {
    /// Wraps untagged records.
    #[must_use]
    pub fn new(records: Vec<RemovalRecord>) -> Self {
        Self {
            trial: None,
            records,
        }
    }

    /// Tags the result with a trial index.
    #[must_use]
    pub fn tagged(mut self, index: TrialIndex) -> Self {
        self.trial = Some(index);
        self
    }

    /// Returns the trial index, if any.
    #[must_use]
    pub fn trial(&self) -> Option<TrialIndex> {
        self.trial
    }

    /// Returns the records in step order.
    #[must_use]
    pub fn records(&self) -> &[RemovalRecord] {
        &self.records
    }

    /// Returns the number of removal steps recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no removal step was executed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flattens the result into report rows.
    pub fn rows(&self) -> impl Iterator<Item = ReportRow> + '_ {
        let trial = self.trial.map(TrialIndex::get);
        self.records.iter().map(move |record| ReportRow {
            fraction_removed: record.fraction_removed(),
            largest_component_share: record.largest_component_share(),
            trial,
        })
    }
}

/// One tabular row of a resilience report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    /// Fraction of the initial vertices removed before the step.
    pub fraction_removed: f64,
    /// Largest weak component as a percentage of the remaining vertices.
    pub largest_component_share: f64,
    /// Trial index for repeated runs; `None` for the targeted run.
    pub trial: Option<usize>,
}

/// Concatenation of repeated trials in trial-index order.
///
/// The report does not summarise across trials; means and spreads are left
/// to whoever consumes the rows.
///
/// # Examples
/// ```
/// use shatter_core::{RemovalRecord, ResilienceReport, TrialIndex, TrialResult};
///
/// let report = ResilienceReport::from_trials(vec![
///     TrialResult::new(vec![RemovalRecord::new(0.0, 100.0)]).tagged(TrialIndex::new(0)),
///     TrialResult::new(vec![RemovalRecord::new(0.0, 50.0)]).tagged(TrialIndex::new(1)),
/// ]);
/// let trials: Vec<_> = report.rows().map(|row| row.trial).collect();
/// assert_eq!(trials, [Some(0), Some(1)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResilienceReport {
    trials: Vec<TrialResult>,
}

impl ResilienceReport {
    /// Builds a report from trials that are already in order.
    #[must_use]
    pub fn from_trials(trials: Vec<TrialResult>) -> Self {
        Self { trials }
    }

    /// Returns the trials in order.
    #[must_use]
    pub fn trials(&self) -> &[TrialResult] {
        &self.trials
    }

    /// Returns the total number of rows across all trials.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.trials.iter().map(TrialResult::len).sum()
    }

    /// Iterates every row of every trial, trial by trial.
    pub fn rows(&self) -> impl Iterator<Item = ReportRow> + '_ {
        self.trials.iter().flat_map(TrialResult::rows)
    }
}

/// Targeted and random decay curves computed for the same input graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceAnalysis {
    /// Max-degree removal curve.
    pub targeted: TrialResult,
    /// Repeated random removal curves.
    pub random: ResilienceReport,
}
