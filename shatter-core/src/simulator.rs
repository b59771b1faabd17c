//! The removal loop: delete vertices one at a time and record how the
//! largest weakly connected component decays.

use rand::Rng;
use tracing::{Span, field, instrument, trace};

use crate::{
    Result,
    error::{RemovalError, ResilienceError},
    policy::RemovalPolicy,
    result::{RemovalRecord, TrialResult},
    topology::Topology,
};

/// Relative slack absorbing the binary rounding of `vertices * ratio`, so
/// that `100 * 0.29` counts as 29 rather than `28.999...`.
const STEP_TOLERANCE: f64 = 1e-9;

/// Fraction of the initial vertices a run removes before stopping.
///
/// Valid ratios are finite and lie in `[0, 1)`, which guarantees that at
/// least one vertex survives every run.
///
/// # Examples
/// ```
/// use shatter_core::RemovalRatio;
///
/// let ratio = RemovalRatio::new(0.9)?;
/// assert_eq!(ratio.steps_for(10), 9);
/// assert_eq!(ratio.steps_for(1), 0);
/// assert!(RemovalRatio::new(1.0).is_err());
/// # Ok::<(), shatter_core::ResilienceError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RemovalRatio(f64);

impl RemovalRatio {
    /// Ratio used when none is configured.
    pub const DEFAULT: Self = Self(0.9);

    /// Validates `ratio`.
    ///
    /// # Errors
    /// Returns [`ResilienceError::InvalidRemovalRatio`] when `ratio` is not
    /// finite or falls outside `[0, 1)`.
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio.is_finite() && (0.0..1.0).contains(&ratio) {
            Ok(Self(ratio))
        } else {
            Err(ResilienceError::InvalidRemovalRatio { got: ratio })
        }
    }

    /// Returns the raw ratio.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Number of removal steps for a graph that starts with `vertices`
    /// vertices: `floor(vertices * ratio)`, never more than `vertices - 1`.
    ///
    /// The product is taken as the decimal value the ratio was written as,
    /// so `0.29` of 100 vertices is 29 steps.
    #[must_use]
    pub fn steps_for(self, vertices: usize) -> usize {
        let product = vertices as f64 * self.0;
        let steps = (product + product * STEP_TOLERANCE).floor() as usize;
        steps.min(vertices.saturating_sub(1))
    }
}

impl Default for RemovalRatio {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs one decay simulation, destructively, on `graph`.
///
/// Step `i` asks `policy` for a vertex of the current graph, deletes it,
/// and records `i / n0` together with the share of the remaining vertices
/// held by the largest weak component. Callers pass an expendable copy.
///
/// # Errors
/// Any policy or graph failure aborts the run with
/// [`ResilienceError::SimulationFailed`] carrying the failed step.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use shatter_core::{DiGraph, RemovalPolicy, RemovalRatio, simulate_removal};
///
/// let mut graph = DiGraph::from_edges([("a", "b"), ("b", "c"), ("c", "d")])?;
/// let mut rng = SmallRng::seed_from_u64(0);
/// let result = simulate_removal(
///     &mut graph,
///     RemovalPolicy::MaxDegree,
///     RemovalRatio::new(0.5)?,
///     &mut rng,
/// )?;
/// assert_eq!(result.len(), 2);
/// assert_eq!(result.records()[1].fraction_removed(), 0.25);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.simulate",
    err,
    skip(graph, rng),
    fields(
        policy = policy.as_str(),
        vertices = graph.vertex_count(),
        removal_ratio = removal_ratio.get(),
        steps = field::Empty,
    ),
)]
pub fn simulate_removal<G: Topology, R: Rng + ?Sized>(
    graph: &mut G,
    policy: RemovalPolicy,
    removal_ratio: RemovalRatio,
    rng: &mut R,
) -> Result<TrialResult> {
    let initial = graph.vertex_count();
    let steps = removal_ratio.steps_for(initial);
    Span::current().record("steps", steps);

    let mut records = Vec::with_capacity(steps);
    for step in 0..steps {
        let share = remove_one(graph, policy, rng).map_err(|error| {
            ResilienceError::SimulationFailed {
                step,
                trial: None,
                error,
            }
        })?;
        let record = RemovalRecord::new(step as f64 / initial as f64, share);
        trace!(
            step,
            fraction_removed = record.fraction_removed(),
            largest_component_share = share,
            "removal step completed"
        );
        records.push(record);
    }

    #[cfg(feature = "metrics")]
    metrics::counter!("resilience_removal_steps").increment(steps as u64);

    Ok(TrialResult::new(records))
}

fn remove_one<G: Topology, R: Rng + ?Sized>(
    graph: &mut G,
    policy: RemovalPolicy,
    rng: &mut R,
) -> core::result::Result<f64, RemovalError> {
    let target = policy.select(graph, rng)?;
    graph.delete_vertex(target)?;
    Ok(largest_component_share(graph))
}

/// Percentage of `graph`'s vertices held by its largest weak component.
///
/// A graph with at most one vertex is trivially connected and reports 100.
#[must_use]
pub fn largest_component_share<G: Topology>(graph: &G) -> f64 {
    let remaining = graph.vertex_count();
    if remaining <= 1 {
        return 100.0;
    }
    graph.largest_weak_component() as f64 * 100.0 / remaining as f64
}
