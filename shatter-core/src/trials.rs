//! Repeated removal trials over independent copies of one graph.
//!
//! Sequential execution threads a single random stream through every trial
//! in order, so the whole series is a pure function of the starting seed.
//! Parallel execution derives one stream per trial from the same seed and
//! reassembles results in trial order; it is equally reproducible but
//! draws different numbers than the sequential series.

use std::num::NonZeroUsize;

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    Result,
    policy::RemovalPolicy,
    result::{ResilienceReport, TrialIndex, TrialResult},
    simulator::{RemovalRatio, simulate_removal},
    topology::Topology,
};

/// SplitMix64 increment (the 64-bit golden ratio) used for per-trial seed
/// derivation.
const TRIAL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Derives the seed of trial `trial` from the run seed.
#[inline]
#[must_use]
pub fn mix_trial_seed(base_seed: u64, trial: usize) -> u64 {
    splitmix64(base_seed ^ ((trial as u64 + 1).wrapping_mul(TRIAL_SEED_SPACING)))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(TRIAL_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Runs `iterations` trials one after another, each on a fresh copy of
/// `graph`, drawing from the shared `rng`.
///
/// # Errors
/// The first failing trial aborts the series with
/// [`crate::ResilienceError::SimulationFailed`] tagged with its trial index;
/// no partial report is returned.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use rand::{SeedableRng, rngs::SmallRng};
/// use shatter_core::{DiGraph, RemovalPolicy, RemovalRatio, run_trials};
///
/// let graph = DiGraph::from_edges([("a", "b"), ("b", "c"), ("c", "a")])?;
/// let mut rng = SmallRng::seed_from_u64(0);
/// let report = run_trials(
///     &graph,
///     RemovalPolicy::Random,
///     RemovalRatio::new(0.5)?,
///     NonZeroUsize::new(3).expect("non-zero"),
///     &mut rng,
/// )?;
/// assert_eq!(report.trials().len(), 3);
/// assert_eq!(report.row_count(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.trials",
    err,
    skip(graph, rng),
    fields(
        policy = policy.as_str(),
        vertices = graph.vertex_count(),
        iterations = iterations.get(),
        strategy = "sequential",
    ),
)]
pub fn run_trials<G: Topology, R: Rng + ?Sized>(
    graph: &G,
    policy: RemovalPolicy,
    removal_ratio: RemovalRatio,
    iterations: NonZeroUsize,
    rng: &mut R,
) -> Result<ResilienceReport> {
    let mut trials = Vec::with_capacity(iterations.get());
    for trial in 0..iterations.get() {
        trials.push(run_one(graph, policy, removal_ratio, TrialIndex::new(trial), rng)?);
    }
    Ok(ResilienceReport::from_trials(trials))
}

/// Runs `iterations` trials across the rayon pool.
///
/// Trial `i` draws from `SmallRng::seed_from_u64(mix_trial_seed(seed, i))`.
/// The report is in trial order regardless of completion order.
///
/// # Errors
/// Fails with [`crate::ResilienceError::SimulationFailed`] if any trial
/// fails. When several trials fail, which failure is reported is
/// unspecified.
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
#[instrument(
    name = "core.trials",
    err,
    skip(graph),
    fields(
        policy = policy.as_str(),
        vertices = graph.vertex_count(),
        iterations = iterations.get(),
        strategy = "parallel",
    ),
)]
pub fn run_trials_parallel<G: Topology + Sync>(
    graph: &G,
    policy: RemovalPolicy,
    removal_ratio: RemovalRatio,
    iterations: NonZeroUsize,
    seed: u64,
) -> Result<ResilienceReport> {
    use rand::{SeedableRng, rngs::SmallRng};
    use rayon::prelude::*;

    let trials = (0..iterations.get())
        .into_par_iter()
        .map(|trial| {
            let mut rng = SmallRng::seed_from_u64(mix_trial_seed(seed, trial));
            run_one(graph, policy, removal_ratio, TrialIndex::new(trial), &mut rng)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ResilienceReport::from_trials(trials))
}

fn run_one<G: Topology, R: Rng + ?Sized>(
    graph: &G,
    policy: RemovalPolicy,
    removal_ratio: RemovalRatio,
    index: TrialIndex,
    rng: &mut R,
) -> Result<TrialResult> {
    let mut copy = graph.clone();
    let result = simulate_removal(&mut copy, policy, removal_ratio, rng)
        .map_err(|error| error.in_trial(index))?;
    debug!(trial = index.get(), records = result.len(), "trial completed");

    #[cfg(feature = "metrics")]
    metrics::counter!("resilience_trials_completed").increment(1);

    Ok(result.tagged(index))
}
