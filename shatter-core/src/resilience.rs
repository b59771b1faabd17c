//! Resilience analysis entry point.
//!
//! Provides the [`Resilience`] runtime that turns one input graph into a
//! targeted (max-degree) decay curve and a series of random decay curves.

use std::num::NonZeroUsize;

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{
    Result,
    builder::ExecutionStrategy,
    policy::RemovalPolicy,
    result::{ResilienceAnalysis, ResilienceReport, TrialResult},
    simulator::{RemovalRatio, simulate_removal},
    topology::Topology,
    trials::run_trials,
};

/// Configured resilience analysis.
///
/// Every call starts from the configured seed, so analysing the same graph
/// twice yields identical results, and each graph in a batch is analysed
/// independently of the ones before it.
///
/// # Examples
/// ```
/// use shatter_core::{DiGraph, ResilienceBuilder};
///
/// let graph = DiGraph::from_edges((0..10).map(|i| (i.to_string(), ((i + 1) % 10).to_string())))?;
/// let resilience = ResilienceBuilder::new().with_iterations(2).build()?;
/// let analysis = resilience.analyse(&graph)?;
/// assert_eq!(analysis.targeted.len(), 9);
/// assert_eq!(analysis.random.row_count(), 18);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Resilience {
    removal_ratio: RemovalRatio,
    iterations: NonZeroUsize,
    seed: u64,
    execution_strategy: ExecutionStrategy,
}

impl Resilience {
    pub(crate) fn new(
        removal_ratio: RemovalRatio,
        iterations: NonZeroUsize,
        seed: u64,
        execution_strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            removal_ratio,
            iterations,
            seed,
            execution_strategy,
        }
    }

    /// Returns the configured removal ratio.
    #[must_use]
    pub fn removal_ratio(&self) -> RemovalRatio {
        self.removal_ratio
    }

    /// Returns the number of random trials per graph.
    #[must_use]
    pub fn iterations(&self) -> NonZeroUsize {
        self.iterations
    }

    /// Returns the seed applied at the start of every analysed graph.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the execution strategy used for random trials.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Returns a random stream positioned at the configured seed.
    #[must_use]
    pub fn rng(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed)
    }

    /// Removes max-degree vertices from a copy of `graph`.
    ///
    /// The result is untagged: the policy is deterministic, so one run
    /// suffices.
    ///
    /// # Errors
    /// Returns [`crate::ResilienceError::SimulationFailed`] when a step fails.
    #[instrument(
        name = "core.targeted",
        err,
        skip(self, graph),
        fields(vertices = graph.vertex_count(), removal_ratio = self.removal_ratio.get()),
    )]
    pub fn targeted<G: Topology>(&self, graph: &G) -> Result<TrialResult> {
        let mut copy = graph.clone();
        let mut rng = self.rng();
        let result = simulate_removal(&mut copy, RemovalPolicy::MaxDegree, self.removal_ratio, &mut rng)?;
        info!(records = result.len(), "targeted removal completed");
        Ok(result)
    }

    /// Runs the configured number of random-removal trials on copies of
    /// `graph`.
    ///
    /// # Errors
    /// Returns [`crate::ResilienceError::SimulationFailed`] tagged with the
    /// failing trial; no partial report is produced.
    #[instrument(
        name = "core.random",
        err,
        skip(self, graph),
        fields(
            vertices = graph.vertex_count(),
            removal_ratio = self.removal_ratio.get(),
            iterations = self.iterations.get(),
            seed = self.seed,
            strategy = self.execution_strategy.as_str(),
        ),
    )]
    pub fn random<G: Topology + Sync>(&self, graph: &G) -> Result<ResilienceReport> {
        let report = match self.execution_strategy {
            ExecutionStrategy::Sequential => {
                let mut rng = self.rng();
                run_trials(
                    graph,
                    RemovalPolicy::Random,
                    self.removal_ratio,
                    self.iterations,
                    &mut rng,
                )?
            }
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Parallel => crate::trials::run_trials_parallel(
                graph,
                RemovalPolicy::Random,
                self.removal_ratio,
                self.iterations,
                self.seed,
            )?,
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => {
                return Err(crate::ResilienceError::BackendUnavailable {
                    requested: ExecutionStrategy::Parallel,
                });
            }
        };
        info!(rows = report.row_count(), "random removal completed");
        Ok(report)
    }

    /// Computes both the targeted curve and the random series for `graph`.
    ///
    /// # Errors
    /// Propagates the first failure from either analysis.
    pub fn analyse<G: Topology + Sync>(&self, graph: &G) -> Result<ResilienceAnalysis> {
        Ok(ResilienceAnalysis {
            targeted: self.targeted(graph)?,
            random: self.random(graph)?,
        })
    }
}
