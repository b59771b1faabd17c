//! Builder utilities for configuring resilience runs.
//!
//! Exposes the execution strategy selection surface and the validation
//! performed before constructing [`Resilience`] instances.

use std::num::NonZeroUsize;

use crate::{
    Result, error::ResilienceError, resilience::Resilience, simulator::RemovalRatio,
};

const DEFAULT_ITERATIONS: usize = 10;
const DEFAULT_SEED: u64 = 0;

/// Indicates how repeated random trials are scheduled.
///
/// Both strategies are deterministic for a fixed seed. `Sequential` threads
/// one random stream through the trials in order; `Parallel` gives every
/// trial its own stream derived from the seed and needs the `parallel`
/// feature.
///
/// # Examples
/// ```
/// use shatter_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::default();
/// assert_eq!(strategy, ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run trials one after another on the calling thread.
    #[default]
    Sequential,
    /// Spread trials across the rayon thread pool.
    Parallel,
}

impl ExecutionStrategy {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }
}

/// Configures and constructs [`Resilience`] instances.
///
/// # Examples
/// ```
/// use shatter_core::{ExecutionStrategy, ResilienceBuilder};
///
/// let resilience = ResilienceBuilder::new()
///     .with_removal_ratio(0.5)
///     .with_iterations(4)
///     .with_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(resilience.removal_ratio().get(), 0.5);
/// assert_eq!(resilience.iterations().get(), 4);
/// assert_eq!(resilience.seed(), 7);
/// assert_eq!(resilience.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct ResilienceBuilder {
    removal_ratio: f64,
    iterations: usize,
    seed: u64,
    execution_strategy: ExecutionStrategy,
}

impl Default for ResilienceBuilder {
    fn default() -> Self {
        Self {
            removal_ratio: RemovalRatio::DEFAULT.get(),
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            execution_strategy: ExecutionStrategy::Sequential,
        }
    }
}

impl ResilienceBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use shatter_core::ResilienceBuilder;
    ///
    /// let builder = ResilienceBuilder::new();
    /// assert_eq!(builder.removal_ratio(), 0.9);
    /// assert_eq!(builder.iterations(), 10);
    /// assert_eq!(builder.seed(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the fraction of vertices removed per run.
    #[must_use]
    pub fn with_removal_ratio(mut self, ratio: f64) -> Self {
        self.removal_ratio = ratio;
        self
    }

    /// Returns the configured removal ratio.
    #[must_use]
    pub fn removal_ratio(&self) -> f64 {
        self.removal_ratio
    }

    /// Overrides the number of random trials.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns the configured number of random trials.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Overrides the seed applied at the start of every analysed graph.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the execution strategy for repeated trials.
    ///
    /// # Examples
    /// ```
    /// use shatter_core::{ExecutionStrategy, ResilienceBuilder};
    ///
    /// let builder = ResilienceBuilder::new().with_execution_strategy(ExecutionStrategy::Parallel);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Parallel);
    /// ```
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`Resilience`] instance.
    ///
    /// # Errors
    /// Returns [`ResilienceError::InvalidRemovalRatio`] for ratios outside
    /// `[0, 1)`, [`ResilienceError::InvalidIterations`] for zero iterations,
    /// and [`ResilienceError::BackendUnavailable`] when the parallel strategy
    /// is requested without the `parallel` feature.
    pub fn build(self) -> Result<Resilience> {
        let removal_ratio = RemovalRatio::new(self.removal_ratio)?;
        let iterations =
            NonZeroUsize::new(self.iterations).ok_or(ResilienceError::InvalidIterations {
                got: self.iterations,
            })?;

        #[cfg(not(feature = "parallel"))]
        if self.execution_strategy == ExecutionStrategy::Parallel {
            return Err(ResilienceError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            });
        }

        Ok(Resilience::new(
            removal_ratio,
            iterations,
            self.seed,
            self.execution_strategy,
        ))
    }
}
