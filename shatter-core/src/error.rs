//! Error types for the shatter core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use rand::distributions::WeightedError;
use thiserror::Error;

use crate::{builder::ExecutionStrategy, result::TrialIndex, topology::VertexId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::Topology`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The handle does not refer to a live vertex of this graph.
    #[error("vertex {vertex} is not present in the graph")]
    InvalidIndex {
        /// The rejected vertex handle.
        vertex: VertexId,
    },
    /// The graph cannot address more vertices.
    #[error("graph cannot hold more than {limit} vertices")]
    CapacityExceeded {
        /// Maximum number of vertex slots supported by the graph.
        limit: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The handle does not refer to a live vertex of this graph.
        InvalidIndex => InvalidIndex { .. } => "GRAPH_INVALID_INDEX",
        /// The graph cannot address more vertices.
        CapacityExceeded => CapacityExceeded { .. } => "GRAPH_CAPACITY_EXCEEDED",
    }
}

/// An error produced while generating a synthetic comparison graph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SyntheticError {
    /// The preferential-attachment exponent must be finite and non-negative.
    #[error("attachment power must be finite and non-negative (got {got})")]
    InvalidPower {
        /// The rejected exponent.
        got: f64,
    },
    /// Weighted sampling rejected the attachment weights.
    #[error("attachment weights were rejected: {0}")]
    Weights(#[from] WeightedError),
    /// The graph under construction rejected a vertex or edge.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`SyntheticError`] variants.
    enum SyntheticErrorCode for SyntheticError {
        /// The preferential-attachment exponent must be finite and non-negative.
        InvalidPower => InvalidPower { .. } => "SYNTHETIC_INVALID_POWER",
        /// Weighted sampling rejected the attachment weights.
        Weights => Weights(..) => "SYNTHETIC_WEIGHTS_REJECTED",
        /// The graph under construction rejected a vertex or edge.
        GraphFailure => Graph(..) => "SYNTHETIC_GRAPH_FAILURE",
    }
}

/// A failure raised while executing a single removal step.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RemovalError {
    /// A removal policy was asked to pick a vertex from an empty graph.
    #[error("cannot select a vertex from an empty graph")]
    EmptyGraph,
    /// The graph rejected a query or mutation.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`RemovalError`] variants.
    enum RemovalErrorCode for RemovalError {
        /// A removal policy was asked to pick a vertex from an empty graph.
        EmptyGraph => EmptyGraph => "REMOVAL_EMPTY_GRAPH",
        /// The graph rejected a query or mutation.
        GraphFailure => Graph(..) => "REMOVAL_GRAPH_FAILURE",
    }
}

impl RemovalError {
    /// Retrieve the inner [`GraphErrorCode`] when the graph rejected the step.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            Self::EmptyGraph => None,
        }
    }
}

/// Error type produced when configuring or running a resilience analysis.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ResilienceError {
    /// The removal ratio must be finite and lie within `[0, 1)`.
    #[error("removal_ratio must lie within [0, 1) (got {got})")]
    InvalidRemovalRatio {
        /// The rejected ratio.
        got: f64,
    },
    /// At least one random trial must be requested.
    #[error("iterations must be at least 1 (got {got})")]
    InvalidIterations {
        /// The rejected iteration count.
        got: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// A removal step failed; the whole trial (and run) is abandoned.
    #[error("removal step {step} failed in {}: {error}", describe_trial(.trial))]
    SimulationFailed {
        /// Zero-based removal step that failed.
        step: usize,
        /// Trial that was executing, if the run was part of a repeated series.
        trial: Option<TrialIndex>,
        /// Underlying failure.
        #[source]
        error: RemovalError,
    },
}

fn describe_trial(trial: &Option<TrialIndex>) -> String {
    match trial {
        Some(index) => format!("trial {}", index.get()),
        None => "an untagged run".to_owned(),
    }
}

define_error_codes! {
    /// Stable codes describing [`ResilienceError`] variants.
    enum ResilienceErrorCode for ResilienceError {
        /// The removal ratio must be finite and lie within `[0, 1)`.
        InvalidRemovalRatio => InvalidRemovalRatio { .. } => "RESILIENCE_INVALID_REMOVAL_RATIO",
        /// At least one random trial must be requested.
        InvalidIterations => InvalidIterations { .. } => "RESILIENCE_INVALID_ITERATIONS",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "RESILIENCE_BACKEND_UNAVAILABLE",
        /// A removal step failed.
        SimulationFailed => SimulationFailed { .. } => "RESILIENCE_SIMULATION_FAILED",
    }
}

impl ResilienceError {
    /// Retrieve the inner [`RemovalErrorCode`] when a removal step failed.
    #[must_use]
    pub const fn removal_code(&self) -> Option<RemovalErrorCode> {
        match self {
            Self::SimulationFailed { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Attach a trial index to a step failure that was raised without one.
    #[must_use]
    pub(crate) fn in_trial(self, index: TrialIndex) -> Self {
        match self {
            Self::SimulationFailed { step, error, .. } => Self::SimulationFailed {
                step,
                trial: Some(index),
                error,
            },
            other => other,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ResilienceError>;
