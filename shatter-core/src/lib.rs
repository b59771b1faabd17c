//! Shatter core library.
//!
//! Simulates progressive vertex removal on directed overlay graphs and
//! records how the largest weakly connected component decays.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod policy;
mod resilience;
mod result;
mod simulator;
mod synthetic;
#[cfg(test)]
mod test_utils;
mod topology;
mod trials;

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub use crate::trials::run_trials_parallel;
pub use crate::{
    builder::{ExecutionStrategy, ResilienceBuilder},
    error::{
        GraphError, GraphErrorCode, RemovalError, RemovalErrorCode, ResilienceError,
        ResilienceErrorCode, Result, SyntheticError, SyntheticErrorCode,
    },
    policy::RemovalPolicy,
    resilience::Resilience,
    result::{
        RemovalRecord, ReportRow, ResilienceAnalysis, ResilienceReport, TrialIndex, TrialResult,
    },
    simulator::{RemovalRatio, largest_component_share, simulate_removal},
    synthetic::{barabasi_albert, erdos_renyi},
    topology::{DiGraph, Topology, VertexId},
    trials::{mix_trial_seed, run_trials},
};
