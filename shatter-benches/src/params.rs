//! Benchmark parameter types.

use std::fmt;

use shatter_core::RemovalPolicy;

/// Parameters for a single removal run.
#[derive(Clone, Copy, Debug)]
pub struct RemovalBenchParams {
    /// Vertices in the input graph.
    pub vertex_count: usize,
    /// Policy choosing the next vertex.
    pub policy: RemovalPolicy,
}

impl fmt::Display for RemovalBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},policy={}", self.vertex_count, self.policy.as_str())
    }
}

/// Parameters for a repeated-trial run.
#[derive(Clone, Copy, Debug)]
pub struct TrialBenchParams {
    /// Vertices in the input graph.
    pub vertex_count: usize,
    /// Number of random trials.
    pub iterations: usize,
}

impl fmt::Display for TrialBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},trials={}", self.vertex_count, self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_compact() {
        let removal = RemovalBenchParams {
            vertex_count: 500,
            policy: RemovalPolicy::MaxDegree,
        };
        assert_eq!(removal.to_string(), "n=500,policy=max_degree");
        let trials = TrialBenchParams {
            vertex_count: 200,
            iterations: 8,
        };
        assert_eq!(trials.to_string(), "n=200,trials=8");
    }
}
