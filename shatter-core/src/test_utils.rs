//! Shared test utilities for `shatter-core`.

use proptest::test_runner::Config as ProptestConfig;
use shatter_test_support::{
    ci::property_test_profile::ProptestRunProfile,
    fixtures::{complete_edges, cycle_edges},
};

use crate::{
    error::GraphError,
    topology::{DiGraph, Topology, VertexId},
};

/// Builds a proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestRunProfile::load(default_cases, false).config()
}

/// Directed graph with an edge in each direction between every vertex pair.
pub(crate) fn complete_graph(vertices: usize) -> DiGraph {
    DiGraph::from_edges(complete_edges(vertices)).expect("complete graph must build")
}

/// Directed cycle `0 -> 1 -> ... -> n-1 -> 0`.
pub(crate) fn cycle_graph(vertices: usize) -> DiGraph {
    DiGraph::from_edges(cycle_edges(vertices)).expect("cycle graph must build")
}

/// Edgeless [`Topology`] whose deletions start failing after a budget.
///
/// Each clone carries its own budget, so every trial fails at the same step.
#[derive(Clone, Debug)]
pub(crate) struct FailingTopology {
    live: Vec<u32>,
    deletions_left: usize,
}

impl FailingTopology {
    pub(crate) fn new(vertices: u32, successful_deletions: usize) -> Self {
        Self {
            live: (0..vertices).collect(),
            deletions_left: successful_deletions,
        }
    }
}

impl Topology for FailingTopology {
    fn vertex_count(&self) -> usize {
        self.live.len()
    }

    fn vertex_at(&self, position: usize) -> Option<VertexId> {
        self.live.get(position).copied().map(VertexId::new)
    }

    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.live.iter().copied().map(VertexId::new)
    }

    fn degree(&self, vertex: VertexId) -> Result<usize, GraphError> {
        if self.live.contains(&vertex.get()) {
            Ok(0)
        } else {
            Err(GraphError::InvalidIndex { vertex })
        }
    }

    fn delete_vertex(&mut self, vertex: VertexId) -> Result<(), GraphError> {
        let position = self
            .live
            .iter()
            .position(|slot| *slot == vertex.get())
            .ok_or(GraphError::InvalidIndex { vertex })?;
        if self.deletions_left == 0 {
            return Err(GraphError::InvalidIndex { vertex });
        }
        self.deletions_left -= 1;
        self.live.remove(position);
        Ok(())
    }

    fn weak_component_sizes(&self) -> Vec<usize> {
        vec![1; self.live.len()]
    }
}
