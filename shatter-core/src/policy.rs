//! Vertex selection policies for removal runs.

use rand::Rng;

use crate::{
    error::RemovalError,
    topology::{Topology, VertexId},
};

/// Chooses the next vertex to delete from the current graph.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use shatter_core::{DiGraph, RemovalPolicy, Topology};
///
/// // "hub" touches every other vertex.
/// let graph = DiGraph::from_edges([("hub", "a"), ("b", "hub"), ("hub", "c")])?;
/// let mut rng = SmallRng::seed_from_u64(0);
/// let selected = RemovalPolicy::MaxDegree.select(&graph, &mut rng)?;
/// assert_eq!(graph.label(selected), Some("hub"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Pick a position uniformly in `[0, vertex_count)`.
    Random,
    /// Pick a vertex whose combined in/out degree is maximal.
    ///
    /// Ties resolve to the tied vertex that comes first in enumeration
    /// order.
    MaxDegree,
}

impl RemovalPolicy {
    /// Returns a short label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::MaxDegree => "max_degree",
        }
    }

    /// Selects the next vertex to delete.
    ///
    /// `rng` is only consumed by [`RemovalPolicy::Random`], one draw per call.
    ///
    /// # Errors
    /// Returns [`RemovalError::EmptyGraph`] when `graph` has no vertices and
    /// [`RemovalError::Graph`] if a degree query fails.
    pub fn select<G: Topology, R: Rng + ?Sized>(
        self,
        graph: &G,
        rng: &mut R,
    ) -> Result<VertexId, RemovalError> {
        match self {
            Self::Random => select_random(graph, rng),
            Self::MaxDegree => select_max_degree(graph),
        }
    }
}

fn select_random<G: Topology, R: Rng + ?Sized>(
    graph: &G,
    rng: &mut R,
) -> Result<VertexId, RemovalError> {
    let count = graph.vertex_count();
    if count == 0 {
        return Err(RemovalError::EmptyGraph);
    }
    let position = rng.gen_range(0..count);
    graph.vertex_at(position).ok_or(RemovalError::EmptyGraph)
}

fn select_max_degree<G: Topology>(graph: &G) -> Result<VertexId, RemovalError> {
    let mut best: Option<(VertexId, usize)> = None;
    for (vertex, degree) in graph.degrees()? {
        // Strictly greater keeps the earliest of several tied vertices.
        if best.is_none_or(|(_, max)| degree > max) {
            best = Some((vertex, degree));
        }
    }
    best.map(|(vertex, _)| vertex).ok_or(RemovalError::EmptyGraph)
}
