//! Random graph models used as baselines for crawled topologies.
//!
//! Both generators label vertex `i` with the decimal string `i` and draw
//! every random choice from the caller's stream, so a seeded stream yields
//! the same graph on every run.

use rand::{Rng, seq::index};
use tracing::{debug, instrument};

use crate::{
    error::{GraphError, SyntheticError},
    topology::{DiGraph, VertexId},
};

/// Directed Erdős–Rényi `G(n, m)` graph.
///
/// Picks `edges` distinct ordered pairs of distinct vertices uniformly at
/// random. Requests beyond `n * (n - 1)` are capped at the complete graph.
///
/// # Errors
/// Returns [`SyntheticError::Graph`] when `nodes` exceeds the graph's slot
/// capacity.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use shatter_core::{Topology, erdos_renyi};
///
/// let mut rng = SmallRng::seed_from_u64(0);
/// let graph = erdos_renyi(50, 120, &mut rng)?;
/// assert_eq!(graph.vertex_count(), 50);
/// assert_eq!(graph.edge_count(), 120);
/// # Ok::<(), shatter_core::SyntheticError>(())
/// ```
#[instrument(name = "core.erdos_renyi", err, skip(rng))]
pub fn erdos_renyi<R: Rng + ?Sized>(
    nodes: usize,
    edges: usize,
    rng: &mut R,
) -> Result<DiGraph, SyntheticError> {
    let (mut graph, vertices) = with_vertices(nodes)?;
    let pairs = nodes.saturating_mul(nodes.saturating_sub(1));
    let amount = edges.min(pairs);

    for pair in index::sample(rng, pairs, amount).into_iter() {
        let (source, target) = decode_pair(pair, nodes);
        graph.add_edge(vertices[source], vertices[target])?;
    }

    debug!(edges = graph.edge_count(), "generated erdos-renyi graph");
    Ok(graph)
}

/// Directed Barabási–Albert preferential-attachment graph.
///
/// Vertex `i > 0` links to `min(out_edges, i)` distinct earlier vertices,
/// each chosen with probability proportional to `in_degree^power + 1`.
///
/// # Errors
/// Returns [`SyntheticError::InvalidPower`] when `power` is negative or not
/// finite, and [`SyntheticError::Graph`] when `nodes` exceeds the graph's
/// slot capacity.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use shatter_core::{Topology, barabasi_albert};
///
/// let mut rng = SmallRng::seed_from_u64(0);
/// let graph = barabasi_albert(30, 2, 2.0, &mut rng)?;
/// assert_eq!(graph.vertex_count(), 30);
/// // Vertex 1 can only link to vertex 0; every later vertex adds two edges.
/// assert_eq!(graph.edge_count(), 1 + 28 * 2);
/// # Ok::<(), shatter_core::SyntheticError>(())
/// ```
#[instrument(name = "core.barabasi_albert", err, skip(rng))]
pub fn barabasi_albert<R: Rng + ?Sized>(
    nodes: usize,
    out_edges: usize,
    power: f64,
    rng: &mut R,
) -> Result<DiGraph, SyntheticError> {
    if !power.is_finite() || power < 0.0 {
        return Err(SyntheticError::InvalidPower { got: power });
    }
    let (mut graph, vertices) = with_vertices(nodes)?;
    let mut in_degrees = vec![0_u32; nodes];

    for newcomer in 1..nodes {
        let amount = out_edges.min(newcomer);
        if amount == 0 {
            continue;
        }
        let weights = &in_degrees;
        let targets = index::sample_weighted(
            rng,
            newcomer,
            |candidate| f64::from(weights[candidate]).powf(power) + 1.0,
            amount,
        )?;
        for target in targets.into_iter() {
            graph.add_edge(vertices[newcomer], vertices[target])?;
            in_degrees[target] = in_degrees[target].saturating_add(1);
        }
    }

    debug!(edges = graph.edge_count(), "generated barabasi-albert graph");
    Ok(graph)
}

fn with_vertices(nodes: usize) -> Result<(DiGraph, Vec<VertexId>), GraphError> {
    let mut graph = DiGraph::new();
    let vertices = (0..nodes)
        .map(|index| graph.add_vertex(index.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((graph, vertices))
}

/// Maps `pair` in `[0, n * (n - 1))` to an ordered pair without loops.
fn decode_pair(pair: usize, nodes: usize) -> (usize, usize) {
    let others = nodes - 1;
    let source = pair / others;
    let offset = pair % others;
    let target = if offset >= source { offset + 1 } else { offset };
    (source, target)
}
