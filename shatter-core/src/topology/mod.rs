//! Graph abstractions consumed by the removal simulator.
//!
//! The simulator never touches a concrete graph type. It drives any
//! [`Topology`]: a mutable directed graph that can report its size, the
//! combined degree of a vertex, the sizes of its weakly connected components,
//! and delete a vertex. [`DiGraph`] is the in-memory implementation shipped
//! with the crate.

mod digraph;
mod union_find;

use std::fmt;

use crate::error::GraphError;

pub use self::digraph::DiGraph;

/// Stable handle to a vertex.
///
/// Handles are allocated once per vertex and never reused, so deleting a
/// vertex does not invalidate the handles of the vertices that remain. A
/// [`Clone`] of a graph keeps the same handles, which lets callers refer to
/// "the same peer" across independent copies.
///
/// # Examples
/// ```
/// use shatter_core::{DiGraph, Topology};
///
/// let mut graph = DiGraph::from_edges([("a", "b"), ("b", "c")])?;
/// let first = graph.vertex_at(0).expect("graph has vertices");
/// let last = graph.vertex_at(2).expect("graph has three vertices");
/// graph.delete_vertex(first)?;
/// assert_eq!(graph.vertex_at(1), Some(last));
/// # Ok::<(), shatter_core::GraphError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a handle from a raw slot number.
    ///
    /// Only meaningful for the graph that allocated the slot; foreign handles
    /// are rejected by [`Topology::delete_vertex`] and [`Topology::degree`]
    /// unless they happen to name a live slot.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(slot: u32) -> Self { Self(slot) }

    /// Returns the raw slot number backing the handle.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }

    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The graph capability required by removal policies and the simulator.
///
/// Vertices have a *position* in `[0, vertex_count)` that follows the
/// graph's enumeration order. Positions shift down when an earlier vertex is
/// deleted; [`VertexId`] handles do not. [`Clone`] must produce an
/// independent deep copy: mutating the clone never affects the original.
///
/// # Examples
/// ```
/// use shatter_core::{DiGraph, Topology};
///
/// let mut graph = DiGraph::from_edges([("a", "b"), ("c", "d")])?;
/// assert_eq!(graph.weak_component_sizes(), vec![2, 2]);
///
/// let b = graph.vertex_at(1).expect("b exists");
/// assert_eq!(graph.degree(b)?, 1);
/// graph.delete_vertex(b)?;
/// assert_eq!(graph.weak_component_sizes(), vec![2, 1]);
/// # Ok::<(), shatter_core::GraphError>(())
/// ```
pub trait Topology: Clone {
    /// Returns the number of live vertices.
    fn vertex_count(&self) -> usize;

    /// Returns whether the graph has no vertices left.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Returns the vertex currently at `position` in enumeration order.
    fn vertex_at(&self, position: usize) -> Option<VertexId>;

    /// Enumerates live vertices in positional order.
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_;

    /// Returns the combined in- and out-degree of `vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidIndex`] when `vertex` is not live.
    fn degree(&self, vertex: VertexId) -> Result<usize, GraphError>;

    /// Returns the combined degree of every live vertex in positional order.
    ///
    /// # Errors
    /// Propagates any [`GraphError`] raised by [`Topology::degree`].
    fn degrees(&self) -> Result<Vec<(VertexId, usize)>, GraphError> {
        self.vertices()
            .map(|vertex| self.degree(vertex).map(|degree| (vertex, degree)))
            .collect()
    }

    /// Deletes `vertex` and every edge touching it.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidIndex`] when `vertex` is not live.
    fn delete_vertex(&mut self, vertex: VertexId) -> Result<(), GraphError>;

    /// Returns the sizes of the weakly connected components, largest first.
    fn weak_component_sizes(&self) -> Vec<usize>;

    /// Returns the size of the largest weakly connected component, or zero
    /// for an empty graph.
    fn largest_weak_component(&self) -> usize {
        self.weak_component_sizes().first().copied().unwrap_or(0)
    }
}
