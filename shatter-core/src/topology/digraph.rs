//! Adjacency-list directed graph with stable vertex handles.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::debug;

use crate::error::GraphError;

use super::{Topology, VertexId, union_find::UnionFind};

/// A simple directed graph: no self-loops and at most one edge per ordered
/// vertex pair.
///
/// Vertices live in slots that are allocated in insertion order and never
/// reused. Deleting a vertex tombstones its slot, so enumeration order (and
/// therefore [`Topology::vertex_at`]) always follows the order in which the
/// surviving vertices were first seen.
///
/// # Examples
/// ```
/// use shatter_core::{DiGraph, Topology};
///
/// let graph = DiGraph::from_edges([("peer-a", "peer-b"), ("peer-a", "peer-b"), ("peer-c", "peer-c")])?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edge_count(), 1);
/// # Ok::<(), shatter_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiGraph {
    labels: Vec<Arc<str>>,
    successors: Vec<Vec<u32>>,
    predecessors: Vec<Vec<u32>>,
    alive: Vec<bool>,
    // Live slots, strictly increasing.
    order: Vec<u32>,
    edge_count: usize,
}

impl DiGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a simplified graph from `(source, target)` label pairs.
    ///
    /// Vertices are numbered in order of first appearance. Self-loops are
    /// kept as vertices but dropped as edges, and repeated pairs collapse to
    /// one edge.
    ///
    /// # Errors
    /// Returns [`GraphError::CapacityExceeded`] if more than `u32::MAX`
    /// distinct labels are supplied.
    pub fn from_edges<I, L>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (L, L)>,
        L: AsRef<str>,
    {
        let mut graph = Self::new();
        let mut interned: HashMap<Arc<str>, VertexId> = HashMap::new();
        let mut seen: HashSet<(u32, u32)> = HashSet::new();

        for (source, target) in edges {
            let source = graph.intern(&mut interned, source.as_ref())?;
            let target = graph.intern(&mut interned, target.as_ref())?;
            if source == target || !seen.insert((source.get(), target.get())) {
                continue;
            }
            graph.link(source, target);
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built simplified graph"
        );
        Ok(graph)
    }

    fn intern(
        &mut self,
        interned: &mut HashMap<Arc<str>, VertexId>,
        label: &str,
    ) -> Result<VertexId, GraphError> {
        if let Some(vertex) = interned.get(label) {
            return Ok(*vertex);
        }
        let label: Arc<str> = Arc::from(label);
        let vertex = self.push_slot(Arc::clone(&label))?;
        interned.insert(label, vertex);
        Ok(vertex)
    }

    /// Appends a vertex carrying `label` and returns its handle.
    ///
    /// Labels are not deduplicated here; [`DiGraph::from_edges`] interns them.
    ///
    /// # Errors
    /// Returns [`GraphError::CapacityExceeded`] once `u32::MAX` slots exist.
    pub fn add_vertex(&mut self, label: impl Into<Arc<str>>) -> Result<VertexId, GraphError> {
        self.push_slot(label.into())
    }

    fn push_slot(&mut self, label: Arc<str>) -> Result<VertexId, GraphError> {
        let slot = u32::try_from(self.labels.len()).map_err(|_| GraphError::CapacityExceeded {
            limit: u32::MAX as usize,
        })?;
        self.labels.push(label);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        self.alive.push(true);
        self.order.push(slot);
        Ok(VertexId::new(slot))
    }

    /// Inserts the edge `source -> target`.
    ///
    /// Returns `false` without modifying the graph when the edge is a
    /// self-loop or already present.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidIndex`] when either endpoint is not live.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<bool, GraphError> {
        self.ensure_live(source)?;
        self.ensure_live(target)?;
        if source == target || self.successors[source.slot()].contains(&target.get()) {
            return Ok(false);
        }
        self.link(source, target);
        Ok(true)
    }

    fn link(&mut self, source: VertexId, target: VertexId) {
        self.successors[source.slot()].push(target.get());
        self.predecessors[target.slot()].push(source.get());
        self.edge_count += 1;
    }

    /// Returns the number of edges between live vertices.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether `vertex` is a live vertex of this graph.
    #[must_use]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.alive.get(vertex.slot()).copied().unwrap_or(false)
    }

    /// Returns the label of a live vertex.
    #[must_use]
    pub fn label(&self, vertex: VertexId) -> Option<&str> {
        self.contains(vertex)
            .then(|| self.labels.get(vertex.slot()).map(|label| &**label))
            .flatten()
    }

    /// Returns the out-degree of `vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidIndex`] when `vertex` is not live.
    pub fn out_degree(&self, vertex: VertexId) -> Result<usize, GraphError> {
        self.ensure_live(vertex)?;
        Ok(self.successors[vertex.slot()].len())
    }

    /// Returns the in-degree of `vertex`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidIndex`] when `vertex` is not live.
    pub fn in_degree(&self, vertex: VertexId) -> Result<usize, GraphError> {
        self.ensure_live(vertex)?;
        Ok(self.predecessors[vertex.slot()].len())
    }

    /// Deletes every vertex with no outgoing edges, all at once.
    ///
    /// Crawlers only learn the neighbours of peers they could reach, so
    /// out-degree zero marks a peer that was seen but never crawled. Vertices
    /// that become sinks because of this deletion are kept.
    ///
    /// Returns the number of vertices removed.
    pub fn remove_sinks(&mut self) -> usize {
        let sinks: Vec<VertexId> = self
            .vertices()
            .filter(|vertex| self.successors[vertex.slot()].is_empty())
            .collect();
        for vertex in &sinks {
            self.detach(*vertex);
        }
        debug!(
            removed = sinks.len(),
            remaining = self.vertex_count(),
            "removed uncrawlable sink vertices"
        );
        sinks.len()
    }

    fn ensure_live(&self, vertex: VertexId) -> Result<(), GraphError> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(GraphError::InvalidIndex { vertex })
        }
    }

    fn detach(&mut self, vertex: VertexId) {
        let slot = vertex.slot();
        let raw = vertex.get();
        let successors = std::mem::take(&mut self.successors[slot]);
        let predecessors = std::mem::take(&mut self.predecessors[slot]);

        for target in &successors {
            self.predecessors[*target as usize].retain(|source| *source != raw);
        }
        for source in &predecessors {
            self.successors[*source as usize].retain(|target| *target != raw);
        }
        self.edge_count -= successors.len() + predecessors.len();
        self.alive[slot] = false;
        if let Ok(position) = self.order.binary_search(&raw) {
            self.order.remove(position);
        }
    }
}

impl Topology for DiGraph {
    fn vertex_count(&self) -> usize {
        self.order.len()
    }

    fn vertex_at(&self, position: usize) -> Option<VertexId> {
        self.order.get(position).copied().map(VertexId::new)
    }

    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.order.iter().copied().map(VertexId::new)
    }

    fn degree(&self, vertex: VertexId) -> Result<usize, GraphError> {
        self.ensure_live(vertex)?;
        let slot = vertex.slot();
        Ok(self.successors[slot].len() + self.predecessors[slot].len())
    }

    fn delete_vertex(&mut self, vertex: VertexId) -> Result<(), GraphError> {
        self.ensure_live(vertex)?;
        self.detach(vertex);
        Ok(())
    }

    fn weak_component_sizes(&self) -> Vec<usize> {
        let mut sets = UnionFind::new(self.labels.len());
        for source in &self.order {
            for target in &self.successors[*source as usize] {
                sets.union(*source as usize, *target as usize);
            }
        }

        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for slot in &self.order {
            *sizes.entry(sets.find(*slot as usize)).or_insert(0) += 1;
        }
        let mut sizes: Vec<usize> = sizes.into_values().collect();
        sizes.sort_unstable_by(|left, right| right.cmp(left));
        sizes
    }
}
