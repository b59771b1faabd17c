//! Graph builders shared by the integration suites.
#![allow(dead_code, reason = "each suite uses a different subset")]

use shatter_core::DiGraph;
use shatter_test_support::fixtures::{self, Edge};

pub fn graph(edges: Vec<Edge>) -> DiGraph {
    DiGraph::from_edges(edges).expect("fixture graph must build")
}

pub fn cycle(vertices: usize) -> DiGraph {
    graph(fixtures::cycle_edges(vertices))
}

pub fn path(vertices: usize) -> DiGraph {
    graph(fixtures::path_edges(vertices))
}

pub fn star(leaves: usize) -> DiGraph {
    graph(fixtures::star_edges(leaves))
}

pub fn clique_union(sizes: &[usize]) -> DiGraph {
    graph(fixtures::clique_union_edges(sizes))
}
