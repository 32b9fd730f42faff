//! Minimum spanning trees (forests, for disconnected graphs)

use super::{Edge, Graph};
use crate::error::Result;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Edges chosen by a spanning-tree algorithm and their total weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanningTree {
    pub edges: Vec<Edge>,
    pub total_weight: u64,
}

impl SpanningTree {
    fn from_edges(edges: Vec<Edge>) -> Self {
        let total_weight = edges.iter().map(|e| u64::from(e.weight)).sum();
        Self {
            edges,
            total_weight,
        }
    }
}

/// Union-find with path compression and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`; false if they already were one
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Cheapest edges first, skipping those that would close a cycle
///
/// Arcs of a directed graph are treated as undirected edges. On a
/// disconnected graph the result is a minimum spanning forest.
pub fn kruskal(graph: &Graph) -> SpanningTree {
    let mut edges = graph.edges();
    edges.sort_by_key(|e| e.weight);

    let mut sets = DisjointSet::new(graph.node_count());
    let limit = graph.node_count().saturating_sub(1);
    let mut chosen = Vec::with_capacity(limit);
    for edge in edges {
        if chosen.len() == limit {
            break;
        }
        if sets.union(edge.from, edge.to) {
            chosen.push(edge);
        }
    }
    SpanningTree::from_edges(chosen)
}

/// Grow a tree from `start` by repeatedly taking the cheapest edge leaving it
///
/// Only the component holding `start` is spanned.
pub fn prim(graph: &Graph, start: usize) -> Result<SpanningTree> {
    graph.check_node(start)?;
    let undirected;
    let graph = if graph.is_directed() {
        undirected = graph.to_undirected();
        &undirected
    } else {
        graph
    };

    let mut in_tree = vec![false; graph.node_count()];
    let mut chosen = Vec::new();
    let mut heap = BinaryHeap::new();

    in_tree[start] = true;
    for &(to, weight) in graph.neighbors(start) {
        heap.push(Reverse((weight, start, to)));
    }

    while let Some(Reverse((weight, from, to))) = heap.pop() {
        if in_tree[to] {
            continue;
        }
        in_tree[to] = true;
        chosen.push(Edge { from, to, weight });
        for &(next, next_weight) in graph.neighbors(to) {
            if !in_tree[next] {
                heap.push(Reverse((next_weight, to, next)));
            }
        }
    }
    Ok(SpanningTree::from_edges(chosen))
}
