//! Adjacency-list graphs, synthetic generators and the classic algorithms
//! run on them

pub mod generators;
pub mod mst;
pub mod shortest_path;
pub mod traversal;

pub use generators::GraphType;
pub use mst::{kruskal, prim, SpanningTree};
pub use shortest_path::{dijkstra, floyd_warshall, DistanceMatrix};
pub use traversal::{bfs, dfs};

use crate::error::{Error, Failure, Result};
use crate::harness::Algorithm;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Inclusive range weights are drawn from
pub const WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// One edge, or one arc of a directed graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
}

/// Directed or undirected graph over nodes `0..node_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    adjacency: Vec<Vec<(usize, u32)>>,
    edge_count: usize,
}

impl Graph {
    pub fn new(node_count: usize, directed: bool) -> Self {
        Self {
            directed,
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Edges of an undirected graph count once
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add an edge with weight 1
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.add_weighted_edge(from, to, 1);
    }

    /// Add an edge; undirected graphs store it in both adjacency lists
    pub fn add_weighted_edge(&mut self, from: usize, to: usize, weight: u32) {
        self.adjacency[from].push((to, weight));
        if !self.directed && from != to {
            self.adjacency[to].push((from, weight));
        }
        self.edge_count += 1;
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|list| list.iter().any(|(n, _)| *n == to))
    }

    /// Outgoing neighbours with their weights
    pub fn neighbors(&self, node: usize) -> &[(usize, u32)] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every edge once; undirected edges are reported with `from <= to`
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (from, list) in self.adjacency.iter().enumerate() {
            for &(to, weight) in list {
                if self.directed || from <= to {
                    edges.push(Edge { from, to, weight });
                }
            }
        }
        edges
    }

    /// Same edges without direction
    pub fn to_undirected(&self) -> Graph {
        if !self.directed {
            return self.clone();
        }
        let mut graph = Graph::new(self.node_count(), false);
        for edge in self.edges() {
            if !graph.has_edge(edge.from, edge.to) {
                graph.add_weighted_edge(edge.from, edge.to, edge.weight);
            }
        }
        graph
    }

    /// Copy with a random weight from [`WEIGHT_RANGE`] on every edge
    ///
    /// Both directions of an undirected edge get the same weight.
    pub fn with_random_weights<R: Rng + ?Sized>(&self, rng: &mut R) -> Graph {
        let mut graph = Graph::new(self.node_count(), self.directed);
        for edge in self.edges() {
            graph.add_weighted_edge(edge.from, edge.to, rng.gen_range(WEIGHT_RANGE));
        }
        graph
    }

    pub(crate) fn check_node(&self, node: usize) -> Result<()> {
        if node < self.node_count() {
            Ok(())
        } else {
            Err(Error::NodeOutOfRange {
                node,
                node_count: self.node_count(),
            })
        }
    }

    /// Connected components, ignoring edge direction, largest first
    pub fn components(&self) -> Vec<Vec<usize>> {
        let undirected = self.to_undirected();
        let mut seen = vec![false; self.node_count()];
        let mut components = Vec::new();

        for start in 0..self.node_count() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                for &(next, _) in undirected.neighbors(node) {
                    if !seen[next] {
                        seen[next] = true;
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        components
    }

    /// Nodes of the largest component (ties go to the one holding the lowest node)
    pub fn largest_component(&self) -> Vec<usize> {
        self.components().into_iter().next().unwrap_or_default()
    }
}

/// A graph plus the node algorithms start from
#[derive(Debug, Clone)]
pub struct GraphCase {
    pub graph: Graph,
    pub start: usize,
}

impl GraphCase {
    pub fn new(graph: Graph, start: usize) -> Self {
        Self { graph, start }
    }
}

/// Graph algorithms as measurable units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    /// Skipped on graphs with more nodes than `max_nodes` (cubic time)
    FloydWarshall { max_nodes: usize },
    Kruskal,
    Prim,
}

impl GraphAlgorithm {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::FloydWarshall { .. } => "Floyd-Warshall",
            Self::Kruskal => "Kruskal",
            Self::Prim => "Prim",
        }
    }
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Algorithm<Arc<GraphCase>> for GraphAlgorithm {
    fn name(&self) -> &str {
        self.label()
    }

    fn run(&mut self, case: &mut Arc<GraphCase>) -> std::result::Result<(), Failure> {
        let graph = &case.graph;
        let unsupported = |e: Error| Failure::Unsupported(e.to_string());
        match *self {
            Self::Bfs => {
                std::hint::black_box(bfs(graph, case.start).map_err(unsupported)?);
            }
            Self::Dfs => {
                std::hint::black_box(dfs(graph, case.start).map_err(unsupported)?);
            }
            Self::Dijkstra => {
                std::hint::black_box(dijkstra(graph, case.start).map_err(unsupported)?);
            }
            Self::FloydWarshall { max_nodes } => {
                if graph.node_count() > max_nodes {
                    return Err(Failure::Unsupported(format!(
                        "skipped above {} nodes",
                        max_nodes
                    )));
                }
                std::hint::black_box(floyd_warshall(graph));
            }
            Self::Kruskal => {
                std::hint::black_box(kruskal(graph));
            }
            Self::Prim => {
                std::hint::black_box(prim(graph, case.start).map_err(unsupported)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_undirected_edges_are_symmetric() {
        let mut graph = Graph::new(3, false);
        graph.add_weighted_edge(0, 1, 4);
        graph.add_edge(2, 1);

        assert!(graph.has_edge(1, 0));
        assert!(graph.has_edge(1, 2));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.edges(),
            vec![
                Edge { from: 0, to: 1, weight: 4 },
                Edge { from: 1, to: 2, weight: 1 },
            ]
        );
    }

    #[test]
    fn test_to_undirected() {
        let mut graph = Graph::new(3, true);
        graph.add_edge(0, 1);
        graph.add_edge(2, 1);
        assert!(!graph.has_edge(1, 0));

        let undirected = graph.to_undirected();
        assert!(!undirected.is_directed());
        assert!(undirected.has_edge(1, 0));
        assert!(undirected.has_edge(1, 2));
        assert_eq!(undirected.edge_count(), 2);
    }

    #[test]
    fn test_random_weights_are_symmetric_and_in_range() {
        let mut graph = Graph::new(4, false);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);

        let weighted = graph.with_random_weights(&mut StdRng::seed_from_u64(4));
        for edge in weighted.edges() {
            assert!(WEIGHT_RANGE.contains(&edge.weight));
            let back = weighted
                .neighbors(edge.to)
                .iter()
                .find(|(n, _)| *n == edge.from)
                .map(|(_, w)| *w);
            assert_eq!(back, Some(edge.weight));
        }
    }

    #[test]
    fn test_components() {
        let mut graph = Graph::new(6, false);
        graph.add_edge(0, 1);
        graph.add_edge(2, 3);
        graph.add_edge(3, 4);

        assert_eq!(graph.components(), vec![vec![2, 3, 4], vec![0, 1], vec![5]]);
        assert_eq!(graph.largest_component(), vec![2, 3, 4]);
    }

    #[test]
    fn test_floyd_warshall_size_guard() {
        let mut case = Arc::new(GraphCase::new(Graph::new(10, false), 0));
        let mut algorithm = GraphAlgorithm::FloydWarshall { max_nodes: 5 };
        assert!(matches!(algorithm.run(&mut case), Err(Failure::Unsupported(_))));
    }

    #[test]
    fn test_start_out_of_range_is_a_failure() {
        let mut case = Arc::new(GraphCase::new(Graph::new(2, false), 7));
        let mut algorithm = GraphAlgorithm::Bfs;
        assert_eq!(
            algorithm.run(&mut case),
            Err(Failure::Unsupported(
                "Node 7 is out of range for a graph with 2 nodes".to_string()
            ))
        );
    }
}
