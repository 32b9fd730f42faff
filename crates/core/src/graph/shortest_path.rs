//! Single-source and all-pairs shortest paths over non-negative weights

use super::Graph;
use crate::error::Result;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Distances from `source`; `None` for unreachable nodes
pub fn dijkstra(graph: &Graph, source: usize) -> Result<Vec<Option<u64>>> {
    graph.check_node(source)?;

    let mut distance: Vec<Option<u64>> = vec![None; graph.node_count()];
    let mut heap = BinaryHeap::new();

    distance[source] = Some(0);
    heap.push(Reverse((0u64, source)));
    while let Some(Reverse((dist, node))) = heap.pop() {
        if distance[node].is_some_and(|best| dist > best) {
            continue;
        }
        for &(next, weight) in graph.neighbors(node) {
            let candidate = dist + u64::from(weight);
            if distance[next].map_or(true, |best| candidate < best) {
                distance[next] = Some(candidate);
                heap.push(Reverse((candidate, next)));
            }
        }
    }
    Ok(distance)
}

/// Row-major n x n matrix of shortest distances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<Option<u64>>,
}

impl DistanceMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Shortest distance from `from` to `to`, `None` if unreachable
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells[from * self.size + to]
    }

    /// All distances from one node, as [`dijkstra`] reports them
    pub fn row(&self, from: usize) -> &[Option<u64>] {
        &self.cells[from * self.size..(from + 1) * self.size]
    }
}

/// All-pairs shortest distances by dynamic programming over intermediate nodes
pub fn floyd_warshall(graph: &Graph) -> DistanceMatrix {
    let n = graph.node_count();
    let mut cells = vec![None; n * n];

    for node in 0..n {
        cells[node * n + node] = Some(0);
        for &(next, weight) in graph.neighbors(node) {
            let weight = u64::from(weight);
            let cell = &mut cells[node * n + next];
            if cell.map_or(true, |current| weight < current) {
                *cell = Some(weight);
            }
        }
    }

    for via in 0..n {
        for from in 0..n {
            let Some(first) = cells[from * n + via] else {
                continue;
            };
            for to in 0..n {
                if let Some(second) = cells[via * n + to] {
                    let candidate = first + second;
                    let cell = &mut cells[from * n + to];
                    if cell.map_or(true, |current| candidate < current) {
                        *cell = Some(candidate);
                    }
                }
            }
        }
    }

    DistanceMatrix { size: n, cells }
}
