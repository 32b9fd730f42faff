//! Synthetic graph shapes used by the graph labs

use super::Graph;
use crate::error::Error;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

const DENSE_FRACTION: f64 = 0.75;
const SPARSE_FRACTION: f64 = 0.18;

/// The graph shapes every graph lab sweeps over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphType {
    Complete,
    Dense,
    Sparse,
    Tree,
    Connected,
    Disconnected,
    Cyclic,
    Acyclic,
    Grid,
}

impl GraphType {
    pub const ALL: [GraphType; 9] = [
        GraphType::Complete,
        GraphType::Dense,
        GraphType::Sparse,
        GraphType::Tree,
        GraphType::Connected,
        GraphType::Disconnected,
        GraphType::Cyclic,
        GraphType::Acyclic,
        GraphType::Grid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Complete => "Complete Graph",
            Self::Dense => "Dense Graph",
            Self::Sparse => "Sparse Graph",
            Self::Tree => "Tree Graph",
            Self::Connected => "Connected Graph",
            Self::Disconnected => "Disconnected Graph",
            Self::Cyclic => "Cyclic Graph",
            Self::Acyclic => "Acyclic Graph",
            Self::Grid => "Grid Graph",
        }
    }

    /// Only the layered DAG is directed
    pub fn is_directed(&self) -> bool {
        matches!(self, Self::Acyclic)
    }

    /// Build a graph of this shape with `n` nodes and unit weights
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Graph {
        match self {
            Self::Complete => complete(n),
            Self::Dense => dense(n, rng),
            Self::Sparse => sparse(n, rng),
            Self::Tree => tree(n, rng),
            Self::Connected => connected(n, rng),
            Self::Disconnected => disconnected(n, rng),
            Self::Cyclic => cyclic(n, rng),
            Self::Acyclic => acyclic(n, rng),
            Self::Grid => grid(n),
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphType {
    type Err = Error;

    /// Accepts "Grid Graph" as well as "grid"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GraphType::ALL
            .into_iter()
            .find(|t| {
                t.name().eq_ignore_ascii_case(wanted)
                    || t.name()
                        .strip_suffix(" Graph")
                        .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| Error::UnknownGraphType(s.to_string()))
    }
}

fn max_edges(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn add_path(graph: &mut Graph, nodes: &[usize]) {
    for pair in nodes.windows(2) {
        graph.add_edge(pair[0], pair[1]);
    }
}

/// Pairs `(i, j)`, `i < j`, that are not consecutive path neighbours
fn non_path_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(max_edges(n).saturating_sub(n.saturating_sub(1)));
    for i in 0..n {
        for j in i + 2..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Every pair of nodes joined
pub fn complete(n: usize) -> Graph {
    let mut graph = Graph::new(n, false);
    for i in 0..n {
        for j in i + 1..n {
            graph.add_edge(i, j);
        }
    }
    graph
}

/// A path through all nodes plus random extra edges up to 75% of all pairs
pub fn dense<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    let nodes: Vec<usize> = (0..n).collect();
    add_path(&mut graph, &nodes);

    let target = (max_edges(n) as f64 * DENSE_FRACTION) as usize;
    let extra = target.saturating_sub(graph.edge_count());
    let mut pairs = non_path_pairs(n);
    pairs.shuffle(rng);
    for (i, j) in pairs.into_iter().take(extra) {
        graph.add_edge(i, j);
    }
    graph
}

/// A path through all nodes plus extra edges up to 18% of all pairs,
/// preferring pairs whose indices are close
pub fn sparse<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    let nodes: Vec<usize> = (0..n).collect();
    add_path(&mut graph, &nodes);

    let target = ((max_edges(n) as f64 * SPARSE_FRACTION) as usize).max(n.saturating_sub(1));
    let extra = target.saturating_sub(graph.edge_count());
    if extra > 0 {
        let mut pairs = non_path_pairs(n);
        pairs.shuffle(rng);
        // stable: ties keep their shuffled order
        pairs.sort_by_key(|(i, j)| j - i);
        for (i, j) in pairs.into_iter().take(extra) {
            graph.add_edge(i, j);
        }
    }
    graph
}

/// Random tree grown level by level, each parent taking 1..=k children
///
/// k is 2 for up to 10 nodes, 3 for up to 20, 4 beyond.
pub fn tree<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    if n < 2 {
        return graph;
    }

    let max_children = match n {
        0..=10 => 2,
        11..=20 => 3,
        _ => 4,
    };

    let mut next = 1;
    let mut level = vec![0];
    while next < n {
        let mut next_level = Vec::new();
        for &parent in &level {
            if next >= n {
                break;
            }
            let children = rng.gen_range(1..=max_children).min(n - next);
            for _ in 0..children {
                graph.add_edge(parent, next);
                next_level.push(next);
                next += 1;
            }
        }
        level = next_level;
    }
    graph
}

/// Random spanning tree plus n/3 extra edges
pub fn connected<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    if n < 2 {
        return graph;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    for i in 1..n {
        let parent = order[rng.gen_range(0..i)];
        graph.add_edge(parent, order[i]);
    }

    add_random_edges(&mut graph, &order, n / 3, 20, rng);
    graph
}

/// Up to `count` extra edges between distinct, not yet adjacent nodes of
/// `nodes`, giving up on each after `attempts` tries
fn add_random_edges<R: Rng + ?Sized>(
    graph: &mut Graph,
    nodes: &[usize],
    count: usize,
    attempts: usize,
    rng: &mut R,
) {
    if nodes.len() < 2 {
        return;
    }
    for _ in 0..count {
        for _ in 0..attempts {
            let a = nodes[rng.gen_range(0..nodes.len())];
            let b = nodes[rng.gen_range(0..nodes.len())];
            if a != b && !graph.has_edge(a, b) {
                graph.add_edge(a, b);
                break;
            }
        }
    }
}

/// Between two and four components, each a path plus a few extra edges
///
/// Any graph with at least two nodes is split; below four nodes some
/// components are single nodes.
pub fn disconnected<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    if n < 2 {
        return graph;
    }

    let components = (n / 5).clamp(2, 4);
    let min_size = if n >= 2 * components { 2 } else { 1 };
    let mut sizes = vec![min_size; components];
    for _ in 0..n - min_size * components {
        let slot = rng.gen_range(0..components);
        sizes[slot] += 1;
    }

    let mut start = 0;
    for size in sizes {
        let nodes: Vec<usize> = (start..start + size).collect();
        add_path(&mut graph, &nodes);
        add_random_edges(&mut graph, &nodes, (size / 3).max(1), 10, rng);
        start += size;
    }
    graph
}

/// Random tree plus chords `(i, i + 2)`, which close cycles
pub fn cyclic<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, false);
    for i in 1..n {
        let parent = rng.gen_range(0..i);
        graph.add_edge(parent, i);
    }

    for i in 0..(n / 2).max(1) {
        if n == 0 {
            break;
        }
        let a = i % n;
        let b = (i + 2) % n;
        if a != b && !graph.has_edge(a, b) {
            graph.add_edge(a, b);
        }
    }
    graph
}

/// Layered DAG: every node outside the first layer gets one or two arcs from
/// nodes in earlier layers
pub fn acyclic<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph {
    let mut graph = Graph::new(n, true);
    if n < 2 {
        return graph;
    }

    let layers = (((n as f64).sqrt() * 1.5) as usize).max(2).min(n);
    let mut remaining = n;
    let mut boundaries = Vec::with_capacity(layers);
    for layer in 0..layers {
        let left = layers - layer;
        let mut size = remaining / left;
        if layer == 1 {
            size = size + size / 2;
        }
        // leave at least one node for each later layer
        size = size.max(1).min(remaining - (left - 1));
        boundaries.push(n - remaining);
        remaining -= size;
    }

    for (layer, &start) in boundaries.iter().enumerate().skip(1) {
        let end = boundaries.get(layer + 1).copied().unwrap_or(n);
        for node in start..end {
            let wanted = rng.gen_range(1..=2).min(start);
            for source in index::sample(rng, start, wanted).into_iter() {
                graph.add_edge(source, node);
            }
        }
    }
    graph
}

/// Nodes laid out row by row on a ceil(sqrt(n))-wide grid, joined to their
/// right and lower neighbours
pub fn grid(n: usize) -> Graph {
    let mut graph = Graph::new(n, false);
    if n == 0 {
        return graph;
    }

    let width = (n as f64).sqrt().ceil() as usize;
    for node in 0..n {
        let column = node % width;
        if column + 1 < width && node + 1 < n {
            graph.add_edge(node, node + 1);
        }
        if node + width < n {
            graph.add_edge(node, node + width);
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn is_acyclic(graph: &Graph) -> bool {
        // Kahn's algorithm
        let n = graph.node_count();
        let mut indegree = vec![0usize; n];
        for edge in graph.edges() {
            indegree[edge.to] += 1;
        }
        let mut ready: Vec<usize> = (0..n).filter(|v| indegree[*v] == 0).collect();
        let mut visited = 0;
        while let Some(node) = ready.pop() {
            visited += 1;
            for &(next, _) in graph.neighbors(node) {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.push(next);
                }
            }
        }
        visited == n
    }

    #[test]
    fn test_node_counts() {
        let mut rng = rng();
        for graph_type in GraphType::ALL {
            for n in [1, 2, 5, 17, 60] {
                let graph = graph_type.generate(n, &mut rng);
                assert_eq!(graph.node_count(), n, "{} with n = {}", graph_type, n);
                assert_eq!(graph.is_directed(), graph_type.is_directed());
            }
        }
    }

    #[test]
    fn test_edge_counts() {
        let mut rng = rng();
        assert_eq!(complete(10).edge_count(), 45);
        assert_eq!(tree(50, &mut rng).edge_count(), 49);
        assert_eq!(dense(20, &mut rng).edge_count(), 142);
        assert_eq!(sparse(20, &mut rng).edge_count(), 34);
        // 3 x 3 grid: 6 horizontal + 6 vertical
        assert_eq!(grid(9).edge_count(), 12);
        // 3-wide grid with 7 nodes: rows [0 1 2] [3 4 5] [6]
        assert_eq!(grid(7).edge_count(), 8);
    }

    #[test]
    fn test_connected_shapes_have_one_component() {
        let mut rng = rng();
        for graph_type in [
            GraphType::Complete,
            GraphType::Dense,
            GraphType::Sparse,
            GraphType::Tree,
            GraphType::Connected,
            GraphType::Cyclic,
            GraphType::Grid,
        ] {
            for n in [1, 2, 9, 40] {
                let graph = graph_type.generate(n, &mut rng);
                assert_eq!(graph.components().len(), 1, "{} with n = {}", graph_type, n);
            }
        }
    }

    #[test]
    fn test_disconnected_has_several_components() {
        let mut rng = rng();
        for n in [2, 3, 4, 10, 25, 100] {
            let graph = disconnected(n, &mut rng);
            let components = graph.components().len();
            assert!((2..=4).contains(&components), "n = {}: {} components", n, components);
        }
        assert_eq!(disconnected(1, &mut rng).components().len(), 1);
        assert_eq!(disconnected(2, &mut rng).edge_count(), 0);
    }

    #[test]
    fn test_acyclic_is_a_dag() {
        let mut rng = rng();
        for n in [2, 3, 10, 100] {
            let graph = acyclic(n, &mut rng);
            assert!(is_acyclic(&graph), "n = {}", n);
            assert!(graph.edge_count() >= 1);
        }
    }

    #[test]
    fn test_cyclic_has_a_cycle() {
        let graph = cyclic(10, &mut rng());
        // a forest on n nodes has at most n - 1 edges
        assert!(graph.edge_count() > 9);
    }

    #[test]
    fn test_parse_graph_type() {
        assert_eq!("Grid Graph".parse::<GraphType>().unwrap(), GraphType::Grid);
        assert_eq!("disconnected".parse::<GraphType>().unwrap(), GraphType::Disconnected);
        assert!(matches!("Star".parse::<GraphType>(), Err(Error::UnknownGraphType(_))));
    }
}
