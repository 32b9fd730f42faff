//! Breadth- and depth-first traversal

use super::Graph;
use crate::error::Result;
use std::collections::VecDeque;

/// Nodes reachable from `start`, in breadth-first order
pub fn bfs(graph: &Graph, start: usize) -> Result<Vec<usize>> {
    graph.check_node(start)?;

    let mut visited = vec![false; graph.node_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &(next, _) in graph.neighbors(node) {
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    Ok(order)
}

/// Nodes reachable from `start`, in depth-first preorder
///
/// Uses an explicit stack; neighbours are pushed in reverse so the visiting
/// order matches the recursive formulation.
pub fn dfs(graph: &Graph, start: usize) -> Result<Vec<usize>> {
    graph.check_node(start)?;

    let mut visited = vec![false; graph.node_count()];
    let mut order = Vec::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);
        for &(next, _) in graph.neighbors(node).iter().rev() {
            if !visited[next] {
                stack.push(next);
            }
        }
    }
    Ok(order)
}
