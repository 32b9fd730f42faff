//! Graph labs: traversal, shortest paths and minimum spanning trees, each over
//! the nine graph shapes

use super::{figure_name, LabContext, LabOutput};
use crate::error::Result;
use algo_lab_core::{
    ChartSpec, ComparisonTable, Graph, GraphAlgorithm, GraphCase, GraphType, HarnessConfig,
    Metric, Parameter, Sweep,
};
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, info};

/// Floyd-Warshall is skipped on larger graphs
pub const FLOYD_WARSHALL_MAX_NODES: usize = 500;

/// One graph lab: which algorithms run and how a generated graph is prepared
pub struct GraphLab {
    pub name: &'static str,
    pub title: &'static str,
    pub sizes: Vec<u64>,
    pub algorithms: Vec<GraphAlgorithm>,
    prepare: fn(Graph, &mut StdRng) -> GraphCase,
}

impl GraphLab {
    /// BFS and DFS from node 0 on unweighted graphs
    pub fn traversal() -> Self {
        Self {
            name: "traversal",
            title: "Graph Traversal",
            sizes: (1..4500).step_by(250).collect(),
            algorithms: vec![GraphAlgorithm::Bfs, GraphAlgorithm::Dfs],
            prepare: |graph, _| GraphCase::new(graph, 0),
        }
    }

    /// Dijkstra and Floyd-Warshall from node 0 on randomly weighted graphs
    pub fn shortest_path() -> Self {
        Self {
            name: "shortest_path",
            title: "Shortest Paths",
            sizes: vec![10, 50, 100, 200, 220],
            algorithms: vec![
                GraphAlgorithm::Dijkstra,
                GraphAlgorithm::FloydWarshall {
                    max_nodes: FLOYD_WARSHALL_MAX_NODES,
                },
            ],
            prepare: |graph, rng| GraphCase::new(graph.with_random_weights(rng), 0),
        }
    }

    /// Kruskal and Prim on undirected weighted graphs; Prim starts inside the
    /// largest component so it spans as much as possible
    pub fn mst() -> Self {
        Self {
            name: "mst",
            title: "Minimum Spanning Trees",
            sizes: (1..2400).step_by(150).collect(),
            algorithms: vec![GraphAlgorithm::Kruskal, GraphAlgorithm::Prim],
            prepare: |graph, rng| {
                let graph = if graph.is_directed() {
                    graph.to_undirected()
                } else {
                    graph
                };
                let graph = graph.with_random_weights(rng);
                let start = graph.largest_component().first().copied().unwrap_or(0);
                GraphCase::new(graph, start)
            },
        }
    }

    #[cfg(test)]
    pub fn with_sizes(mut self, sizes: Vec<u64>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn run(&self, ctx: &LabContext<'_>) -> Result<LabOutput> {
        self.run_on(ctx, &GraphType::ALL)
    }

    fn run_on(&self, ctx: &LabContext<'_>, graph_types: &[GraphType]) -> Result<LabOutput> {
        info!(
            "{} lab: {} graph types, {} sizes up to {}",
            self.title,
            graph_types.len(),
            self.sizes.len(),
            self.sizes.last().copied().unwrap_or(0)
        );

        let harness = ctx.harness(HarnessConfig::default())?;
        let mut rng = ctx.rng();
        let mut output = LabOutput::new(self.name, format!("{} Lab", self.title));
        let mut time_tables = Vec::with_capacity(graph_types.len());
        let mut memory_tables = Vec::new();

        for graph_type in graph_types {
            let mut sweep = self.algorithms.iter().fold(
                Sweep::new(
                    format!("{} on {}", self.title, graph_type),
                    "Algorithm",
                    Parameter::sizes(&self.sizes),
                )
                .subject(graph_type.name()),
                |sweep, algorithm| sweep.algorithm(*algorithm),
            );
            let report = sweep.run(&harness, |parameter| {
                let n = parameter.size().unwrap_or(0) as usize;
                let graph = graph_type.generate(n, &mut rng);
                let case = Arc::new((self.prepare)(graph, &mut rng));
                debug!(
                    "{} with {} nodes: {} edges",
                    graph_type,
                    case.graph.node_count(),
                    case.graph.edge_count()
                );
                move || Arc::clone(&case)
            })?;

            for table in report.tables() {
                output.push_figure(
                    figure_name(&format!("{}_comparison", graph_type), table),
                    ChartSpec::overlay(table, &table.title, "Number of Nodes"),
                );
            }
            output.push_table(ctx, report.time.clone())?;
            time_tables.push(report.time);
            if let Some(memory) = report.memory {
                output.push_table(ctx, memory.clone())?;
                memory_tables.push(memory);
            }
        }

        for algorithm in &self.algorithms {
            self.regroup(ctx, &mut output, &time_tables, *algorithm)?;
            if !memory_tables.is_empty() {
                self.regroup(ctx, &mut output, &memory_tables, *algorithm)?;
            }
        }

        Ok(output)
    }

    /// One algorithm across every graph type
    fn regroup(
        &self,
        ctx: &LabContext<'_>,
        output: &mut LabOutput,
        tables: &[ComparisonTable],
        algorithm: GraphAlgorithm,
    ) -> Result<()> {
        let title = match tables.first().map(|t| t.metric) {
            Some(Metric::Memory) => format!("{} across graph types (memory)", algorithm),
            _ => format!("{} across graph types", algorithm),
        };
        let table = ComparisonTable::transpose_by_algorithm(
            tables,
            algorithm.label(),
            title,
            "Graph Type",
        )?;
        output.push_figure(
            figure_name(&format!("{}_across_graph_types", algorithm), &table),
            ChartSpec::overlay(&table, &table.title, "Number of Nodes"),
        );
        output.push_table(ctx, table)
    }
}
