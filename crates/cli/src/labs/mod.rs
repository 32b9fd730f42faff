//! The comparison labs and what they share: harness setup, console tables,
//! chart files and the per-lab dashboard

pub mod fibonacci;
pub mod graphs;
pub mod sorting;

use crate::dashboard::{write_dashboard, ChartLink};
use crate::error::{Error, Result};
use crate::file_manager::{ensure_dir_exists, sanitize_file_name, write_file};
use crate::render::render_chart;
use algo_lab_core::{ChartSpec, ComparisonTable, Harness, HarnessConfig, MemoryProbe};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How tables are printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Settings every lab runs with
pub struct LabContext<'p> {
    output_dir: PathBuf,
    seed: u64,
    format: OutputFormat,
    probe: Option<&'p dyn MemoryProbe>,
    quiet: bool,
}

impl<'p> LabContext<'p> {
    pub fn new(output_dir: impl Into<PathBuf>, seed: u64, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            seed,
            format,
            probe: None,
            quiet: false,
        }
    }

    /// Also measure peak memory, read from `probe`
    pub fn with_memory_probe(mut self, probe: &'p dyn MemoryProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Skip printing tables (files are still written)
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Harness for one lab; memory tracking follows the context
    pub fn harness(&self, config: HarnessConfig) -> Result<Harness<'p>> {
        let harness = Harness::new(HarnessConfig {
            track_memory: self.probe.is_some(),
            ..config
        })?;
        Ok(match self.probe {
            Some(probe) => harness.with_memory_probe(probe),
            None => harness,
        })
    }

    /// Input generator seeded from the context, so reruns see the same inputs
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Print a table on stdout in the configured format
    pub fn print_table(&self, table: &ComparisonTable) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        let text = match self.format {
            OutputFormat::Text => table.render_text(),
            OutputFormat::Markdown => table.render_markdown(),
            OutputFormat::Json => serde_json::to_string_pretty(table)?,
        };
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text).map_err(Error::Terminal)?;
        writeln!(stdout).map_err(Error::Terminal)
    }
}

/// A chart and the file stem it is saved under
#[derive(Debug, Clone)]
pub struct Figure {
    pub name: String,
    pub chart: ChartSpec,
}

/// Everything one lab produced
#[derive(Debug, Clone)]
pub struct LabOutput {
    /// Directory name under the output root
    pub name: String,
    pub title: String,
    pub tables: Vec<ComparisonTable>,
    pub figures: Vec<Figure>,
}

impl LabOutput {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            tables: Vec::new(),
            figures: Vec::new(),
        }
    }

    /// Record a chart; `None` (nothing valid to draw) is dropped
    pub fn push_figure(&mut self, name: impl Into<String>, chart: Option<ChartSpec>) {
        if let Some(chart) = chart {
            self.figures.push(Figure {
                name: name.into(),
                chart,
            });
        }
    }

    /// Print the table and keep it for the dashboard
    pub fn push_table(&mut self, ctx: &LabContext<'_>, table: ComparisonTable) -> Result<()> {
        ctx.print_table(&table)?;
        self.tables.push(table);
        Ok(())
    }

    #[cfg(test)]
    pub fn figure(&self, name: &str) -> Option<&Figure> {
        self.figures.iter().find(|f| f.name == name)
    }
}

/// Write every chart as SVG plus `index.html` into `<output>/<lab>/`
pub fn publish(ctx: &LabContext<'_>, output: &LabOutput) -> Result<PathBuf> {
    let dir = ctx.output_dir().join(&output.name);
    ensure_dir_exists(&dir)?;

    let mut links = Vec::with_capacity(output.figures.len());
    for figure in &output.figures {
        let file = sanitize_file_name(&figure.name, "svg");
        let svg = render_chart(&figure.chart)?;
        let path = write_file(&dir, &file, &svg)?;
        debug!("Wrote {}", path.display());
        links.push(ChartLink {
            title: figure.chart.title.clone(),
            file,
        });
    }

    let index = write_dashboard(&dir, &output.title, &output.tables, &links)?;
    info!(
        "{}: {} tables, {} charts written to {}",
        output.title,
        output.tables.len(),
        links.len(),
        dir.display()
    );
    Ok(index)
}

/// Memory variant of a figure name, for tables that carry one
fn figure_name(base: &str, table: &ComparisonTable) -> String {
    match table.metric {
        algo_lab_core::Metric::Time => base.to_string(),
        algo_lab_core::Metric::Memory => format!("{}_memory", base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_lab_core::{Cell, Metric, Parameter, PeakAllocator};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn table(title: &str) -> ComparisonTable {
        let mut table = ComparisonTable::new(
            title,
            "Sorting Algorithm",
            Metric::Time,
            Parameter::sizes(&[10, 100]),
        );
        table
            .push_row("Quick Sort", vec![Cell::Value(0.001), Cell::Value(0.01)])
            .unwrap();
        table
    }

    #[test]
    fn test_harness_follows_memory_probe() {
        let plain = LabContext::new("out", 1, OutputFormat::Text);
        assert!(!plain.harness(HarnessConfig::default()).unwrap().tracks_memory());

        // not installed as the global allocator, so every peak reads 0
        let probe = PeakAllocator::new();
        let tracked = LabContext::new("out", 1, OutputFormat::Text).with_memory_probe(&probe);
        let harness = tracked
            .harness(HarnessConfig {
                repetitions: 3,
                ..HarnessConfig::default()
            })
            .unwrap();
        assert!(harness.tracks_memory());
        assert_eq!(harness.config().repetitions, 3);
    }

    #[test]
    fn test_rng_is_reproducible() {
        use rand::Rng;
        let ctx = LabContext::new("out", 7, OutputFormat::Text);
        let a: Vec<u32> = ctx.rng().sample_iter(rand::distributions::Standard).take(4).collect();
        let b: Vec<u32> = ctx.rng().sample_iter(rand::distributions::Standard).take(4).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_publish_writes_charts_and_index() {
        let root = TempDir::new().unwrap();
        let ctx = LabContext::new(root.path(), 1, OutputFormat::Text).quiet();

        let mut output = LabOutput::new("sorting", "Sorting Lab");
        let table = table("Random Integers");
        output.push_figure(
            "Random Integers",
            ChartSpec::overlay(&table, "Random Integers", "Input Size"),
        );
        output.push_figure("Empty", None);
        output.push_table(&ctx, table).unwrap();

        let index = publish(&ctx, &output).unwrap();
        assert_eq!(index, root.path().join("sorting").join("index.html"));
        assert!(root.path().join("sorting/random_integers.svg").exists());
        assert!(!root.path().join("sorting/empty.svg").exists());

        let html = std::fs::read_to_string(index).unwrap();
        assert!(html.contains("random_integers.svg"));
    }

    #[test]
    fn test_figure_name_marks_memory_tables() {
        let time = table("x");
        let mut memory = table("x");
        memory.metric = Metric::Memory;
        assert_eq!(figure_name("quick_sort", &time), "quick_sort");
        assert_eq!(figure_name("quick_sort", &memory), "quick_sort_memory");
    }
}
