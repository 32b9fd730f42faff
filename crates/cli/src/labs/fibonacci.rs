//! Fibonacci lab: the seven methods over one of three n ranges

use super::{figure_name, LabContext, LabOutput};
use crate::error::Result;
use algo_lab_core::{ChartSpec, FibonacciAlgorithm, HarnessConfig, Method, Parameter, Sweep};
use clap::ValueEnum;
use tracing::info;

pub const LOW_N: [u64; 17] = [5, 7, 10, 12, 15, 17, 20, 22, 25, 27, 30, 32, 35, 37, 40, 42, 45];

pub const MEDIUM_N: [u64; 16] = [
    501, 631, 794, 1000, 1259, 1585, 1995, 2512, 3162, 3981, 5012, 6310, 7943, 10000, 12589, 15849,
];

pub const HIGH_N: [u64; 24] = [
    0, 4000, 8000, 24000, 31000, 50000, 60000, 72000, 84000, 95000, 105000, 117000, 124000,
    140000, 160000, 170000, 190000, 220000, 250000, 300000, 350000, 400000, 450000, 500000,
];

/// Which list of n the lab sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FibonacciRange {
    #[default]
    Low,
    Medium,
    High,
}

impl FibonacciRange {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn sizes(&self) -> &'static [u64] {
        match self {
            Self::Low => &LOW_N,
            Self::Medium => &MEDIUM_N,
            Self::High => &HIGH_N,
        }
    }

    /// Naive recursion only takes part in the low range
    pub fn methods(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| *self == Self::Low || *m != Method::Recursive)
            .collect()
    }
}

pub fn run(ctx: &LabContext<'_>, range: FibonacciRange) -> Result<LabOutput> {
    run_sweep(ctx, range.name(), range.sizes(), &range.methods())
}

fn run_sweep(
    ctx: &LabContext<'_>,
    range: &str,
    sizes: &[u64],
    methods: &[Method],
) -> Result<LabOutput> {
    info!("Fibonacci lab: {} methods over the {} n list", methods.len(), range);

    let harness = ctx.harness(HarnessConfig::default())?;
    let mut sweep = methods.iter().fold(
        Sweep::new(format!("Fibonacci ({} n)", range), "Method / n", Parameter::sizes(sizes)),
        |sweep, method| sweep.algorithm(FibonacciAlgorithm::new(*method)),
    );
    let report = sweep.run(&harness, |parameter| {
        let n = parameter.size().unwrap_or(0);
        move || n
    })?;
    if report.failures() > 0 {
        info!("{} cells failed and are shown as errors", report.failures());
    }

    let x_label = format!("n, from {} list", range);
    let mut output = LabOutput::new("fibonacci", "Fibonacci Lab");
    for table in report.tables() {
        for method in methods {
            output.push_figure(
                figure_name(&format!("{}_{}", range, method), table),
                ChartSpec::single(table, method.label(), &x_label),
            );
        }
        output.push_figure(
            figure_name(&format!("{}_all_methods", range), table),
            ChartSpec::overlay(table, &format!("{}: all methods", table.title), &x_label),
        );
    }
    for table in report.tables() {
        output.push_table(ctx, table.clone())?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labs::OutputFormat;
    use algo_lab_core::Cell;

    #[test]
    fn test_ranges() {
        assert_eq!(FibonacciRange::Low.methods().len(), 7);
        assert!(!FibonacciRange::High.methods().contains(&Method::Recursive));
        assert_eq!(FibonacciRange::Medium.methods().len(), 6);
        assert_eq!(FibonacciRange::High.sizes().first(), Some(&0));
        assert_eq!(FibonacciRange::High.sizes().last(), Some(&500_000));
    }

    #[test]
    fn test_small_sweep() {
        let ctx = LabContext::new("unused", 1, OutputFormat::Text).quiet();
        let output = run_sweep(&ctx, "tiny", &[0, 5, 30], &Method::ALL).unwrap();

        assert_eq!(output.tables.len(), 1);
        let table = &output.tables[0];
        assert_eq!(table.title, "Fibonacci (tiny n)");
        assert_eq!(table.row_count(), 7);
        assert_eq!(table.column_count(), 3);
        assert!(table
            .rows
            .iter()
            .all(|row| row.cells.iter().all(|c| matches!(c, Cell::Value(_)))));

        // one chart per method plus the overlay
        assert_eq!(output.figures.len(), 8);
        assert!(output.figure("tiny_Binet Formula").is_some());
        let overlay = output.figure("tiny_all_methods").unwrap();
        assert_eq!(overlay.chart.series.len(), 7);
        assert_eq!(overlay.chart.x_label, "n, from tiny list");
    }
}
