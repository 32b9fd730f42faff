//! Sorting lab: five algorithms over nine input patterns, then a per-algorithm
//! summary across patterns

use super::{figure_name, LabContext, LabOutput};
use crate::error::Result;
use algo_lab_core::{
    ChartSpec, ComparisonTable, HarnessConfig, Metric, Parameter, Pattern, SortAlgorithm, Sweep,
};
use tracing::info;

pub const ARRAY_SIZES: [u64; 5] = [10, 100, 500, 1000, 1500];

/// Timed runs averaged per cell
pub const REPETITIONS: u32 = 5;

/// Inputs at least this long are sorted only once
pub const LARGE_INPUT: u64 = 9999;

pub fn run(ctx: &LabContext<'_>) -> Result<LabOutput> {
    run_sweep(ctx, &ARRAY_SIZES, &Pattern::ALL, &SortAlgorithm::ALL)
}

fn run_sweep(
    ctx: &LabContext<'_>,
    sizes: &[u64],
    patterns: &[Pattern],
    algorithms: &[SortAlgorithm],
) -> Result<LabOutput> {
    info!(
        "Sorting lab: {} algorithms, {} patterns, sizes {:?}",
        algorithms.len(),
        patterns.len(),
        sizes
    );

    let harness = ctx.harness(HarnessConfig {
        repetitions: REPETITIONS,
        large_input_threshold: Some(LARGE_INPUT),
        ..HarnessConfig::default()
    })?;
    let mut rng = ctx.rng();
    let mut output = LabOutput::new("sorting", "Sorting Lab");
    let mut time_tables = Vec::with_capacity(patterns.len());
    let mut memory_tables = Vec::new();

    for pattern in patterns {
        let mut sweep = algorithms.iter().fold(
            Sweep::new(pattern.name(), "Sorting Algorithm", Parameter::sizes(sizes))
                .subject(pattern.name()),
            |sweep, algorithm| sweep.algorithm(*algorithm),
        );
        let report = sweep.run(&harness, |parameter| {
            let input = pattern.generate(parameter.size().unwrap_or(0) as usize, &mut rng);
            move || input.clone()
        })?;

        for table in report.tables() {
            output.push_figure(
                figure_name(pattern.name(), table),
                ChartSpec::overlay(table, &table.title, "Input Size").map(ChartSpec::with_x_log),
            );
        }
        output.push_table(ctx, report.time.clone())?;
        time_tables.push(report.time);
        if let Some(memory) = report.memory {
            output.push_table(ctx, memory.clone())?;
            memory_tables.push(memory);
        }
    }

    for algorithm in algorithms {
        summarise(ctx, &mut output, &time_tables, *algorithm)?;
        if !memory_tables.is_empty() {
            summarise(ctx, &mut output, &memory_tables, *algorithm)?;
        }
    }

    Ok(output)
}

/// Per-algorithm view: one row per pattern, the same size columns
fn summarise(
    ctx: &LabContext<'_>,
    output: &mut LabOutput,
    tables: &[ComparisonTable],
    algorithm: SortAlgorithm,
) -> Result<()> {
    let title = match tables.first().map(|t| t.metric) {
        Some(Metric::Memory) => format!("Summary for {} (memory)", algorithm),
        _ => format!("Summary for {}", algorithm),
    };
    let summary =
        ComparisonTable::transpose_by_algorithm(tables, algorithm.label(), title, "Pattern")?;
    output.push_figure(
        figure_name(&format!("{}_across_patterns", algorithm), &summary),
        ChartSpec::overlay(
            &summary,
            &format!("{}: performance across patterns", algorithm),
            "Input Size",
        )
        .map(ChartSpec::with_x_log),
    );
    output.push_table(ctx, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labs::OutputFormat;
    use algo_lab_core::{PeakAllocator, Scale};

    #[test]
    fn test_small_sweep() {
        let ctx = LabContext::new("unused", 3, OutputFormat::Text).quiet();
        let patterns = [Pattern::RandomIntegers, Pattern::Sorted];
        let algorithms = [SortAlgorithm::Insertion, SortAlgorithm::Quick];
        let output = run_sweep(&ctx, &[10, 50], &patterns, &algorithms).unwrap();

        // two pattern tables, then one summary per algorithm
        let titles: Vec<&str> = output.tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Random Integers",
                "Already Sorted Integers",
                "Summary for Insertion Sort",
                "Summary for Quick Sort",
            ]
        );

        let summary = &output.tables[2];
        assert_eq!(summary.header, "Pattern");
        assert_eq!(summary.rows[0].label, "Random Integers");
        assert_eq!(summary.rows[1].label, "Already Sorted Integers");
        assert_eq!(summary.column_count(), 2);

        let chart = &output.figure("Random Integers").unwrap().chart;
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.x_scale(), Scale::Log);
        assert!(output.figure("Quick Sort_across_patterns").is_some());
    }

    #[test]
    fn test_memory_tables_when_tracked() {
        let probe = PeakAllocator::new();
        let ctx = LabContext::new("unused", 3, OutputFormat::Text)
            .quiet()
            .with_memory_probe(&probe);
        let output = run_sweep(&ctx, &[10], &[Pattern::Reversed], &[SortAlgorithm::Merge]).unwrap();

        let titles: Vec<&str> = output.tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Reversed Sorted Integers",
                "Reversed Sorted Integers (memory)",
                "Summary for Merge Sort",
                "Summary for Merge Sort (memory)",
            ]
        );
        assert_eq!(output.tables[1].metric, Metric::Memory);
        assert!(output.figure("Merge Sort_across_patterns_memory").is_some());
    }
}
