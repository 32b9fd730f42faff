//! Chart data extracted from comparison tables, and the axis-scale policy
//!
//! Rendering lives in the binary; this module only decides what gets drawn.

use crate::data::Parameter;
use crate::table::ComparisonTable;
use serde::Serialize;
use tracing::warn;

/// Valid values spanning more than this factor get a logarithmic value axis
pub const LOG_SCALE_RATIO: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Linear,
    Log,
}

/// Log when max/min exceeds [`LOG_SCALE_RATIO`] and min is strictly positive
pub fn choose_scale(values: impl IntoIterator<Item = f64>) -> Scale {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min > 0.0 && min.is_finite() && max / min > LOG_SCALE_RATIO {
        Scale::Log
    } else {
        Scale::Linear
    }
}

/// One line on a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Where a parameter sits on the x axis: sizes at their value, patterns at
/// their position in the sweep
fn x_position(index: usize, parameter: &Parameter) -> f64 {
    match parameter {
        Parameter::Size(n) => *n as f64,
        Parameter::Pattern(_) => index as f64,
    }
}

/// Points of the row labelled `label`, failed cells dropped
pub fn series_from_table(table: &ComparisonTable, label: &str) -> Option<Series> {
    let row = table.row(label)?;
    let points = table
        .parameters
        .iter()
        .enumerate()
        .zip(&row.cells)
        .filter_map(|((index, parameter), cell)| {
            cell.value().map(|v| (x_position(index, parameter), v))
        })
        .collect();
    Some(Series {
        label: label.to_string(),
        points,
    })
}

/// Everything a renderer needs for one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Requested logarithmic x axis; see [`ChartSpec::x_scale`]
    pub x_log: bool,
    /// Tick labels for pattern sweeps, at x = 0, 1, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Chart of a single row; `None` when it has no valid point
    pub fn single(table: &ComparisonTable, label: &str, x_label: &str) -> Option<ChartSpec> {
        let Some(series) = series_from_table(table, label) else {
            warn!("{}: no row named {}, chart skipped", table.title, label);
            return None;
        };
        if series.points.is_empty() {
            warn!("{}: no valid data for {}, chart skipped", table.title, label);
            return None;
        }
        Some(Self::build(
            format!("{}: {}", table.title, label),
            table,
            x_label,
            vec![series],
        ))
    }

    /// Every row on one chart; rows without valid points are left out and
    /// `None` is returned when none has any
    pub fn overlay(table: &ComparisonTable, title: &str, x_label: &str) -> Option<ChartSpec> {
        let series: Vec<Series> = table
            .rows
            .iter()
            .filter_map(|row| series_from_table(table, &row.label))
            .filter(|s| {
                if s.points.is_empty() {
                    warn!("{}: no valid data for {}, series skipped", title, s.label);
                }
                !s.points.is_empty()
            })
            .collect();
        if series.is_empty() {
            warn!("{}: no valid data, chart skipped", title);
            return None;
        }
        Some(Self::build(title.to_string(), table, x_label, series))
    }

    fn build(
        title: String,
        table: &ComparisonTable,
        x_label: &str,
        series: Vec<Series>,
    ) -> ChartSpec {
        let categories = table
            .parameters
            .iter()
            .all(|p| matches!(p, Parameter::Pattern(_)))
            .then(|| table.parameters.iter().map(ToString::to_string).collect());
        ChartSpec {
            title,
            x_label: x_label.to_string(),
            y_label: table.metric.caption().to_string(),
            x_log: false,
            categories,
            series,
        }
    }

    /// Ask for a logarithmic x axis (honoured only if every x is positive)
    pub fn with_x_log(mut self) -> Self {
        self.x_log = true;
        self
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1))
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0))
    }

    /// Value axis scale over all plotted points
    pub fn value_scale(&self) -> Scale {
        choose_scale(self.values())
    }

    pub fn x_scale(&self) -> Scale {
        if self.x_log && self.categories.is_none() && self.xs().all(|x| x > 0.0) {
            Scale::Log
        } else {
            Scale::Linear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metric;
    use crate::error::Failure;
    use crate::table::Cell;

    fn table() -> ComparisonTable {
        let mut table = ComparisonTable::new(
            "Sorting",
            "Sorting Algorithm",
            Metric::Time,
            Parameter::sizes(&[10, 100, 1000]),
        );
        table
            .push_row(
                "Insertion Sort",
                vec![
                    Cell::Value(0.001),
                    Cell::Failed(Failure::Panicked("x".to_string())),
                    Cell::Value(0.5),
                ],
            )
            .unwrap();
        table
            .push_row(
                "Broken",
                vec![
                    Cell::Failed(Failure::AllocationFailed { bytes: 1 }),
                    Cell::Failed(Failure::AllocationFailed { bytes: 1 }),
                    Cell::Failed(Failure::AllocationFailed { bytes: 1 }),
                ],
            )
            .unwrap();
        table
    }

    #[test]
    fn test_choose_scale() {
        assert_eq!(choose_scale([1.0, 50.0]), Scale::Linear);
        assert_eq!(choose_scale([1.0, 100.0]), Scale::Linear);
        assert_eq!(choose_scale([1.0, 100.5]), Scale::Log);
        assert_eq!(choose_scale([0.0, 1000.0]), Scale::Linear);
        assert_eq!(choose_scale(Vec::new()), Scale::Linear);
    }

    #[test]
    fn test_failed_cells_are_dropped() {
        let series = series_from_table(&table(), "Insertion Sort").unwrap();
        assert_eq!(series.points, vec![(10.0, 0.001), (1000.0, 0.5)]);
    }

    #[test]
    fn test_single_and_overlay() {
        let table = table();
        let single = ChartSpec::single(&table, "Insertion Sort", "Input Size").unwrap();
        assert_eq!(single.value_scale(), Scale::Log);
        assert_eq!(single.y_label, "Execution Time (s)");
        assert!(single.categories.is_none());

        assert!(ChartSpec::single(&table, "Broken", "Input Size").is_none());
        assert!(ChartSpec::single(&table, "Missing", "Input Size").is_none());

        let overlay = ChartSpec::overlay(&table, "All", "Input Size").unwrap();
        assert_eq!(overlay.series.len(), 1);
    }

    #[test]
    fn test_pattern_axis_uses_categories() {
        let mut table = ComparisonTable::new(
            "Quick Sort",
            "Pattern",
            Metric::Time,
            Parameter::patterns(&["Random Integers", "Already Sorted Integers"]),
        );
        table.push_row("Quick Sort", vec![Cell::Value(1.0), Cell::Value(2.0)]).unwrap();

        let chart = ChartSpec::single(&table, "Quick Sort", "Pattern").unwrap().with_x_log();
        assert_eq!(chart.series[0].points, vec![(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(chart.categories.as_ref().map(Vec::len), Some(2));
        assert_eq!(chart.x_scale(), Scale::Linear);
    }

    #[test]
    fn test_x_log_needs_positive_sizes() {
        let mut table =
            ComparisonTable::new("Fib", "Method / n", Metric::Time, Parameter::sizes(&[0, 4000]));
        table.push_row("Binet Formula", vec![Cell::Value(1.0), Cell::Value(2.0)]).unwrap();
        let chart = ChartSpec::overlay(&table, "Fib", "n").unwrap().with_x_log();
        assert_eq!(chart.x_scale(), Scale::Linear);
    }
}
