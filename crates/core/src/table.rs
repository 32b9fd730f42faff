//! Comparison tables: algorithms x sweep parameters, one table per metric

use crate::data::{Measurement, Metric, Parameter};
use crate::error::{Error, Failure, Result};
use serde::Serialize;
use std::collections::HashMap;

/// One table cell: a value or the reason it is missing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Cell {
    Value(f64),
    Failed(Failure),
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Failed(_) => None,
        }
    }

    /// Fixed-precision text, or the failure marker
    pub fn text(&self, precision: usize) -> String {
        match self {
            Self::Value(v) => format!("{:.*}", precision, v),
            Self::Failed(failure) => failure.cell_text(),
        }
    }
}

impl From<std::result::Result<f64, Failure>> for Cell {
    fn from(outcome: std::result::Result<f64, Failure>) -> Self {
        match outcome {
            Ok(v) => Cell::Value(v),
            Err(failure) => Cell::Failed(failure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// Rows are algorithms in insertion order, columns are sweep parameters in
/// sweep order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub title: String,
    /// What the table is about within its lab, e.g. a pattern or graph type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub metric: Metric,
    /// Caption of the label column
    pub header: String,
    pub parameters: Vec<Parameter>,
    pub rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn new(
        title: impl Into<String>,
        header: impl Into<String>,
        metric: Metric,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            title: title.into(),
            subject: None,
            metric,
            header: header.into(),
            parameters,
            rows: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Append a row; it must hold exactly one cell per parameter
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) -> Result<()> {
        let label = label.into();
        if cells.len() != self.parameters.len() {
            return Err(Error::InvalidSweep(format!(
                "row '{}' has {} cells but the table has {} columns",
                label,
                cells.len(),
                self.parameters.len()
            )));
        }
        self.rows.push(TableRow { label, cells });
        Ok(())
    }

    /// Lay out `measurements` with one row per label and one column per
    /// parameter, both in the given order
    ///
    /// Combinations with no measurement become failed cells.
    pub fn from_measurements(
        title: impl Into<String>,
        header: impl Into<String>,
        metric: Metric,
        parameters: &[Parameter],
        labels: &[String],
        measurements: &[Measurement],
    ) -> Self {
        let lookup: HashMap<(&str, &Parameter), &Measurement> = measurements
            .iter()
            .map(|m| ((m.algorithm.as_str(), &m.parameter), m))
            .collect();

        let rows = labels
            .iter()
            .map(|label| TableRow {
                label: label.clone(),
                cells: parameters
                    .iter()
                    .map(|parameter| match lookup.get(&(label.as_str(), parameter)) {
                        Some(measurement) => Cell::from(measurement.value(metric)),
                        None => Cell::Failed(Failure::Unsupported("not measured".to_string())),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: title.into(),
            subject: None,
            metric,
            header: header.into(),
            parameters: parameters.to_vec(),
            rows,
        }
    }

    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.parameters.len()
    }

    /// Row label used when this table becomes a row of a summary
    fn summary_label(&self) -> &str {
        self.subject.as_deref().unwrap_or(&self.title)
    }

    /// Regroup per-subject tables into one table for `algorithm`: a row per
    /// source table (labelled by its subject), the same columns
    pub fn transpose_by_algorithm(
        tables: &[ComparisonTable],
        algorithm: &str,
        title: impl Into<String>,
        header: impl Into<String>,
    ) -> Result<ComparisonTable> {
        let first = tables
            .first()
            .ok_or_else(|| Error::InvalidSweep("no tables to summarise".to_string()))?;

        let mut summary =
            ComparisonTable::new(title, header, first.metric, first.parameters.clone())
                .with_subject(algorithm);
        for table in tables {
            if table.parameters != first.parameters {
                return Err(Error::InvalidSweep(format!(
                    "table '{}' has different columns than '{}'",
                    table.title, first.title
                )));
            }
            let row = table.row(algorithm).ok_or_else(|| {
                Error::InvalidSweep(format!("table '{}' has no row for {}", table.title, algorithm))
            })?;
            summary.push_row(table.summary_label(), row.cells.clone())?;
        }
        Ok(summary)
    }

    fn header_cells(&self) -> Vec<String> {
        std::iter::once(self.header.clone())
            .chain(self.parameters.iter().map(ToString::to_string))
            .collect()
    }

    fn body_cells(&self) -> Vec<Vec<String>> {
        let precision = self.metric.precision();
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.label.clone())
                    .chain(row.cells.iter().map(|c| c.text(precision)))
                    .collect()
            })
            .collect()
    }

    /// Boxed plain-text grid: labels left-aligned, values right-aligned
    pub fn render_text(&self) -> String {
        let header = self.header_cells();
        let body = self.body_cells();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &body {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );
        let line = |cells: &[String]| {
            let parts: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    if i == 0 {
                        format!(" {:<width$} ", cell, width = width)
                    } else {
                        format!(" {:>width$} ", cell, width = width)
                    }
                })
                .collect();
            format!("|{}|", parts.join("|"))
        };

        let mut lines = Vec::new();
        lines.push(self.title.clone());
        lines.push(border.clone());
        lines.push(line(&header));
        lines.push(border.clone());
        for row in &body {
            lines.push(line(row));
        }
        lines.push(border);
        lines.join("\n")
    }

    /// GitHub-flavoured markdown table under a heading
    pub fn render_markdown(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("### {}\n", self.title));
        lines.push(format!("| {} |", self.header_cells().join(" | ")));
        lines.push(format!(
            "|{}|",
            std::iter::once("---".to_string())
                .chain(self.parameters.iter().map(|_| "---:".to_string()))
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in self.body_cells() {
            lines.push(format!("| {} |", row.join(" | ")));
        }

        lines.join("\n")
    }
}
