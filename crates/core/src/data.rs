//! Data structures shared by the harness, the sweep runner and the tables

use crate::error::Failure;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A single sweep point: an input size or a named input pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    Size(u64),
    Pattern(String),
}

impl Parameter {
    /// The input size, if this is a size parameter
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::Size(n) => Some(*n),
            Self::Pattern(_) => None,
        }
    }

    /// Build a sweep list out of plain sizes
    pub fn sizes(sizes: &[u64]) -> Vec<Parameter> {
        sizes.iter().copied().map(Parameter::Size).collect()
    }

    /// Build a sweep list out of pattern names
    pub fn patterns<S: AsRef<str>>(names: &[S]) -> Vec<Parameter> {
        names.iter().map(|n| Parameter::Pattern(n.as_ref().to_string())).collect()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(n) => write!(f, "{}", n),
            Self::Pattern(name) => write!(f, "{}", name),
        }
    }
}

/// What a single successful measured cell produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Wall-clock time of the run (averaged over repetitions)
    pub elapsed: Duration,
    /// Peak heap usage above the pre-run baseline, in KiB, from an isolated run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_memory_kib: Option<f64>,
}

/// Outcome of measuring one algorithm on one sweep parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Algorithm label, as registered in the sweep
    pub algorithm: String,
    /// Sweep parameter this cell belongs to
    pub parameter: Parameter,
    /// Either the sample or the reason there is none
    pub outcome: Result<Sample, Failure>,
}

impl Measurement {
    /// Value of this cell for the given metric
    pub fn value(&self, metric: Metric) -> Result<f64, Failure> {
        let sample = self.outcome.as_ref().map_err(Clone::clone)?;
        match metric {
            Metric::Time => Ok(sample.elapsed.as_secs_f64()),
            Metric::Memory => sample
                .peak_memory_kib
                .ok_or_else(|| Failure::Unsupported("memory was not tracked".to_string())),
        }
    }
}

/// Which quantity a comparison table holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Time,
    Memory,
}

impl Metric {
    /// Number of decimals used when formatting cells
    pub fn precision(&self) -> usize {
        match self {
            Self::Time => 6,
            Self::Memory => 2,
        }
    }

    /// Axis / column caption
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Time => "Execution Time (s)",
            Self::Memory => "Peak Memory (KiB)",
        }
    }
}
