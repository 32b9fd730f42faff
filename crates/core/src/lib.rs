//! algo-lab-core - Algorithms, input generators and the measurement harness
//! behind the algo-lab comparison labs
//!
//! # Features
//!
//! - Fibonacci methods, comparison sorts and graph algorithms
//! - Input generators: sorting patterns, visualizer presets, graph shapes
//! - A harness timing algorithms (and optionally their peak heap usage) with
//!   typed per-run failures
//! - Comparison tables and the chart extraction policy
//! - Sorting step machines for the visualizer

pub mod chart;
pub mod data;
pub mod error;
pub mod fibonacci;
pub mod graph;
pub mod harness;
pub mod memory;
pub mod patterns;
pub mod sorting;
pub mod stepper;
pub mod sweep;
pub mod table;

pub use chart::{choose_scale, series_from_table, ChartSpec, Scale, Series};
pub use data::{Measurement, Metric, Parameter, Sample};
pub use error::{Error, Failure, Result};
pub use fibonacci::{FibonacciAlgorithm, Method, RecursionBudget};
pub use graph::{Graph, GraphAlgorithm, GraphCase, GraphType};
pub use harness::{Algorithm, Harness, HarnessConfig};
pub use memory::{MemoryProbe, PeakAllocator};
pub use patterns::{Pattern, Preset};
pub use sorting::SortAlgorithm;
pub use stepper::{Frame, Stepper};
pub use sweep::{Sweep, SweepReport};
pub use table::{Cell, ComparisonTable, TableRow};
