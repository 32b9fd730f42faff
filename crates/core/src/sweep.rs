//! Parameter sweeps: every registered algorithm measured on every parameter

use crate::data::{Measurement, Metric, Parameter};
use crate::error::{Error, Result};
use crate::harness::{Algorithm, Harness};
use crate::table::ComparisonTable;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Boxed algorithm as stored in a sweep
pub type BoxedAlgorithm<'a, I> = Box<dyn Algorithm<I> + Send + 'a>;

/// An ordered list of parameters and an ordered list of labelled algorithms
pub struct Sweep<'a, I> {
    title: String,
    subject: Option<String>,
    header: String,
    parameters: Vec<Parameter>,
    entries: Vec<(String, BoxedAlgorithm<'a, I>)>,
}

/// Everything a sweep measured, plus its tables
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub measurements: Vec<Measurement>,
    pub time: ComparisonTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<ComparisonTable>,
}

impl SweepReport {
    /// The time table followed by the memory table, if any
    pub fn tables(&self) -> impl Iterator<Item = &ComparisonTable> {
        std::iter::once(&self.time).chain(self.memory.as_ref())
    }

    pub fn failures(&self) -> usize {
        self.measurements.iter().filter(|m| m.outcome.is_err()).count()
    }
}

impl<'a, I> Sweep<'a, I> {
    /// `header` captions the label column of the resulting tables
    pub fn new(
        title: impl Into<String>,
        header: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            title: title.into(),
            subject: None,
            header: header.into(),
            parameters,
            entries: Vec::new(),
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Register an algorithm under its own name
    pub fn algorithm<A>(self, algorithm: A) -> Self
    where
        A: Algorithm<I> + Send + 'a,
    {
        let label = algorithm.name().to_string();
        self.labelled(label, algorithm)
    }

    /// Register an algorithm under an explicit row label
    pub fn labelled<A>(mut self, label: impl Into<String>, algorithm: A) -> Self
    where
        A: Algorithm<I> + Send + 'a,
    {
        self.entries.push((label.into(), Box::new(algorithm)));
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Measure every algorithm on every parameter, parameters outermost
    ///
    /// `input_for` is called once per parameter and returns a factory the
    /// harness calls for every run, so all algorithms see the same input.
    /// Failed cells are recorded and the sweep moves on.
    pub fn run<F, G>(&mut self, harness: &Harness<'_>, mut input_for: F) -> Result<SweepReport>
    where
        F: FnMut(&Parameter) -> G,
        G: Fn() -> I + Sync,
    {
        if self.parameters.is_empty() {
            return Err(Error::InvalidSweep(format!("'{}' has no parameters", self.title)));
        }
        if self.entries.is_empty() {
            return Err(Error::InvalidSweep(format!("'{}' has no algorithms", self.title)));
        }

        let mut measurements = Vec::with_capacity(self.parameters.len() * self.entries.len());
        for parameter in &self.parameters {
            info!("{}: measuring {}", self.title, parameter);
            let make_input = input_for(parameter);
            let repetitions = harness.config().repetitions_for(parameter);

            for (label, algorithm) in self.entries.iter_mut() {
                let outcome =
                    harness.measure_repeated(algorithm.as_mut(), &make_input, repetitions);
                match &outcome {
                    Ok(sample) => debug!(
                        "{} on {}: {:.6}s",
                        label,
                        parameter,
                        sample.elapsed.as_secs_f64()
                    ),
                    Err(failure) => warn!("{} on {} failed: {}", label, parameter, failure),
                }
                measurements.push(Measurement {
                    algorithm: label.clone(),
                    parameter: parameter.clone(),
                    outcome,
                });
            }
        }

        let labels = self.labels();
        let table = |metric: Metric, title: String| {
            let table = ComparisonTable::from_measurements(
                title,
                self.header.clone(),
                metric,
                &self.parameters,
                &labels,
                &measurements,
            );
            match &self.subject {
                Some(subject) => table.with_subject(subject.clone()),
                None => table,
            }
        };

        let time = table(Metric::Time, self.title.clone());
        let memory = harness
            .tracks_memory()
            .then(|| table(Metric::Memory, format!("{} (memory)", self.title)));

        Ok(SweepReport {
            measurements,
            time,
            memory,
        })
    }
}
