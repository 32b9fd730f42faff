//! Measurement harness: times an algorithm on freshly built inputs and
//! optionally measures its peak heap usage in a second, isolated run

use crate::data::{Parameter, Sample};
use crate::error::{Error, Failure, Result};
use crate::memory::MemoryProbe;
use std::any::Any;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default stack for the measuring thread, large enough for deep recursion
pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

const MIN_STACK_SIZE: usize = 64 * 1024;

/// Something the harness can measure
///
/// Every invocation gets a freshly built input which `run` may modify in
/// place. The harness owns it and drops it once the clock has stopped.
/// Implementations that keep state between calls (caches) must clear it in
/// `reset`, which the harness calls before every run.
pub trait Algorithm<I> {
    /// Label used for table rows and chart legends
    fn name(&self) -> &str;

    /// Run once on the given input
    fn run(&mut self, input: &mut I) -> std::result::Result<(), Failure>;

    /// Drop any state carried over from a previous run
    fn reset(&mut self) {}
}

/// Configuration for the measurement harness
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Runs averaged per cell
    pub repetitions: u32,
    /// Inputs of at least this size run once regardless of `repetitions`
    pub large_input_threshold: Option<u64>,
    /// Measure peak memory in an extra isolated run
    pub track_memory: bool,
    /// Stack size of the thread the measured calls run on
    pub stack_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repetitions: 1,
            large_input_threshold: None,
            track_memory: false,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl HarnessConfig {
    /// Check the configuration before any sweep uses it
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::ConfigError(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if self.stack_size < MIN_STACK_SIZE {
            return Err(Error::ConfigError(format!(
                "stack size must be at least {} bytes, got {}",
                MIN_STACK_SIZE, self.stack_size
            )));
        }
        Ok(())
    }

    /// How many timed runs a cell with this parameter gets
    pub fn repetitions_for(&self, parameter: &Parameter) -> u32 {
        match (parameter.size(), self.large_input_threshold) {
            (Some(n), Some(threshold)) if n >= threshold => 1,
            _ => self.repetitions,
        }
    }
}

/// Runs algorithms under measurement
pub struct Harness<'p> {
    config: HarnessConfig,
    probe: Option<&'p dyn MemoryProbe>,
}

impl<'p> Harness<'p> {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            probe: None,
        })
    }

    /// Attach the probe used for memory measurements
    pub fn with_memory_probe(mut self, probe: &'p dyn MemoryProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Whether samples produced by this harness carry a peak memory value
    pub fn tracks_memory(&self) -> bool {
        self.config.track_memory && self.probe.is_some()
    }

    /// Measure with the configured number of repetitions
    pub fn measure<I, A, F>(
        &self,
        algorithm: &mut A,
        make_input: F,
    ) -> std::result::Result<Sample, Failure>
    where
        A: Algorithm<I> + Send + ?Sized,
        F: Fn() -> I + Sync,
    {
        self.measure_repeated(algorithm, make_input, self.config.repetitions)
    }

    /// Measure, averaging the elapsed time over `repetitions` runs
    ///
    /// The first failing run ends the measurement. Building and dropping the
    /// input both happen outside the timed region.
    pub fn measure_repeated<I, A, F>(
        &self,
        algorithm: &mut A,
        make_input: F,
        repetitions: u32,
    ) -> std::result::Result<Sample, Failure>
    where
        A: Algorithm<I> + Send + ?Sized,
        F: Fn() -> I + Sync,
    {
        let repetitions = repetitions.max(1);
        let probe = if self.config.track_memory { self.probe } else { None };
        let make_input = &make_input;

        self.on_worker(move || {
            let mut total = Duration::ZERO;
            for _ in 0..repetitions {
                algorithm.reset();
                let mut input = make_input();
                let start = Instant::now();
                let outcome = algorithm.run(&mut input);
                let elapsed = start.elapsed();
                drop(input);
                outcome?;
                total += elapsed;
            }
            let elapsed = total / repetitions;

            let peak_memory_kib = match probe {
                Some(probe) => {
                    algorithm.reset();
                    let mut input = make_input();
                    let mark = probe.mark();
                    algorithm.run(&mut input)?;
                    let bytes = probe.peak_since(&mark);
                    drop(input);
                    debug!("{}: peak {} bytes above baseline", algorithm.name(), bytes);
                    Some(bytes as f64 / 1024.0)
                }
                None => None,
            };

            Ok(Sample {
                elapsed,
                peak_memory_kib,
            })
        })
    }

    fn on_worker<R, F>(&self, body: F) -> std::result::Result<R, Failure>
    where
        F: FnOnce() -> std::result::Result<R, Failure> + Send,
        R: Send,
    {
        let stack_size = self.config.stack_size;
        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("algo-lab-measure".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, body)
                .map_err(|_| Failure::AllocationFailed { bytes: stack_size })?;

            match handle.join() {
                Ok(outcome) => outcome,
                Err(payload) => Err(Failure::Panicked(panic_message(payload))),
            }
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "algorithm panicked".to_string()
    }
}
