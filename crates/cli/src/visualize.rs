//! Terminal sorting visualizer driving a [`Stepper`] one frame at a time

use crate::error::{Error, Result};
use algo_lab_core::{Frame, Preset, SortAlgorithm, Stepper};
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Bar heights in rows
pub const CHART_ROWS: usize = 16;

const HIGHLIGHTED: char = '#';
const FINALIZED: char = '=';
const PENDING: char = '|';

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What to sort and how fast to animate it
#[derive(Debug, Clone)]
pub struct VisualizeOptions {
    pub algorithm: SortAlgorithm,
    pub preset: Preset,
    pub size: usize,
    pub min: i64,
    pub max: i64,
    pub delay: Duration,
    /// Stop after this many frames even if the array is not sorted yet
    pub max_frames: Option<usize>,
    /// Redraw in place instead of printing frames one after another
    pub clear: bool,
}

/// Draw the array as vertical bars, tallest value at the top row
///
/// Highlighted indices take precedence over finalized ones.
pub fn render_frame(stepper: &Stepper, frame: &Frame) -> String {
    let values = stepper.values();
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = hi - lo;
    let heights: Vec<usize> = values
        .iter()
        .map(|v| {
            if span > 0.0 {
                1 + ((v - lo) / span * (CHART_ROWS - 1) as f64).round() as usize
            } else {
                CHART_ROWS
            }
        })
        .collect();
    let marks: Vec<char> = (0..values.len())
        .map(|i| {
            if frame.highlighted.contains(&i) {
                HIGHLIGHTED
            } else if stepper.finalized().contains(&i) {
                FINALIZED
            } else {
                PENDING
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(CHART_ROWS + 2);
    for row in (1..=CHART_ROWS).rev() {
        let line: String = heights
            .iter()
            .zip(&marks)
            .map(|(height, mark)| if *height >= row { *mark } else { ' ' })
            .collect();
        lines.push(line.trim_end().to_string());
    }
    lines.push("-".repeat(values.len()));
    lines.push(format!(
        "{} | step {} | finalized {}/{}{}",
        stepper.algorithm(),
        stepper.steps(),
        frame.finalized_len,
        values.len(),
        if frame.done { " | done" } else { "" }
    ));
    lines.join("\n")
}

/// Animate one sort on `out`, returning the number of frames drawn
pub fn run<R: Rng + ?Sized, W: Write>(
    options: &VisualizeOptions,
    rng: &mut R,
    out: &mut W,
) -> Result<usize> {
    let values = options
        .preset
        .generate(options.size, options.min, options.max, rng)?;
    info!(
        "Visualizing {} on {} {} values in [{}, {}]",
        options.algorithm, options.size, options.preset, options.min, options.max
    );

    let mut stepper = Stepper::new(options.algorithm, values);
    let mut frames = 0;
    loop {
        let frame = stepper.step();
        frames += 1;
        if options.clear {
            write!(out, "{}", CLEAR_SCREEN).map_err(Error::Terminal)?;
        }
        writeln!(out, "{}", render_frame(&stepper, &frame)).map_err(Error::Terminal)?;
        out.flush().map_err(Error::Terminal)?;

        if frame.done {
            break;
        }
        if options.max_frames.is_some_and(|max| frames >= max) {
            debug!("Stopped after {} frames", frames);
            break;
        }
        if !options.delay.is_zero() {
            std::thread::sleep(options.delay);
        }
    }

    info!("{} finished in {} steps", options.algorithm, stepper.steps());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    fn options(algorithm: SortAlgorithm) -> VisualizeOptions {
        VisualizeOptions {
            algorithm,
            preset: Preset::Random,
            size: 12,
            min: -10,
            max: 100,
            delay: Duration::ZERO,
            max_frames: None,
            clear: false,
        }
    }

    #[test]
    fn test_render_frame() {
        let mut stepper = Stepper::new(SortAlgorithm::Insertion, vec![3.0, 1.0, 2.0]);
        let frame = stepper.step();
        let text = render_frame(&stepper, &frame);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), CHART_ROWS + 2);
        // only the tallest value reaches the top row
        assert_eq!(lines[0].chars().filter(|c| *c != ' ').count(), 1);
        // every bar reaches the bottom row
        assert_eq!(lines[CHART_ROWS - 1].chars().filter(|c| *c != ' ').count(), 3);
        assert_eq!(lines[CHART_ROWS], "---");
        assert!(lines[CHART_ROWS + 1].starts_with("Insertion Sort | step 1"));
    }

    #[test]
    fn test_equal_values_fill_the_chart() {
        let mut stepper = Stepper::new(SortAlgorithm::Heap, vec![5.0; 4]);
        let frame = stepper.step();
        let text = render_frame(&stepper, &frame);
        assert_eq!(text.lines().next().unwrap().chars().count(), 4);
    }

    #[test]
    fn test_run_until_sorted() {
        for algorithm in SortAlgorithm::ALL {
            let mut out = Vec::new();
            let mut rng = StdRng::seed_from_u64(9);
            let frames = run(&options(algorithm), &mut rng, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();

            assert!(frames > 1, "{}", algorithm);
            assert!(text.trim_end().ends_with("| done"), "{}", algorithm);
            assert!(text.contains("finalized 12/12"), "{}", algorithm);
            assert!(!text.contains(CLEAR_SCREEN));
        }
    }

    #[test]
    fn test_max_frames() {
        let mut opts = options(SortAlgorithm::Merge);
        opts.max_frames = Some(3);
        let mut out = Vec::new();
        let frames = run(&opts, &mut StdRng::seed_from_u64(1), &mut out).unwrap();
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_invalid_range() {
        let mut opts = options(SortAlgorithm::Quick);
        opts.min = 10;
        opts.max = 0;
        let mut out = Vec::new();
        assert!(run(&opts, &mut StdRng::seed_from_u64(1), &mut out).is_err());
    }
}
