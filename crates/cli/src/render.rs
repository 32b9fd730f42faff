//! SVG chart rendering

use crate::error::Result;
use algo_lab_core::{ChartSpec, Scale};
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 230.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 80.0;

/// Line colors, cycled when a chart has more series
const PALETTE: [&str; 10] = [
    "#58a6ff", "#3fb950", "#f85149", "#a371f7", "#d29922",
    "#79c0ff", "#56d364", "#ff7b72", "#bc8cff", "#e3b341",
];

const CHART_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{ width }}" height="{{ height }}" viewBox="0 0 {{ width }} {{ height }}" font-family="-apple-system, 'Segoe UI', Helvetica, Arial, sans-serif">
  <rect width="100%" height="100%" fill="#0d1117"/>
  <text x="{{ width / 2 }}" y="32" text-anchor="middle" font-size="18" font-weight="600" fill="#c9d1d9">{{ title }}</text>
  <g font-size="11" fill="#8b949e">
    {% for tick in y_ticks %}
    <line x1="{{ plot.left }}" y1="{{ tick.pos }}" x2="{{ plot.right }}" y2="{{ tick.pos }}" stroke="#30363d" stroke-width="1"/>
    <text x="{{ plot.left - 8 }}" y="{{ tick.pos }}" text-anchor="end" dominant-baseline="middle">{{ tick.label }}</text>
    {% endfor %}
    {% for tick in x_ticks %}
    <line x1="{{ tick.pos }}" y1="{{ plot.top }}" x2="{{ tick.pos }}" y2="{{ plot.bottom }}" stroke="#21262d" stroke-width="1"/>
    <text x="{{ tick.pos }}" y="{{ plot.bottom + 18 }}" text-anchor="middle"{% if rotate_x %} transform="rotate(20 {{ tick.pos }} {{ plot.bottom + 18 }})"{% endif %}>{{ tick.label }}</text>
    {% endfor %}
  </g>
  <rect x="{{ plot.left }}" y="{{ plot.top }}" width="{{ plot.right - plot.left }}" height="{{ plot.bottom - plot.top }}" fill="none" stroke="#6e7681"/>
  <text x="{{ (plot.left + plot.right) / 2 }}" y="{{ height - 20 }}" text-anchor="middle" font-size="13" fill="#c9d1d9">{{ x_label }}{% if x_log %} (log){% endif %}</text>
  <text x="22" y="{{ (plot.top + plot.bottom) / 2 }}" text-anchor="middle" font-size="13" fill="#c9d1d9" transform="rotate(-90 22 {{ (plot.top + plot.bottom) / 2 }})">{{ y_label }}{% if y_log %} (log){% endif %}</text>
  {% for line in series %}
  <g stroke="{{ line.color }}" fill="{{ line.color }}">
    {% if line.points | length > 1 %}<polyline points="{{ line.path }}" fill="none" stroke-width="2"/>{% endif %}
    {% for point in line.points %}<circle cx="{{ point.x }}" cy="{{ point.y }}" r="3.5"/>{% endfor %}
  </g>
  {% endfor %}
  <g font-size="12" fill="#c9d1d9">
    {% for line in series %}
    <line x1="{{ plot.right + 20 }}" y1="{{ line.legend_y }}" x2="{{ plot.right + 44 }}" y2="{{ line.legend_y }}" stroke="{{ line.color }}" stroke-width="3"/>
    <text x="{{ plot.right + 52 }}" y="{{ line.legend_y }}" dominant-baseline="middle">{{ line.label }}</text>
    {% endfor %}
  </g>
</svg>
"##;

#[derive(Debug, Clone, Copy, Serialize)]
struct Plot {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Tick {
    pos: f64,
    label: String,
}

#[derive(Debug, Clone, Serialize)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Serialize)]
struct Line {
    label: String,
    color: &'static str,
    path: String,
    points: Vec<Point>,
    legend_y: f64,
}

/// Maps data values onto a pixel range
#[derive(Debug, Clone, Copy)]
struct Axis {
    scale: Scale,
    min: f64,
    max: f64,
    from: f64,
    to: f64,
}

impl Axis {
    /// Axis covering `values`, widened when they collapse to a single point
    fn fit(values: impl Iterator<Item = f64>, scale: Scale, from: f64, to: f64) -> Axis {
        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        match scale {
            Scale::Log => {
                min = 10f64.powf(min.log10().floor());
                max = 10f64.powf(max.log10().ceil());
                if max <= min {
                    max = min * 10.0;
                }
            }
            Scale::Linear => {
                if max <= min {
                    min -= 1.0;
                    max += 1.0;
                }
            }
        }
        Axis {
            scale,
            min,
            max,
            from,
            to,
        }
    }

    fn project(&self, value: f64) -> f64 {
        let fraction = match self.scale {
            Scale::Linear => (value - self.min) / (self.max - self.min),
            Scale::Log => {
                (value.log10() - self.min.log10()) / (self.max.log10() - self.min.log10())
            }
        };
        round(self.from + fraction * (self.to - self.from))
    }

    fn ticks(&self) -> Vec<Tick> {
        match self.scale {
            Scale::Log => {
                let first = self.min.log10().round() as i32;
                let last = self.max.log10().round() as i32;
                (first..=last)
                    .map(|exp| {
                        let value = 10f64.powi(exp);
                        Tick {
                            pos: self.project(value),
                            label: power_of_ten_label(exp),
                        }
                    })
                    .collect()
            }
            Scale::Linear => {
                let step = nice_step((self.max - self.min) / 5.0);
                let decimals = if step >= 1.0 {
                    0
                } else {
                    (-step.log10()).ceil() as usize
                };
                let mut ticks = Vec::new();
                let mut value = (self.min / step).ceil() * step;
                while value <= self.max + step * 1e-9 {
                    ticks.push(Tick {
                        pos: self.project(value),
                        label: format!("{:.*}", decimals, value),
                    });
                    value += step;
                }
                ticks
            }
        }
    }
}

fn round(px: f64) -> f64 {
    (px * 10.0).round() / 10.0
}

/// 1, 2 or 5 times a power of ten, at least `raw`
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn power_of_ten_label(exp: i32) -> String {
    match exp {
        -3..=-1 => format!("{:.*}", exp.unsigned_abs() as usize, 10f64.powi(exp)),
        0..=4 => 10u32.pow(exp.unsigned_abs()).to_string(),
        _ => format!("1e{}", exp),
    }
}

/// Render a chart to a standalone SVG document
pub fn render_chart(chart: &ChartSpec) -> Result<String> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template("chart", CHART_TEMPLATE)?;
    let template = env.get_template("chart")?;

    let plot = Plot {
        left: MARGIN_LEFT,
        right: WIDTH - MARGIN_RIGHT,
        top: MARGIN_TOP,
        bottom: HEIGHT - MARGIN_BOTTOM,
    };

    let x_scale = chart.x_scale();
    let y_scale = chart.value_scale();
    let x_axis = match &chart.categories {
        Some(categories) => Axis::fit(
            [-0.5, categories.len() as f64 - 0.5].into_iter(),
            Scale::Linear,
            plot.left,
            plot.right,
        ),
        None => Axis::fit(chart.xs(), x_scale, plot.left, plot.right),
    };
    let y_axis = Axis::fit(chart.values(), y_scale, plot.bottom, plot.top);

    let x_ticks = match &chart.categories {
        Some(categories) => categories
            .iter()
            .enumerate()
            .map(|(index, label)| Tick {
                pos: x_axis.project(index as f64),
                label: label.clone(),
            })
            .collect(),
        None => x_axis.ticks(),
    };

    let series: Vec<Line> = chart
        .series
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let points: Vec<Point> = s
                .points
                .iter()
                .map(|&(x, y)| Point {
                    x: x_axis.project(x),
                    y: y_axis.project(y),
                })
                .collect();
            let path = points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            Line {
                label: s.label.clone(),
                color: PALETTE[index % PALETTE.len()],
                path,
                points,
                legend_y: plot.top + 10.0 + index as f64 * 22.0,
            }
        })
        .collect();

    let svg = template.render(context! {
        width => WIDTH,
        height => HEIGHT,
        title => &chart.title,
        x_label => &chart.x_label,
        y_label => &chart.y_label,
        x_log => x_scale == Scale::Log,
        y_log => y_scale == Scale::Log,
        rotate_x => chart.categories.is_some(),
        plot => plot,
        x_ticks => x_ticks,
        y_ticks => y_axis.ticks(),
        series => series,
    })?;

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_lab_core::{Cell, ComparisonTable, Metric, Parameter};
    use pretty_assertions::assert_eq;

    fn table(values: &[f64]) -> ComparisonTable {
        let sizes: Vec<u64> = (1..=values.len() as u64).map(|i| i * 10).collect();
        let mut table = ComparisonTable::new(
            "Sorting",
            "Sorting Algorithm",
            Metric::Time,
            Parameter::sizes(&sizes),
        );
        table
            .push_row("Merge Sort", values.iter().map(|v| Cell::Value(*v)).collect())
            .unwrap();
        table
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.3), 0.5);
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(13.0), 20.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_log_ticks_are_decades() {
        let axis = Axis::fit([0.002, 3.0].into_iter(), Scale::Log, 0.0, 100.0);
        let labels: Vec<String> = axis.ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["0.001", "0.01", "0.1", "1", "10"]);
        assert_eq!(axis.project(0.001), 0.0);
        assert_eq!(axis.project(10.0), 100.0);
    }

    #[test]
    fn test_single_value_axis_is_widened() {
        let axis = Axis::fit([5.0].into_iter(), Scale::Linear, 0.0, 100.0);
        assert_eq!(axis.project(5.0), 50.0);
        assert!(!axis.ticks().is_empty());
    }

    #[test]
    fn test_render_chart() {
        let chart =
            ChartSpec::single(&table(&[0.001, 0.01, 0.5]), "Merge Sort", "Input Size").unwrap();
        let svg = render_chart(&chart).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Sorting: Merge Sort"));
        assert!(svg.contains("<polyline"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("Execution Time (s) (log)"));
    }

    #[test]
    fn test_render_escapes_labels() {
        let mut table = table(&[1.0, 2.0]);
        table.title = "a < b".to_string();
        let chart = ChartSpec::overlay(&table, "a < b", "n").unwrap();
        let svg = render_chart(&chart).unwrap();
        assert!(svg.contains("a &lt; b"));
    }

    #[test]
    fn test_render_categories() {
        let mut table = ComparisonTable::new(
            "Quick Sort",
            "Pattern",
            Metric::Time,
            Parameter::patterns(&["Random Integers", "Already Sorted Integers"]),
        );
        table.push_row("Quick Sort", vec![Cell::Value(1.0), Cell::Value(2.0)]).unwrap();
        let chart = ChartSpec::single(&table, "Quick Sort", "Pattern").unwrap();
        let svg = render_chart(&chart).unwrap();
        assert!(svg.contains("Already Sorted Integers"));
        assert!(svg.contains("rotate(20"));
    }
}
