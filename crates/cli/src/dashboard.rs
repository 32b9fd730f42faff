//! HTML dashboard for a lab: every table plus the charts written next to it

use crate::error::Result;
use crate::file_manager::write_file;
use algo_lab_core::{Cell, ComparisonTable};
use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use std::path::{Path, PathBuf};

/// HTML template for a lab dashboard
const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <style>
        :root {
            --bg-primary: #0d1117;
            --bg-secondary: #161b22;
            --bg-tertiary: #21262d;
            --text-primary: #c9d1d9;
            --text-secondary: #8b949e;
            --text-muted: #6e7681;
            --border-color: #30363d;
            --accent-blue: #58a6ff;
            --accent-red: #f85149;
            --accent-purple: #a371f7;
        }

        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container {
            max-width: 1400px;
            margin: 0 auto;
            padding: 2rem;
        }

        header {
            text-align: center;
            margin-bottom: 3rem;
            padding: 2rem;
            background: linear-gradient(135deg, var(--bg-secondary) 0%, var(--bg-tertiary) 100%);
            border-radius: 16px;
            border: 1px solid var(--border-color);
        }

        h1 {
            font-size: 2.25rem;
            font-weight: 600;
            background: linear-gradient(135deg, var(--accent-blue) 0%, var(--accent-purple) 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
        }

        .generated {
            color: var(--text-muted);
            font-size: 0.9rem;
            margin-top: 1rem;
        }

        .lab-table {
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            margin-bottom: 2rem;
            overflow-x: auto;
        }

        .lab-table h2 {
            font-size: 1.15rem;
            font-weight: 600;
            padding: 1rem 1.5rem;
            background: var(--bg-tertiary);
            border-bottom: 1px solid var(--border-color);
        }

        table {
            width: 100%;
            border-collapse: collapse;
        }

        th, td {
            padding: 0.6rem 1rem;
            text-align: right;
            border-top: 1px solid var(--border-color);
            font-family: 'SF Mono', 'Fira Code', monospace;
            font-size: 0.85rem;
        }

        th {
            color: var(--text-secondary);
            font-weight: 500;
        }

        th:first-child, td:first-child {
            text-align: left;
            color: var(--accent-blue);
        }

        td.failed {
            color: var(--accent-red);
        }

        .charts {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(560px, 1fr));
            gap: 1.5rem;
        }

        .charts figure {
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            padding: 1rem;
        }

        .charts img {
            width: 100%;
        }

        .charts figcaption {
            color: var(--text-secondary);
            font-size: 0.85rem;
            text-align: center;
        }

        .no-data {
            text-align: center;
            padding: 3rem;
            color: var(--text-muted);
        }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{{ title }}</h1>
            <p class="generated">Generated: {{ generated_at }}</p>
        </header>

        {% if tables %}
            {% for table in tables %}
            <section class="lab-table">
                <h2>{{ table.title }}</h2>
                <table>
                    <thead>
                        <tr>
                            {% for cell in table.header %}<th>{{ cell }}</th>{% endfor %}
                        </tr>
                    </thead>
                    <tbody>
                        {% for row in table.rows %}
                        <tr>
                            <td>{{ row.label }}</td>
                            {% for cell in row.cells %}<td{% if cell.failed %} class="failed"{% endif %}>{{ cell.text }}</td>{% endfor %}
                        </tr>
                        {% endfor %}
                    </tbody>
                </table>
            </section>
            {% endfor %}
        {% else %}
            <div class="no-data">
                <p>No measurements recorded.</p>
            </div>
        {% endif %}

        {% if charts %}
        <section class="charts">
            {% for chart in charts %}
            <figure>
                <img src="{{ chart.file }}" alt="{{ chart.title }}">
                <figcaption>{{ chart.title }}</figcaption>
            </figure>
            {% endfor %}
        </section>
        {% endif %}
    </div>
</body>
</html>
"#;

/// A chart file already written next to the dashboard
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChartLink {
    pub title: String,
    /// File name relative to the dashboard
    pub file: String,
}

#[derive(Debug, Clone, serde::Serialize)]
struct TableData {
    title: String,
    header: Vec<String>,
    rows: Vec<RowData>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct RowData {
    label: String,
    cells: Vec<CellData>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct CellData {
    text: String,
    failed: bool,
}

impl From<&ComparisonTable> for TableData {
    fn from(table: &ComparisonTable) -> Self {
        let precision = table.metric.precision();
        TableData {
            title: table.title.clone(),
            header: std::iter::once(table.header.clone())
                .chain(table.parameters.iter().map(ToString::to_string))
                .collect(),
            rows: table
                .rows
                .iter()
                .map(|row| RowData {
                    label: row.label.clone(),
                    cells: row
                        .cells
                        .iter()
                        .map(|cell| CellData {
                            text: cell.text(precision),
                            failed: matches!(cell, Cell::Failed(_)),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Generate the HTML dashboard
pub fn generate_dashboard(
    title: &str,
    tables: &[ComparisonTable],
    charts: &[ChartLink],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;

    let template = env.get_template("dashboard.html")?;
    let tables: Vec<TableData> = tables.iter().map(TableData::from).collect();

    let html = template.render(context! {
        title => title,
        generated_at => generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        tables => tables,
        charts => charts,
    })?;

    Ok(html)
}

/// Write `index.html` into the lab directory
pub fn write_dashboard(
    dir: &Path,
    title: &str,
    tables: &[ComparisonTable],
    charts: &[ChartLink],
) -> Result<PathBuf> {
    let html = generate_dashboard(title, tables, charts, Utc::now())?;
    write_file(dir, "index.html", &html)
}
