//! Markdown bar charts for the sorted (drug, metric) tables the workflows
//! produce.

use std::sync::OnceLock;

use minijinja::{Environment, context};

use crate::entities::ChartRow;
use crate::error::DrugInteractError;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricStyle {
    Count,
    Proportion,
}

impl MetricStyle {
    fn display(self, value: f64) -> String {
        match self {
            Self::Count => format!("{}", value.round() as u64),
            Self::Proportion => format!("{value:.3}"),
        }
    }
}

#[derive(serde::Serialize)]
struct BarRow {
    label: String,
    display: String,
    bar: String,
}

fn env() -> Result<&'static Environment<'static>, DrugInteractError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_template("chart.md.j2", include_str!("../../templates/chart.md.j2"))?;

    let _ = ENV.set(env);
    Ok(ENV
        .get()
        .expect("ENV should be initialized by the time this is reached"))
}

// Bar length is scaled to the column maximum; any nonzero metric gets at
// least one cell so it stays distinguishable from zero.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}

pub(crate) fn chart(
    title: &str,
    metric_header: &str,
    rows: &[ChartRow],
    style: MetricStyle,
) -> Result<String, DrugInteractError> {
    let max = rows.iter().map(|row| row.value).fold(0.0_f64, f64::max);
    let rows = rows
        .iter()
        .map(|row| BarRow {
            label: row.label.clone(),
            display: style.display(row.value),
            bar: bar(row.value, max),
        })
        .collect::<Vec<_>>();

    let tmpl = env()?.get_template("chart.md.j2")?;
    Ok(tmpl.render(context! { title, metric_header, rows })?)
}
