//! Query workflows behind the CLI, and the table shape handed to renderers.

pub(crate) mod comparison;
pub(crate) mod interaction;

/// One (label, metric) row of the table a renderer receives. Tables are
/// sorted by `value` descending before they leave a workflow.
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct ChartRow {
    pub label: String,
    pub value: f64,
}

/// Splits a comma-separated drug list into trimmed tokens. Tokens that are
/// empty after trimming are dropped rather than queried as empty strings.
pub(crate) fn split_drug_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
