//! Report-count comparison: fatal reports naming a sample drug together with
//! each drug from a comparison list.

use serde::Serialize;
use tracing::debug;

use crate::entities::{ChartRow, split_drug_list};
use crate::error::DrugInteractError;
use crate::sources::openfda::OpenFdaClient;
use crate::utils::query::EventQuery;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CoReportRow {
    pub drug: String,
    pub reports: usize,
}

/// For each comparison drug, counts the fatal physician-reported FAERS
/// reports naming both it and `sample`. One request per comparison drug,
/// issued sequentially; rows come back sorted by count descending (ties keep
/// input order).
pub(crate) async fn compare(
    client: &OpenFdaClient,
    sample: &str,
    comparisons: &str,
) -> Result<Vec<CoReportRow>, DrugInteractError> {
    let sample = sample.trim();

    let mut rows = Vec::new();
    for drug in split_drug_list(comparisons) {
        let search = EventQuery::fatal_physician_reported()
            .generic_name(sample)
            .generic_name(&drug)
            .build();
        let reports = client.event_total(&search).await?;
        debug!(sample, drug = drug.as_str(), reports, "co-report count");
        rows.push(CoReportRow { drug, reports });
    }

    rows.sort_by(|a, b| b.reports.cmp(&a.reports));
    Ok(rows)
}

pub(crate) fn chart_rows(rows: &[CoReportRow]) -> Vec<ChartRow> {
    rows.iter()
        .map(|row| ChartRow {
            label: row.drug.clone(),
            value: row.reports as f64,
        })
        .collect()
}
