//! Interaction proportions: for each drug, the share of its fatal
//! physician-reported FAERS reports where the reporter flagged the drug as
//! interacting.

use serde::Serialize;
use tracing::debug;

use crate::entities::{ChartRow, split_drug_list};
use crate::error::DrugInteractError;
use crate::sources::openfda::OpenFdaClient;
use crate::utils::query::EventQuery;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct InteractionRow {
    pub drug: String,
    pub total_reports: usize,
    pub interacting_reports: usize,
    pub proportion: f64,
}

/// For each drug: one request for the total fatal physician-reported count,
/// and, only when that total is nonzero, a second request restricted to the
/// interacting characterization. A zero total short-circuits to proportion 0
/// without the second request. Rows come back sorted by proportion
/// descending (ties keep input order).
pub(crate) async fn proportions(
    client: &OpenFdaClient,
    drugs: &str,
) -> Result<Vec<InteractionRow>, DrugInteractError> {
    let mut rows = Vec::new();
    for drug in split_drug_list(drugs) {
        let base = EventQuery::fatal_physician_reported().generic_name(&drug);

        let total_reports = client.event_total(&base.build()).await?;
        if total_reports == 0 {
            debug!(drug = drug.as_str(), "no fatal reports; proportion is zero");
            rows.push(InteractionRow {
                drug,
                total_reports: 0,
                interacting_reports: 0,
                proportion: 0.0,
            });
            continue;
        }

        let interacting_reports = client.event_total(&base.interacting().build()).await?;
        let proportion = interacting_reports as f64 / total_reports as f64;
        debug!(
            drug = drug.as_str(),
            total_reports, interacting_reports, "interaction proportion"
        );
        rows.push(InteractionRow {
            drug,
            total_reports,
            interacting_reports,
            proportion,
        });
    }

    rows.sort_by(|a, b| b.proportion.total_cmp(&a.proportion));
    Ok(rows)
}

pub(crate) fn chart_rows(rows: &[InteractionRow]) -> Vec<ChartRow> {
    rows.iter()
        .map(|row| ChartRow {
            label: row.drug.clone(),
            value: row.proportion,
        })
        .collect()
}
