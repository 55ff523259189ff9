//! Command-line surface: parses drug-list arguments, runs a query workflow,
//! and hands the sorted table to a renderer.

use clap::{Parser, Subcommand};

use crate::entities::{comparison, interaction};
use crate::error::DrugInteractError;
use crate::render;
use crate::render::markdown::MetricStyle;
use crate::sources::openfda::OpenFdaClient;

#[derive(Debug, Parser)]
#[command(
    name = "druginteract",
    version,
    about = "Chart openFDA fatal adverse-event co-occurrence and interaction statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count fatal physician-reported reports naming the sample drug together
    /// with each comparison drug
    Compare {
        /// Generic name of the sample drug
        #[arg(short, long)]
        sample: String,

        /// Comma-separated generic drug names to compare against the sample
        #[arg(short, long)]
        drugs: String,

        /// Emit JSON instead of a markdown chart
        #[arg(short, long)]
        json: bool,
    },

    /// Proportion of each drug's fatal physician-reported reports where the
    /// reporter flagged the drug as interacting
    Interactions {
        /// Comma-separated generic drug names
        #[arg(short, long)]
        drugs: String,

        /// Emit JSON instead of a markdown chart
        #[arg(short, long)]
        json: bool,
    },
}

pub async fn run(cli: Cli) -> Result<String, DrugInteractError> {
    let client = OpenFdaClient::new()?;

    match cli.command {
        Commands::Compare {
            sample,
            drugs,
            json,
        } => {
            let rows = comparison::compare(&client, &sample, &drugs).await?;
            if json {
                return render::json::to_pretty(&rows);
            }
            let title = format!(
                "Fatal reports naming {} and each drug below",
                sample.trim()
            );
            render::markdown::chart(
                &title,
                "Reports",
                &comparison::chart_rows(&rows),
                MetricStyle::Count,
            )
        }
        Commands::Interactions { drugs, json } => {
            let rows = interaction::proportions(&client, &drugs).await?;
            if json {
                return render::json::to_pretty(&rows);
            }
            render::markdown::chart(
                "Proportion of fatal reports marked interacting",
                "Proportion",
                &interaction::chart_rows(&rows),
                MetricStyle::Proportion,
            )
        }
    }
}
