use clap::Args;
use serde_json::{json, Value};

use sme_kpi_core::summary::{program_priorities, sector_insights, sector_summary};

use super::DatasetArgs;

/// Arguments for sector rollups
#[derive(Args)]
pub struct SectorsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Also emit headline insights and program priorities
    #[arg(long)]
    pub insights: bool,
}

pub fn run_sectors(args: SectorsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = args.dataset.scored_records()?;
    let sectors = sector_summary(&records);

    if !args.insights {
        return super::to_value(&sectors);
    }

    Ok(json!({
        "sectors": sectors,
        "insights": sector_insights(&sectors),
        "priorities": program_priorities(&sectors),
    }))
}
