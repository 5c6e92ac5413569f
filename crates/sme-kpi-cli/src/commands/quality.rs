use clap::Args;
use serde_json::Value;

use sme_kpi_core::summary::data_quality_summary;

use super::DatasetArgs;

/// Arguments for the data-quality summary
#[derive(Args)]
pub struct QualityArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

pub fn run_quality(args: QualityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = args.dataset.scored_records()?;
    super::to_value(&data_quality_summary(&records))
}
