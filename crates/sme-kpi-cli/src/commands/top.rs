use clap::Args;
use serde_json::Value;

use sme_kpi_core::summary::{bottom_performers, top_performers};

use super::DatasetArgs;

/// Arguments for the best/worst ranking
#[derive(Args)]
pub struct TopArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// How many businesses to list
    #[arg(long, default_value = "10")]
    pub count: usize,

    /// Rank worst first instead of best first
    #[arg(long)]
    pub worst: bool,
}

pub fn run_top(args: TopArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = args.dataset.scored_records()?;
    let ranked = if args.worst {
        bottom_performers(&records, args.count)
    } else {
        top_performers(&records, args.count)
    };
    super::to_value(&ranked)
}
