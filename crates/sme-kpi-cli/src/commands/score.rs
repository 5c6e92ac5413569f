use clap::Args;
use serde_json::Value;

use super::DatasetArgs;

/// Arguments for the full scoring run
#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Only emit rows needing attention (invalid or flagged as outliers)
    #[arg(long)]
    pub problems_only: bool,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut records = args.dataset.scored_records()?;
    if args.problems_only {
        records.retain(|r| !r.valid || r.needs_verification);
    }
    super::to_value(&records)
}
