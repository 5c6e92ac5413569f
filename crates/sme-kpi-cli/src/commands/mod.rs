pub mod quality;
pub mod report;
pub mod score;
pub mod sectors;
pub mod top;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use sme_kpi_core::pipeline::{self, PipelineOptions};
use sme_kpi_core::{BusinessRecord, ScoreWeights};

use crate::input;

/// Dataset and scoring flags shared by every command.
#[derive(Args)]
pub struct DatasetArgs {
    /// Path to the dataset (.csv, or .json with {headers, rows} or an
    /// array of flat objects). Falls back to piped JSON on stdin.
    #[arg(long)]
    pub input: Option<String>,

    /// Weight for the ROI score
    #[arg(long, default_value = "0.40")]
    pub w_roi: Decimal,

    /// Weight for the profit-margin score
    #[arg(long, default_value = "0.35")]
    pub w_margin: Decimal,

    /// Weight for the growth score
    #[arg(long, default_value = "0.25")]
    pub w_growth: Decimal,

    /// Lower clipping quantile for normalization
    #[arg(long, default_value = "0.05")]
    pub low_quantile: Decimal,

    /// Upper clipping quantile for normalization
    #[arg(long, default_value = "0.95")]
    pub high_quantile: Decimal,
}

impl DatasetArgs {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            weights: ScoreWeights {
                roi: self.w_roi,
                margin: self.w_margin,
                growth: self.w_growth,
            },
            low_quantile: self.low_quantile,
            high_quantile: self.high_quantile,
            ..PipelineOptions::default()
        }
    }

    /// Load the dataset and run the full pipeline.
    pub fn scored_records(&self) -> Result<Vec<BusinessRecord>, Box<dyn std::error::Error>> {
        let table = input::load_table(self.input.as_deref())?;
        let records = pipeline::run(&table, &self.pipeline_options())?;
        Ok(records)
    }
}

pub fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(value)?)
}
