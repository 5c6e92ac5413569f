use chrono::{Local, NaiveDate};
use clap::Args;
use colored::Colorize;
use serde_json::{json, Value};
use std::fs;

use sme_kpi_core::report::build_report;

use super::DatasetArgs;

/// Arguments for the printable summary report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Rows in the best/attention tables
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Report date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Also write the rendered report to this file
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = args.dataset.scored_records()?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let report = build_report(&records, as_of, args.top);
    let rendered = report.render_text();

    // file-write failure is recoverable; the report still goes to stdout
    if let Some(path) = &args.out {
        match fs::write(path, &rendered) {
            Ok(()) => eprintln!("report written to {path}"),
            Err(e) => eprintln!(
                "{}: could not write report to {}: {}",
                "warning".yellow().bold(),
                path,
                e
            ),
        }
    }

    Ok(json!({
        "rendered": rendered,
        "report": report,
    }))
}
