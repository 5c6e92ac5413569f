mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::quality::QualityArgs;
use commands::report::ReportArgs;
use commands::score::ScoreArgs;
use commands::sectors::SectorsArgs;
use commands::top::TopArgs;

/// Small-business KPI scoring and reporting
#[derive(Parser)]
#[command(
    name = "smekpi",
    version,
    about = "Small-business KPI scoring and reporting",
    long_about = "Scores a tabular dataset of small businesses: derives ROI, profit \
                  margin, and revenue growth, normalizes them into a 0-100 composite \
                  score, classifies each business into a performance tier, and builds \
                  recommendations, sector rollups, and printable reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and emit the scored dataset
    Score(ScoreArgs),
    /// Data-quality summary (valid/invalid/outlier counts, missing cells)
    Quality(QualityArgs),
    /// Sector rollups, optionally with insights and program priorities
    Sectors(SectorsArgs),
    /// Best or worst performers by composite score
    Top(TopArgs),
    /// Printable summary report
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Score(args) => commands::score::run_score(args),
        Commands::Quality(args) => commands::quality::run_quality(args),
        Commands::Sectors(args) => commands::sectors::run_sectors(args),
        Commands::Top(args) => commands::top::run_top(args),
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Version => {
            println!("smekpi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
