//! Pipeline orchestration: column validation, row coercion, then the
//! derive -> normalize -> score -> classify -> recommend chain.
//!
//! The dataset is passed by value through explicit stages; there is no
//! ambient store. Normalization is dataset-relative, so every run scores
//! against exactly the rows it was handed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coerce::parse_decimal;
use crate::error::KpiError;
use crate::normalize::{DEFAULT_HIGH_QUANTILE, DEFAULT_LOW_QUANTILE};
use crate::types::{
    BusinessInput, BusinessRecord, RawTable, ScoreWeights, COL_BUSINESS_NAME, COL_CAPITAL,
    COL_REVENUE_CURRENT, COL_REVENUE_PRIOR, COL_SECTOR, COL_TOTAL_COST, REQUIRED_COLUMNS,
};
use crate::{kpi, recommend, score, KpiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub weights: ScoreWeights,
    pub low_quantile: Decimal,
    pub high_quantile: Decimal,
    pub outlier_quantile: Decimal,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            weights: ScoreWeights::default(),
            low_quantile: DEFAULT_LOW_QUANTILE,
            high_quantile: DEFAULT_HIGH_QUANTILE,
            outlier_quantile: kpi::OUTLIER_QUANTILE,
        }
    }
}

/// Run the full pipeline over a raw table.
///
/// The only hard failures are dataset-shape problems: missing required
/// columns, an empty row set, or malformed options. Dirty cells and
/// structurally invalid rows flow through as flags and missing values.
pub fn run(table: &RawTable, opts: &PipelineOptions) -> KpiResult<Vec<BusinessRecord>> {
    validate_options(opts)?;
    let inputs = parse_table(table)?;
    if inputs.is_empty() {
        return Err(KpiError::EmptyDataset);
    }
    Ok(run_records(inputs, opts))
}

/// Pipeline over already-coerced rows (the manual-entry path).
pub fn run_records(inputs: Vec<BusinessInput>, opts: &PipelineOptions) -> Vec<BusinessRecord> {
    let mut records = kpi::derive_kpis(&inputs, opts.outlier_quantile);
    score::score_and_classify(
        &mut records,
        &opts.weights,
        opts.low_quantile,
        opts.high_quantile,
    );
    for record in &mut records {
        record.recommendation = recommend::recommendation_for(record);
    }
    records
}

/// Check the required columns and coerce each row. Unknown columns pass
/// through untouched on every record.
pub fn parse_table(table: &RawTable) -> KpiResult<Vec<BusinessInput>> {
    let header_index = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h.trim() == name)
    };

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| header_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(KpiError::MissingColumns(missing));
    }

    let idx_sector = header_index(COL_SECTOR).unwrap_or_default();
    let idx_name = header_index(COL_BUSINESS_NAME).unwrap_or_default();
    let idx_current = header_index(COL_REVENUE_CURRENT).unwrap_or_default();
    let idx_prior = header_index(COL_REVENUE_PRIOR).unwrap_or_default();
    let idx_cost = header_index(COL_TOTAL_COST).unwrap_or_default();
    let idx_capital = header_index(COL_CAPITAL).unwrap_or_default();
    let required_idx = [
        idx_sector,
        idx_name,
        idx_current,
        idx_prior,
        idx_cost,
        idx_capital,
    ];

    let cell = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();

    let inputs = table
        .rows
        .iter()
        .map(|row| {
            let mut input = BusinessInput::new(
                cell(row, idx_sector).trim().to_string(),
                cell(row, idx_name).trim().to_string(),
            );
            input.revenue_current = parse_decimal(&cell(row, idx_current));
            input.revenue_prior = parse_decimal(&cell(row, idx_prior));
            input.total_cost = parse_decimal(&cell(row, idx_cost));
            input.capital = parse_decimal(&cell(row, idx_capital));

            for (i, header) in table.headers.iter().enumerate() {
                if !required_idx.contains(&i) {
                    input.extra.insert(header.clone(), cell(row, i));
                }
            }
            input
        })
        .collect();

    Ok(inputs)
}

fn validate_options(opts: &PipelineOptions) -> KpiResult<()> {
    let unit_range = |name: &str, v: Decimal| {
        if v < Decimal::ZERO || v > Decimal::ONE {
            return Err(KpiError::InvalidInput {
                field: name.to_string(),
                reason: format!("quantile must be within [0, 1], got {v}"),
            });
        }
        Ok(())
    };
    unit_range("low_quantile", opts.low_quantile)?;
    unit_range("high_quantile", opts.high_quantile)?;
    unit_range("outlier_quantile", opts.outlier_quantile)?;

    if opts.low_quantile >= opts.high_quantile {
        return Err(KpiError::InvalidInput {
            field: "low_quantile".to_string(),
            reason: format!(
                "must be below high_quantile ({} >= {})",
                opts.low_quantile, opts.high_quantile
            ),
        });
    }
    Ok(())
}
