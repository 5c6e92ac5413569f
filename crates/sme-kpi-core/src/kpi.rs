//! KPI derivation: net profit, ROI, profit margin, growth rate, cost
//! ratio, plus the validity and needs-verification flags.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::coerce::safe_div;
use crate::stats;
use crate::types::{BusinessInput, BusinessRecord, Category};

const PCT: Decimal = dec!(100);

/// Quantile above which a KPI value is treated as a statistical outlier.
pub const OUTLIER_QUANTILE: Decimal = dec!(0.995);

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive every KPI and both flags for a dataset. Scores and category stay
/// unset here; the scoring stage fills them in.
///
/// All raw and derived numerics are rounded to 2 dp at the end of this
/// stage (half-even, matching the reporting convention of the exports).
pub fn derive_kpis(inputs: &[BusinessInput], outlier_quantile: Decimal) -> Vec<BusinessRecord> {
    let mut records: Vec<BusinessRecord> = inputs.iter().map(derive_one).collect();
    flag_outliers(&mut records, outlier_quantile);
    records
}

fn derive_one(input: &BusinessInput) -> BusinessRecord {
    let revenue_current = input.revenue_current;
    let revenue_prior = input.revenue_prior;
    let total_cost = input.total_cost;
    let capital = input.capital;

    let net_profit = match (revenue_current, total_cost) {
        (Some(rev), Some(cost)) => Some(rev - cost),
        _ => None,
    };
    let revenue_delta = match (revenue_current, revenue_prior) {
        (Some(now), Some(prior)) => Some(now - prior),
        _ => None,
    };

    let roi_pct = safe_div(net_profit, capital).map(|v| v * PCT);
    let profit_margin_pct = safe_div(net_profit, revenue_current).map(|v| v * PCT);
    let growth_rate_pct = safe_div(revenue_delta, revenue_prior).map(|v| v * PCT);
    let cost_ratio = safe_div(total_cost, revenue_current);

    BusinessRecord {
        sector: input.sector.clone(),
        name: input.name.clone(),
        revenue_current: round2(revenue_current),
        revenue_prior: round2(revenue_prior),
        total_cost: round2(total_cost),
        capital: round2(capital),
        net_profit: round2(net_profit),
        roi_pct: round2(roi_pct),
        profit_margin_pct: round2(profit_margin_pct),
        growth_rate_pct: round2(growth_rate_pct),
        cost_ratio: round2(cost_ratio),
        valid: is_valid(revenue_current, revenue_prior, total_cost, capital),
        needs_verification: false,
        roi_score: None,
        margin_score: None,
        growth_score: None,
        composite_score: None,
        category: Category::Invalid,
        recommendation: String::new(),
        extra: input.extra.clone(),
    }
}

fn round2(value: Option<Decimal>) -> Option<Decimal> {
    value.map(|v| v.round_dp(2))
}

// ---------------------------------------------------------------------------
// Validity
// ---------------------------------------------------------------------------

/// A record is valid only when capital, current revenue, and prior revenue
/// are present and positive, and total cost is present and non-negative.
fn is_valid(
    revenue_current: Option<Decimal>,
    revenue_prior: Option<Decimal>,
    total_cost: Option<Decimal>,
    capital: Option<Decimal>,
) -> bool {
    let positive = |v: Option<Decimal>| matches!(v, Some(x) if x > Decimal::ZERO);
    let non_negative = |v: Option<Decimal>| matches!(v, Some(x) if x >= Decimal::ZERO);

    positive(capital)
        && positive(revenue_current)
        && positive(revenue_prior)
        && non_negative(total_cost)
}

// ---------------------------------------------------------------------------
// Outlier flagging
// ---------------------------------------------------------------------------

/// Flag any record strictly above the outlier quantile on ROI, margin, or
/// growth. Computed independently of validity: an invalid row with an
/// absurd numeric KPI still deserves a manual look.
fn flag_outliers(records: &mut [BusinessRecord], outlier_quantile: Decimal) {
    let metrics: [fn(&BusinessRecord) -> Option<Decimal>; 3] = [
        |r| r.roi_pct,
        |r| r.profit_margin_pct,
        |r| r.growth_rate_pct,
    ];

    for metric in metrics {
        let mut present: Vec<Decimal> = records.iter().filter_map(metric).collect();
        if present.is_empty() {
            continue;
        }
        present.sort();
        let Some(threshold) = stats::quantile(&present, outlier_quantile) else {
            continue;
        };
        for record in records.iter_mut() {
            if matches!(metric(record), Some(v) if v > threshold) {
                record.needs_verification = true;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
