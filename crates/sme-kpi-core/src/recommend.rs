//! Rule-based advisory text, one short bullet per firing rule.
//!
//! The rules are an ordered table of (predicate, advice) pairs evaluated
//! uniformly, so each one can be tested on its own and new rules slot in
//! without touching the formatting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::BusinessRecord;

const LOW_ROI_PCT: Decimal = dec!(10);
const LOW_MARGIN_PCT: Decimal = dec!(5);
const HIGH_COST_RATIO: Decimal = dec!(0.85);

const INVALID_ADVICE: &str =
    "Data incomplete or invalid. Provide current revenue, prior-year revenue, \
     total cost, and invested capital.";

const HEALTHY_ADVICE: &str =
    "Performance is on track. Maintain the current strategy and prepare a staged \
     expansion plan.";

type Predicate = fn(&BusinessRecord) -> bool;

const RULES: &[(Predicate, &str)] = &[
    (
        low_roi,
        "Low ROI: improve capital efficiency and shed unproductive assets.",
    ),
    (
        thin_margin,
        "Thin profit margin: reduce production and operating costs, review pricing gradually.",
    ),
    (
        negative_growth,
        "Negative growth: invest in marketing, new products, or market expansion.",
    ),
    (
        high_cost_ratio,
        "Costs approach revenue: tighten cost control and focus on efficiency.",
    ),
];

fn low_roi(r: &BusinessRecord) -> bool {
    matches!(r.roi_pct, Some(v) if v < LOW_ROI_PCT)
}

fn thin_margin(r: &BusinessRecord) -> bool {
    matches!(r.profit_margin_pct, Some(v) if v < LOW_MARGIN_PCT)
}

fn negative_growth(r: &BusinessRecord) -> bool {
    matches!(r.growth_rate_pct, Some(v) if v < Decimal::ZERO)
}

fn high_cost_ratio(r: &BusinessRecord) -> bool {
    matches!(r.cost_ratio, Some(v) if v > HIGH_COST_RATIO)
}

/// Build the advisory text for one record. Invalid records get a single
/// fixed message and skip the numeric rules entirely; a valid record that
/// trips nothing gets the fixed healthy message.
pub fn recommendation_for(record: &BusinessRecord) -> String {
    if !record.valid {
        return bullet_list(&[INVALID_ADVICE]);
    }

    let fired: Vec<&str> = RULES
        .iter()
        .filter(|(applies, _)| applies(record))
        .map(|(_, advice)| *advice)
        .collect();

    if fired.is_empty() {
        bullet_list(&[HEALTHY_ADVICE])
    } else {
        bullet_list(&fired)
    }
}

fn bullet_list(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
