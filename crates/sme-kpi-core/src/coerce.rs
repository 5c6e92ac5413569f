//! Numeric coercion and the division primitive behind every derived KPI.
//!
//! Dirty cells are a normal condition in this dataset, not an error:
//! anything that fails to parse becomes missing and the row keeps flowing
//! through the pipeline.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse one raw cell into a number. Blank or unparseable cells become
/// `None`. Accepts plain decimal notation and scientific notation (`1e6`).
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Element-wise safe division: `Some(a / b)` only when both operands are
/// present and the denominator is non-zero. Never panics.
pub fn safe_div(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if !d.is_zero() => Some(n / d),
        _ => None,
    }
}
