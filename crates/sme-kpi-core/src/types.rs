use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical headers for the six required dataset columns.
pub const COL_SECTOR: &str = "sector";
pub const COL_BUSINESS_NAME: &str = "business_name";
pub const COL_REVENUE_CURRENT: &str = "revenue_current_year";
pub const COL_REVENUE_PRIOR: &str = "revenue_prior_year";
pub const COL_TOTAL_COST: &str = "total_cost";
pub const COL_CAPITAL: &str = "capital_invested";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_SECTOR,
    COL_BUSINESS_NAME,
    COL_REVENUE_CURRENT,
    COL_REVENUE_PRIOR,
    COL_TOTAL_COST,
    COL_CAPITAL,
];

/// Raw tabular input as delivered by an external consumer (file import or
/// manual entry). Cells are untyped; coercion happens inside the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One business after coercion: identity fields, the four raw financial
/// inputs, and any pass-through columns the dataset carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessInput {
    pub sector: String,
    pub name: String,
    pub revenue_current: Option<Decimal>,
    pub revenue_prior: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub capital: Option<Decimal>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// One fully scored business row. Derived fields are recomputed from the
/// raw inputs on every pipeline run and never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub sector: String,
    pub name: String,
    pub revenue_current: Option<Decimal>,
    pub revenue_prior: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub capital: Option<Decimal>,

    pub net_profit: Option<Decimal>,
    pub roi_pct: Option<Decimal>,
    pub profit_margin_pct: Option<Decimal>,
    /// Period-over-period revenue change, percent.
    pub growth_rate_pct: Option<Decimal>,
    /// Total cost over current revenue. Informational; lower is better.
    pub cost_ratio: Option<Decimal>,

    pub valid: bool,
    /// Statistical outlier on any scored KPI; warrants manual review.
    pub needs_verification: bool,

    pub roi_score: Option<Decimal>,
    pub margin_score: Option<Decimal>,
    pub growth_score: Option<Decimal>,
    /// Weighted blend of the three component scores, 0-100.
    pub composite_score: Option<Decimal>,

    pub category: Category,
    pub recommendation: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Performance tier, determined solely by the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Good,
    Medium,
    Poor,
    Invalid,
}

impl Category {
    const GOOD_FLOOR: Decimal = dec!(75);
    const MEDIUM_FLOOR: Decimal = dec!(55);

    /// Thresholds are inclusive on the lower bound: exactly 75 is Good,
    /// exactly 55 is Medium.
    pub fn from_score(score: Option<Decimal>) -> Self {
        match score {
            Some(s) if s >= Self::GOOD_FLOOR => Category::Good,
            Some(s) if s >= Self::MEDIUM_FLOOR => Category::Medium,
            Some(_) => Category::Poor,
            None => Category::Invalid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Medium => "Medium",
            Category::Poor => "Poor",
            Category::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component weights for the composite score. Summing to 1.0 is the
/// caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub roi: Decimal,
    pub margin: Decimal,
    pub growth: Decimal,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            roi: dec!(0.40),
            margin: dec!(0.35),
            growth: dec!(0.25),
        }
    }
}

impl BusinessInput {
    /// Blank record scaffold used when assembling rows from raw cells.
    pub fn new(sector: impl Into<String>, name: impl Into<String>) -> Self {
        BusinessInput {
            sector: sector.into(),
            name: name.into(),
            revenue_current: None,
            revenue_prior: None,
            total_cost: None,
            capital: None,
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_partitions_exhaustively() {
        assert_eq!(Category::from_score(Some(dec!(100))), Category::Good);
        assert_eq!(Category::from_score(Some(dec!(75))), Category::Good);
        assert_eq!(Category::from_score(Some(dec!(74.99))), Category::Medium);
        assert_eq!(Category::from_score(Some(dec!(55))), Category::Medium);
        assert_eq!(Category::from_score(Some(dec!(54.99))), Category::Poor);
        assert_eq!(Category::from_score(Some(dec!(0))), Category::Poor);
        assert_eq!(Category::from_score(None), Category::Invalid);
    }

    #[test]
    fn default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        assert_eq!(w.roi + w.margin + w.growth, dec!(1.00));
    }

    #[test]
    fn category_display() {
        assert_eq!(Category::Good.to_string(), "Good");
        assert_eq!(Category::Invalid.to_string(), "Invalid");
    }
}
