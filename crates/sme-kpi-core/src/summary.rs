//! Dataset-level aggregation for reporting: data-quality counts, sector
//! rollups, best/worst rankings, and the sector-program guidance derived
//! from them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats;
use crate::types::{
    BusinessRecord, COL_BUSINESS_NAME, COL_CAPITAL, COL_REVENUE_CURRENT, COL_REVENUE_PRIOR,
    COL_SECTOR, COL_TOTAL_COST,
};

// ---------------------------------------------------------------------------
// Data quality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualitySummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub needs_verification_rows: usize,
    pub missing_by_column: Vec<ColumnMissing>,
}

/// Pure counting pass over a scored dataset. Blank sector or name cells
/// count as missing for the two text columns.
pub fn data_quality_summary(records: &[BusinessRecord]) -> DataQualitySummary {
    let count = |f: fn(&BusinessRecord) -> bool| records.iter().filter(|r| f(r)).count();

    let missing_by_column = vec![
        ColumnMissing {
            column: COL_SECTOR.to_string(),
            missing: count(|r| r.sector.trim().is_empty()),
        },
        ColumnMissing {
            column: COL_BUSINESS_NAME.to_string(),
            missing: count(|r| r.name.trim().is_empty()),
        },
        ColumnMissing {
            column: COL_REVENUE_CURRENT.to_string(),
            missing: count(|r| r.revenue_current.is_none()),
        },
        ColumnMissing {
            column: COL_REVENUE_PRIOR.to_string(),
            missing: count(|r| r.revenue_prior.is_none()),
        },
        ColumnMissing {
            column: COL_TOTAL_COST.to_string(),
            missing: count(|r| r.total_cost.is_none()),
        },
        ColumnMissing {
            column: COL_CAPITAL.to_string(),
            missing: count(|r| r.capital.is_none()),
        },
    ];

    DataQualitySummary {
        total_rows: records.len(),
        valid_rows: count(|r| r.valid),
        invalid_rows: count(|r| !r.valid),
        needs_verification_rows: count(|r| r.needs_verification),
        missing_by_column,
    }
}

// ---------------------------------------------------------------------------
// Sector rollups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorSummary {
    pub sector: String,
    pub businesses: usize,
    pub avg_composite: Option<Decimal>,
    pub avg_roi_pct: Option<Decimal>,
    pub avg_margin_pct: Option<Decimal>,
    pub avg_growth_pct: Option<Decimal>,
    pub avg_cost_ratio: Option<Decimal>,
    /// Sample std dev of growth rate; smaller means more stable growth.
    pub growth_std_dev: Option<Decimal>,
}

/// Group by sector and average each KPI over non-missing values (2 dp).
/// Sorted by average composite score descending, missing last, then name.
pub fn sector_summary(records: &[BusinessRecord]) -> Vec<SectorSummary> {
    let mut by_sector: BTreeMap<&str, Vec<&BusinessRecord>> = BTreeMap::new();
    for record in records {
        by_sector.entry(record.sector.as_str()).or_default().push(record);
    }

    let mut summaries: Vec<SectorSummary> = by_sector
        .into_iter()
        .map(|(sector, rows)| {
            let col = |get: fn(&BusinessRecord) -> Option<Decimal>| -> Vec<Decimal> {
                rows.iter().filter_map(|r| get(r)).collect()
            };
            let avg = |values: Vec<Decimal>| stats::mean(&values).map(|m| m.round_dp(2));

            let growth = col(|r| r.growth_rate_pct);
            SectorSummary {
                sector: sector.to_string(),
                businesses: rows.len(),
                avg_composite: avg(col(|r| r.composite_score)),
                avg_roi_pct: avg(col(|r| r.roi_pct)),
                avg_margin_pct: avg(col(|r| r.profit_margin_pct)),
                avg_growth_pct: avg(growth.clone()),
                avg_cost_ratio: avg(col(|r| r.cost_ratio)),
                growth_std_dev: stats::sample_std_dev(&growth).map(|s| s.round_dp(2)),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        cmp_desc_missing_last(a.avg_composite, b.avg_composite)
            .then_with(|| a.sector.cmp(&b.sector))
    });
    summaries
}

fn cmp_desc_missing_last(a: Option<Decimal>, b: Option<Decimal>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Valid records with a composite score, best first. Ties break on the
/// business name so slices are stable across runs.
pub fn top_performers(records: &[BusinessRecord], n: usize) -> Vec<BusinessRecord> {
    let mut ranked = scored_records(records);
    ranked.sort_by(|a, b| {
        b.composite_score
            .cmp(&a.composite_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(n);
    ranked
}

/// Valid records with a composite score, worst first.
pub fn bottom_performers(records: &[BusinessRecord], n: usize) -> Vec<BusinessRecord> {
    let mut ranked = scored_records(records);
    ranked.sort_by(|a, b| {
        a.composite_score
            .cmp(&b.composite_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(n);
    ranked
}

fn scored_records(records: &[BusinessRecord]) -> Vec<BusinessRecord> {
    records
        .iter()
        .filter(|r| r.valid && r.composite_score.is_some())
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Sector insights and program priorities
// ---------------------------------------------------------------------------

/// Headline sectors for the executive summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorInsights {
    pub top_composite: Option<String>,
    pub top_growth: Option<String>,
    pub top_roi: Option<String>,
    /// Lowest growth std dev among sectors where it is defined.
    pub most_stable: Option<String>,
}

pub fn sector_insights(sectors: &[SectorSummary]) -> SectorInsights {
    SectorInsights {
        top_composite: best_sector(sectors, |s| s.avg_composite, true),
        top_growth: best_sector(sectors, |s| s.avg_growth_pct, true),
        top_roi: best_sector(sectors, |s| s.avg_roi_pct, true),
        most_stable: best_sector(sectors, |s| s.growth_std_dev, false),
    }
}

fn best_sector(
    sectors: &[SectorSummary],
    get: fn(&SectorSummary) -> Option<Decimal>,
    highest: bool,
) -> Option<String> {
    let mut best: Option<(&SectorSummary, Decimal)> = None;
    for s in sectors {
        let Some(v) = get(s) else { continue };
        let better = match best {
            None => true,
            Some((_, cur)) => {
                if highest {
                    v > cur
                } else {
                    v < cur
                }
            }
        };
        if better {
            best = Some((s, v));
        }
    }
    best.map(|(s, _)| s.sector.clone())
}

/// Sector shortlists for the three standing support programs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramPriorities {
    /// Most stable growth: candidates for replicating as best practice.
    pub stability: Vec<String>,
    /// High growth but thin margin: need efficiency and pricing work.
    pub efficiency: Vec<String>,
    /// High ROI but slow growth: need market access and expansion support.
    pub expansion: Vec<String>,
}

const STABILITY_SHORTLIST: usize = 5;
const PROGRAM_SHORTLIST: usize = 8;
const UPPER_GATE: Decimal = dec!(0.7);
const LOWER_GATE: Decimal = dec!(0.3);

/// The gates compare each sector's mean against the 0.7/0.3 quantiles of
/// all sector means, so the shortlists adapt to whatever population the
/// report covers.
pub fn program_priorities(sectors: &[SectorSummary]) -> ProgramPriorities {
    let mut stable: Vec<&SectorSummary> = sectors
        .iter()
        .filter(|s| s.growth_std_dev.is_some())
        .collect();
    stable.sort_by(|a, b| {
        a.growth_std_dev
            .cmp(&b.growth_std_dev)
            .then_with(|| a.sector.cmp(&b.sector))
    });
    let stability = stable
        .iter()
        .take(STABILITY_SHORTLIST)
        .map(|s| s.sector.clone())
        .collect();

    let efficiency = gated_sectors(
        sectors,
        |s| s.avg_growth_pct,
        UPPER_GATE,
        |s| s.avg_margin_pct,
        LOWER_GATE,
    );
    let expansion = gated_sectors(
        sectors,
        |s| s.avg_roi_pct,
        UPPER_GATE,
        |s| s.avg_growth_pct,
        LOWER_GATE,
    );

    ProgramPriorities {
        stability,
        efficiency,
        expansion,
    }
}

/// Sectors where `high_metric` is at or above its upper-gate quantile and
/// `low_metric` at or below its lower-gate quantile.
fn gated_sectors(
    sectors: &[SectorSummary],
    high_metric: fn(&SectorSummary) -> Option<Decimal>,
    upper_gate: Decimal,
    low_metric: fn(&SectorSummary) -> Option<Decimal>,
    lower_gate: Decimal,
) -> Vec<String> {
    let quantile_of = |get: fn(&SectorSummary) -> Option<Decimal>, q: Decimal| {
        let mut values: Vec<Decimal> = sectors.iter().filter_map(get).collect();
        values.sort();
        stats::quantile(&values, q)
    };

    let (Some(upper), Some(lower)) = (
        quantile_of(high_metric, upper_gate),
        quantile_of(low_metric, lower_gate),
    ) else {
        return Vec::new();
    };

    sectors
        .iter()
        .filter(|s| {
            matches!(high_metric(s), Some(v) if v >= upper)
                && matches!(low_metric(s), Some(v) if v <= lower)
        })
        .take(PROGRAM_SHORTLIST)
        .map(|s| s.sector.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BusinessInput, Category};
    use crate::{kpi, pipeline, score};

    fn record(sector: &str, name: &str, growth: Option<Decimal>) -> BusinessRecord {
        BusinessRecord {
            sector: sector.to_string(),
            name: name.to_string(),
            revenue_current: Some(dec!(1000)),
            revenue_prior: Some(dec!(900)),
            total_cost: Some(dec!(700)),
            capital: Some(dec!(500)),
            net_profit: Some(dec!(300)),
            roi_pct: Some(dec!(60)),
            profit_margin_pct: Some(dec!(30)),
            growth_rate_pct: growth,
            cost_ratio: Some(dec!(0.7)),
            valid: true,
            needs_verification: false,
            roi_score: Some(dec!(50)),
            margin_score: Some(dec!(50)),
            growth_score: Some(dec!(50)),
            composite_score: Some(dec!(50)),
            category: Category::Poor,
            recommendation: String::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn sector_average_of_two_growth_rates() {
        let records = vec![
            record("Food", "A", Some(dec!(10))),
            record("Food", "B", Some(dec!(20))),
        ];
        let summary = sector_summary(&records);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].avg_growth_pct, Some(dec!(15.00)));
        assert_eq!(summary[0].businesses, 2);
    }

    #[test]
    fn sector_averages_ignore_missing() {
        let records = vec![
            record("Food", "A", Some(dec!(10))),
            record("Food", "B", None),
        ];
        let summary = sector_summary(&records);
        assert_eq!(summary[0].avg_growth_pct, Some(dec!(10.00)));
        // one growth value -> no std dev
        assert_eq!(summary[0].growth_std_dev, None);
    }

    #[test]
    fn sector_std_dev_measures_stability() {
        let records = vec![
            record("Steady", "A", Some(dec!(10))),
            record("Steady", "B", Some(dec!(12))),
            record("Wild", "C", Some(dec!(-40))),
            record("Wild", "D", Some(dec!(80))),
        ];
        let summary = sector_summary(&records);
        let steady = summary.iter().find(|s| s.sector == "Steady").unwrap();
        let wild = summary.iter().find(|s| s.sector == "Wild").unwrap();
        assert!(steady.growth_std_dev.unwrap() < wild.growth_std_dev.unwrap());

        let insights = sector_insights(&summary);
        assert_eq!(insights.most_stable.as_deref(), Some("Steady"));
        assert_eq!(insights.top_growth.as_deref(), Some("Wild"));
    }

    #[test]
    fn quality_summary_counts() {
        let mut records = vec![
            record("Food", "A", Some(dec!(10))),
            record("Food", "", Some(dec!(20))),
        ];
        records[1].valid = false;
        records[1].capital = None;
        records[1].needs_verification = true;

        let q = data_quality_summary(&records);
        assert_eq!(q.total_rows, 2);
        assert_eq!(q.valid_rows, 1);
        assert_eq!(q.invalid_rows, 1);
        assert_eq!(q.needs_verification_rows, 1);

        let missing: BTreeMap<&str, usize> = q
            .missing_by_column
            .iter()
            .map(|c| (c.column.as_str(), c.missing))
            .collect();
        assert_eq!(missing["business_name"], 1);
        assert_eq!(missing["capital_invested"], 1);
        assert_eq!(missing["sector"], 0);
        assert_eq!(missing["revenue_current_year"], 0);
    }

    #[test]
    fn rankings_exclude_invalid_and_break_ties_by_name() {
        let mut records = vec![
            record("Food", "B", Some(dec!(1))),
            record("Food", "A", Some(dec!(1))),
            record("Food", "C", Some(dec!(1))),
        ];
        records[0].composite_score = Some(dec!(80));
        records[1].composite_score = Some(dec!(80));
        records[2].valid = false;
        records[2].composite_score = None;

        let top = top_performers(&records, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "B");

        let bottom = bottom_performers(&records, 1);
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom[0].name, "A");
    }

    fn sector_mean(sector: &str, roi: i64, margin: i64, growth: i64) -> SectorSummary {
        SectorSummary {
            sector: sector.to_string(),
            businesses: 3,
            avg_composite: Some(dec!(50)),
            avg_roi_pct: Some(Decimal::from(roi)),
            avg_margin_pct: Some(Decimal::from(margin)),
            avg_growth_pct: Some(Decimal::from(growth)),
            avg_cost_ratio: Some(dec!(0.5)),
            growth_std_dev: Some(Decimal::from(growth.abs())),
        }
    }

    #[test]
    fn program_priorities_gate_on_sector_quantiles() {
        let sectors = vec![
            sector_mean("HotButThin", 20, 1, 50),
            sector_mean("RichButSlow", 90, 30, -5),
            sector_mean("MiddleA", 40, 10, 10),
            sector_mean("MiddleB", 45, 12, 12),
            sector_mean("MiddleC", 50, 15, 15),
        ];
        let p = program_priorities(&sectors);
        assert!(p.efficiency.contains(&"HotButThin".to_string()));
        assert!(!p.efficiency.contains(&"RichButSlow".to_string()));
        assert!(p.expansion.contains(&"RichButSlow".to_string()));
        assert!(!p.expansion.contains(&"HotButThin".to_string()));
        // stability shortlist is capped and sorted by std dev
        assert_eq!(p.stability.len(), 5);
        assert_eq!(p.stability[0], "RichButSlow");
    }

    #[test]
    fn end_to_end_sector_rollup_from_pipeline_stages() {
        let inputs: Vec<BusinessInput> = vec![
            BusinessInput {
                revenue_current: Some(dec!(1100)),
                ..BusinessInput::new("Craft", "X")
            },
            BusinessInput {
                revenue_current: Some(dec!(1200)),
                revenue_prior: Some(dec!(1000)),
                total_cost: Some(dec!(600)),
                capital: Some(dec!(400)),
                ..BusinessInput::new("Craft", "Y")
            },
        ];
        let mut records = kpi::derive_kpis(&inputs, kpi::OUTLIER_QUANTILE);
        let opts = pipeline::PipelineOptions::default();
        score::score_and_classify(
            &mut records,
            &opts.weights,
            opts.low_quantile,
            opts.high_quantile,
        );
        let summary = sector_summary(&records);
        assert_eq!(summary.len(), 1);
        // only Y contributes growth: (1200-1000)/1000 = 20%
        assert_eq!(summary[0].avg_growth_pct, Some(dec!(20.00)));
    }
}
