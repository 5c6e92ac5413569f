//! Printable summary report: header metrics, best performers, businesses
//! needing attention, and per-sector averages.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::stats;
use crate::summary::{bottom_performers, sector_summary, top_performers, SectorSummary};
use crate::types::{BusinessRecord, Category};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub total_businesses: usize,
    pub avg_roi_pct: Option<Decimal>,
    pub avg_margin_pct: Option<Decimal>,
    pub avg_growth_pct: Option<Decimal>,
    pub avg_composite: Option<Decimal>,
    pub good: usize,
    pub medium: usize,
    pub poor: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub as_of: NaiveDate,
    pub metrics: ReportMetrics,
    pub best: Vec<BusinessRecord>,
    pub attention: Vec<BusinessRecord>,
    pub sectors: Vec<SectorSummary>,
}

/// How many sector rows the rendered text shows, ranked by growth.
const RENDERED_SECTOR_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Assemble the report from a scored dataset. The as-of date comes from
/// the caller so the pipeline itself stays deterministic.
pub fn build_report(records: &[BusinessRecord], as_of: NaiveDate, top_n: usize) -> PerformanceReport {
    PerformanceReport {
        as_of,
        metrics: report_metrics(records),
        best: top_performers(records, top_n),
        attention: bottom_performers(records, top_n),
        sectors: sector_summary(records),
    }
}

fn report_metrics(records: &[BusinessRecord]) -> ReportMetrics {
    let avg = |get: fn(&BusinessRecord) -> Option<Decimal>| {
        let values: Vec<Decimal> = records.iter().filter_map(get).collect();
        stats::mean(&values).map(|m| m.round_dp(2))
    };
    let tally = |cat: Category| records.iter().filter(|r| r.category == cat).count();

    ReportMetrics {
        total_businesses: records.len(),
        avg_roi_pct: avg(|r| r.roi_pct),
        avg_margin_pct: avg(|r| r.profit_margin_pct),
        avg_growth_pct: avg(|r| r.growth_rate_pct),
        avg_composite: avg(|r| r.composite_score),
        good: tally(Category::Good),
        medium: tally(Category::Medium),
        poor: tally(Category::Poor),
        invalid: tally(Category::Invalid),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl PerformanceReport {
    /// Render the printable plain-text report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let m = &self.metrics;

        let _ = writeln!(out, "SME KPI Performance Report");
        let _ = writeln!(out, "As of {}", self.as_of);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Businesses: {} | Good: {} | Medium: {} | Poor: {} | Invalid: {}",
            m.total_businesses, m.good, m.medium, m.poor, m.invalid
        );
        let _ = writeln!(
            out,
            "Average ROI: {}% | Profit Margin: {}% | Growth: {}%",
            fmt_opt(m.avg_roi_pct),
            fmt_opt(m.avg_margin_pct),
            fmt_opt(m.avg_growth_pct)
        );
        let _ = writeln!(out, "Average KPI score: {}", fmt_opt(m.avg_composite));

        render_business_table(&mut out, "Best Performers", &self.best);
        render_business_table(&mut out, "Needs Attention", &self.attention);

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Sector Summary (top {} by growth)",
            RENDERED_SECTOR_ROWS
        );
        let mut by_growth: Vec<&SectorSummary> = self.sectors.iter().collect();
        by_growth.sort_by(|a, b| {
            b.avg_growth_pct
                .cmp(&a.avg_growth_pct)
                .then_with(|| a.sector.cmp(&b.sector))
        });
        for s in by_growth.into_iter().take(RENDERED_SECTOR_ROWS) {
            let _ = writeln!(
                out,
                "- {}: Growth {}%, ROI {}%, Margin {}%",
                s.sector,
                fmt_opt(s.avg_growth_pct),
                fmt_opt(s.avg_roi_pct),
                fmt_opt(s.avg_margin_pct)
            );
        }

        out
    }
}

fn render_business_table(out: &mut String, title: &str, rows: &[BusinessRecord]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "{:<42} {:<18} {:>7}  {}",
        "Name", "Sector", "Score", "Category"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<42} {:<18} {:>7}  {}",
            clip(&r.name, 42),
            clip(&r.sector, 18),
            fmt_score(r.composite_score),
            r.category
        );
    }
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn fmt_opt(value: Option<Decimal>) -> String {
    match value {
        Some(v) => v.round_dp(2).to_string(),
        None => "-".to_string(),
    }
}

fn fmt_score(value: Option<Decimal>) -> String {
    match value {
        Some(v) => v.round_dp(1).to_string(),
        None => "-".to_string(),
    }
}
