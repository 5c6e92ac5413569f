//! Composite scoring and tier classification.

use rust_decimal::Decimal;

use crate::normalize::quantile_clip_scores;
use crate::types::{BusinessRecord, Category, ScoreWeights};

/// Weighted blend of the three component scores. Missing any component
/// leaves the composite missing.
pub fn composite(
    roi_score: Option<Decimal>,
    margin_score: Option<Decimal>,
    growth_score: Option<Decimal>,
    weights: &ScoreWeights,
) -> Option<Decimal> {
    match (roi_score, margin_score, growth_score) {
        (Some(r), Some(m), Some(g)) => {
            Some(weights.roi * r + weights.margin * m + weights.growth * g)
        }
        _ => None,
    }
}

/// Normalize each KPI across the dataset, blend into the composite score,
/// and classify. Invalidity dominates: an invalid record ends up with all
/// four score fields missing no matter what the arithmetic produced.
pub fn score_and_classify(
    records: &mut [BusinessRecord],
    weights: &ScoreWeights,
    low_quantile: Decimal,
    high_quantile: Decimal,
) {
    let column = |records: &[BusinessRecord], get: fn(&BusinessRecord) -> Option<Decimal>| {
        let raw: Vec<Option<Decimal>> = records.iter().map(get).collect();
        quantile_clip_scores(&raw, low_quantile, high_quantile)
    };

    let roi_scores = column(records, |r| r.roi_pct);
    let margin_scores = column(records, |r| r.profit_margin_pct);
    let growth_scores = column(records, |r| r.growth_rate_pct);

    for (i, record) in records.iter_mut().enumerate() {
        record.roi_score = roi_scores[i];
        record.margin_score = margin_scores[i];
        record.growth_score = growth_scores[i];
        record.composite_score = composite(
            record.roi_score,
            record.margin_score,
            record.growth_score,
            weights,
        );

        if !record.valid {
            record.roi_score = None;
            record.margin_score = None;
            record.growth_score = None;
            record.composite_score = None;
        }

        record.category = Category::from_score(record.composite_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::{derive_kpis, OUTLIER_QUANTILE};
    use crate::normalize::{DEFAULT_HIGH_QUANTILE, DEFAULT_LOW_QUANTILE};
    use crate::types::BusinessInput;
    use rust_decimal_macros::dec;

    #[test]
    fn composite_is_the_weighted_sum() {
        // 0.4*80 + 0.35*60 + 0.25*40 = 32 + 21 + 10 = 63
        let score = composite(
            Some(dec!(80)),
            Some(dec!(60)),
            Some(dec!(40)),
            &ScoreWeights::default(),
        );
        assert_eq!(score, Some(dec!(63.0)));
        assert_eq!(Category::from_score(score), Category::Medium);
    }

    #[test]
    fn composite_missing_when_any_component_is() {
        let w = ScoreWeights::default();
        assert_eq!(composite(None, Some(dec!(60)), Some(dec!(40)), &w), None);
        assert_eq!(composite(Some(dec!(80)), None, Some(dec!(40)), &w), None);
        assert_eq!(composite(Some(dec!(80)), Some(dec!(60)), None, &w), None);
    }

    fn business(
        name: &str,
        current: Decimal,
        prior: Decimal,
        cost: Decimal,
        capital: Decimal,
    ) -> BusinessInput {
        BusinessInput {
            sector: "Trade".to_string(),
            name: name.to_string(),
            revenue_current: Some(current),
            revenue_prior: Some(prior),
            total_cost: Some(cost),
            capital: Some(capital),
            extra: Default::default(),
        }
    }

    #[test]
    fn invalidity_dominates_every_score_field() {
        let mut inputs: Vec<BusinessInput> = (1..=10)
            .map(|i| {
                business(
                    &format!("biz-{i}"),
                    dec!(1000) + Decimal::from(i * 10),
                    dec!(900),
                    dec!(500),
                    dec!(400),
                )
            })
            .collect();
        // capital 0 -> invalid, but every KPI except ROI is still numeric
        inputs.push(business("broken", dec!(1200), dec!(900), dec!(500), dec!(0)));

        let mut records = derive_kpis(&inputs, OUTLIER_QUANTILE);
        score_and_classify(
            &mut records,
            &ScoreWeights::default(),
            DEFAULT_LOW_QUANTILE,
            DEFAULT_HIGH_QUANTILE,
        );

        let broken = records.iter().find(|r| r.name == "broken").unwrap();
        assert!(!broken.valid);
        assert_eq!(broken.roi_score, None);
        assert_eq!(broken.margin_score, None);
        assert_eq!(broken.growth_score, None);
        assert_eq!(broken.composite_score, None);
        assert_eq!(broken.category, Category::Invalid);

        for r in records.iter().filter(|r| r.valid) {
            assert!(r.composite_score.is_some());
            assert_ne!(r.category, Category::Invalid);
        }
    }

    #[test]
    fn scores_stay_within_bounds() {
        let inputs: Vec<BusinessInput> = (1..=40)
            .map(|i| {
                business(
                    &format!("biz-{i}"),
                    Decimal::from(1000 * i),
                    dec!(50000),
                    Decimal::from(400 * i),
                    Decimal::from(10 + i),
                )
            })
            .collect();
        let mut records = derive_kpis(&inputs, OUTLIER_QUANTILE);
        score_and_classify(
            &mut records,
            &ScoreWeights::default(),
            DEFAULT_LOW_QUANTILE,
            DEFAULT_HIGH_QUANTILE,
        );
        for r in &records {
            for s in [r.roi_score, r.margin_score, r.growth_score, r.composite_score]
                .into_iter()
                .flatten()
            {
                assert!(s >= dec!(0) && s <= dec!(100), "out of range: {s}");
            }
        }
    }
}
