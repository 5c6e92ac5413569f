//! Quantile-clipped normalization of a KPI column onto a 0-100 scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::stats;

pub const DEFAULT_LOW_QUANTILE: Decimal = dec!(0.05);
pub const DEFAULT_HIGH_QUANTILE: Decimal = dec!(0.95);

/// Below this many non-missing values the clip bounds interpolate between
/// too few order statistics to mean anything, so the percentile-rank
/// fallback takes over.
pub const MIN_CLIP_SAMPLE: usize = 20;

/// Map a column to `[0, 100]`, robust to extreme values.
///
/// Non-missing values are clipped to the `[low_q, high_q]` quantile range
/// and the clipped range rescaled linearly to 0-100. Degenerate
/// distributions (fewer than [`MIN_CLIP_SAMPLE`] values, or equal clip
/// bounds) fall back to percentile-rank scaling, which stays well-defined
/// for any sample. Missing stays missing; an all-missing column comes back
/// all-missing.
pub fn quantile_clip_scores(
    values: &[Option<Decimal>],
    low_q: Decimal,
    high_q: Decimal,
) -> Vec<Option<Decimal>> {
    let mut present: Vec<Decimal> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return vec![None; values.len()];
    }
    present.sort();

    let lo = stats::quantile(&present, low_q);
    let hi = stats::quantile(&present, high_q);

    match (lo, hi) {
        (Some(lo), Some(hi)) if hi != lo && present.len() >= MIN_CLIP_SAMPLE => {
            let span = hi - lo;
            values
                .iter()
                .map(|v| v.map(|x| (x.clamp(lo, hi) - lo) * dec!(100) / span))
                .collect()
        }
        _ => rank_scores(values),
    }
}

/// Percentile-rank fallback: each value scored by its average-rank
/// position among the non-missing values, scaled to 0-100.
fn rank_scores(values: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
    let present: Vec<Decimal> = values.iter().filter_map(|v| *v).collect();
    let ranks = stats::percentile_ranks(&present);
    let mut next = ranks.into_iter();
    values
        .iter()
        .map(|v| v.and_then(|_| next.next()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(raw: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
        quantile_clip_scores(raw, DEFAULT_LOW_QUANTILE, DEFAULT_HIGH_QUANTILE)
    }

    fn some_range(n: i64) -> Vec<Option<Decimal>> {
        (1..=n).map(|i| Some(Decimal::from(i))).collect()
    }

    #[test]
    fn all_missing_in_all_missing_out() {
        let out = scores(&[None, None, None]);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn clip_path_pins_tails_and_keeps_order() {
        let out = scores(&some_range(25));
        // lo = q0.05 over 25 values = 2.2, hi = q0.95 = 23.8
        assert_eq!(out[0], Some(dec!(0)));
        assert_eq!(out[24], Some(dec!(100)));
        for w in out.windows(2) {
            assert!(w[0].unwrap() <= w[1].unwrap());
        }
        for v in out.iter().flatten() {
            assert!(*v >= dec!(0) && *v <= dec!(100));
        }
    }

    #[test]
    fn small_samples_use_rank_fallback() {
        // 4 distinct values is below MIN_CLIP_SAMPLE
        let out = scores(&[
            Some(dec!(7)),
            Some(dec!(1)),
            Some(dec!(5)),
            Some(dec!(3)),
        ]);
        assert_eq!(
            out,
            vec![
                Some(dec!(100)),
                Some(dec!(25)),
                Some(dec!(75)),
                Some(dec!(50)),
            ]
        );
    }

    #[test]
    fn constant_column_uses_rank_fallback() {
        let raw: Vec<Option<Decimal>> = (0..30).map(|_| Some(dec!(12))).collect();
        let out = scores(&raw);
        // every value ties at the average rank -> identical mid scores
        let expected = dec!(15.5) * dec!(100) / dec!(30);
        assert!(out.iter().all(|v| *v == Some(expected)));
    }

    #[test]
    fn missing_values_stay_missing_in_both_paths() {
        let mut raw = some_range(30);
        raw.insert(3, None);
        let out = scores(&raw);
        assert_eq!(out[3], None);
        assert_eq!(out.iter().filter(|v| v.is_none()).count(), 1);

        let small = [Some(dec!(1)), None, Some(dec!(2))];
        let out = scores(&small);
        assert_eq!(out[1], None);
        assert_eq!(out[0], Some(dec!(50)));
        assert_eq!(out[2], Some(dec!(100)));
    }

    #[test]
    fn monotonic_on_distinct_inputs() {
        let raw: Vec<Option<Decimal>> = [3, 90, 14, 2, 55, 41, 8, 77, 21, 60, 33, 5, 98, 47, 12,
            66, 29, 84, 50, 18, 72, 37, 9, 92, 26]
            .iter()
            .map(|&i| Some(Decimal::from(i)))
            .collect();
        let out = scores(&raw);
        let mut pairs: Vec<(Decimal, Decimal)> = raw
            .iter()
            .zip(&out)
            .map(|(a, b)| (a.unwrap(), b.unwrap()))
            .collect();
        pairs.sort();
        for w in pairs.windows(2) {
            assert!(w[0].1 <= w[1].1, "{:?} then {:?}", w[0], w[1]);
        }
    }
}
