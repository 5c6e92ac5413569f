//! Order statistics shared by normalization and outlier detection.
//!
//! One quantile implementation (linear interpolation between order
//! statistics) serves both paths, so boundary cases cannot classify
//! differently depending on which stage asked.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Quantile of a sorted slice at `q` in `[0, 1]`, linearly interpolated
/// between order statistics at position `q * (n - 1)`.
pub fn quantile(sorted: &[Decimal], q: Decimal) -> Option<Decimal> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let q = q.clamp(Decimal::ZERO, Decimal::ONE);
    let pos = q * Decimal::from((n - 1) as u64);
    let lower = pos.floor();
    let idx = lower.to_usize()?;
    if idx + 1 >= n {
        return Some(sorted[n - 1]);
    }
    let frac = pos - lower;
    Some(sorted[idx] + (sorted[idx + 1] - sorted[idx]) * frac)
}

/// Percentile rank of each value among `values`, in `(0, 100]`.
/// Rank is 1-based with ties averaged, scaled by the sample size.
pub fn percentile_ranks(values: &[Decimal]) -> Vec<Decimal> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].cmp(&values[b]));

    let mut ranks = vec![Decimal::ZERO; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // average 1-based rank across the tie group
        let avg_rank = Decimal::from((i + j + 2) as u64) / dec!(2);
        for &k in &order[i..=j] {
            ranks[k] = avg_rank;
        }
        i = j + 1;
    }

    let count = Decimal::from(n as u64);
    ranks
        .into_iter()
        .map(|r| r * dec!(100) / count)
        .collect()
}

/// Arithmetic mean, `None` on an empty slice.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().copied().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

/// Sample standard deviation (n - 1 denominator), `None` below 2 values.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: Decimal = values.iter().map(|&v| (v - m) * (v - m)).sum();
    let variance = sum_sq / Decimal::from((values.len() - 1) as u64);
    Some(decimal_sqrt(variance))
}

/// Newton iteration square root for Decimal.
pub fn decimal_sqrt(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let two = dec!(2);
    let mut guess = x / two;
    if guess == Decimal::ZERO {
        guess = Decimal::ONE;
    }
    for _ in 0..32 {
        let next = (guess + x / guess) / two;
        if next == guess {
            break;
        }
        guess = next;
    }
    guess
}
