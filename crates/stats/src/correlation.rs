//! Rank transforms and correlation significance.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::pearson_correlation;

/// A correlation coefficient together with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationTest {
    /// Correlation coefficient in `[-1, 1]`.
    pub coefficient: f64,
    /// Two-sided p-value against the null of zero correlation.
    pub p_value: f64,
    /// Number of finite pairs used.
    pub n: usize,
}

/// Average (fractional) ranks, 1-based. Tied values share the mean of the
/// ranks they occupy.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Sizes of each group of tied values (groups of size 1 included).
pub(crate) fn tie_group_sizes(values: &[f64]) -> Vec<usize> {
    let sorted = crate::sorted_copy(values);
    let mut sizes = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        sizes.push(end - start);
        start = end;
    }
    sizes
}

/// Spearman rank correlation: Pearson correlation of average ranks.
///
/// Non-finite pairs are dropped before ranking. Returns `None` under the same
/// conditions as [`pearson_correlation`].
pub fn spearman_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let (xs, ys) = finite_pairs(x, y);
    pearson_correlation(&average_ranks(&xs), &average_ranks(&ys))
}

/// Two-sided p-value for a correlation coefficient `r` over `n` pairs, using
/// the t statistic `r * sqrt((n - 2) / (1 - r^2))` with `n - 2` degrees of
/// freedom.
///
/// Two points always lie on a line, so `n == 2` yields `1.0`. A perfect
/// correlation over more than two points yields `0.0`. Returns `None` for
/// `n < 2` or a non-finite `r`.
pub fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
    if n < 2 || !r.is_finite() {
        return None;
    }
    if n == 2 {
        return Some(1.0);
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Pearson correlation with its p-value.
pub fn pearson_test(x: &[f64], y: &[f64]) -> Option<CorrelationTest> {
    let (xs, ys) = finite_pairs(x, y);
    let coefficient = pearson_correlation(&xs, &ys)?;
    let p_value = correlation_p_value(coefficient, xs.len())?;
    Some(CorrelationTest {
        coefficient,
        p_value,
        n: xs.len(),
    })
}

/// Spearman rank correlation with its p-value (t approximation).
pub fn spearman_test(x: &[f64], y: &[f64]) -> Option<CorrelationTest> {
    let (xs, ys) = finite_pairs(x, y);
    let coefficient = spearman_correlation(&xs, &ys)?;
    let p_value = correlation_p_value(coefficient, xs.len())?;
    Some(CorrelationTest {
        coefficient,
        p_value,
        n: xs.len(),
    })
}

fn finite_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .unzip()
}
