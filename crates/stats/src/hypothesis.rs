//! Group comparisons: rank tests, Student's t-test, effect size and mean
//! confidence intervals.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};

use crate::correlation::{average_ranks, tie_group_sizes};

/// Result of a rank-based group test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankTest {
    /// U for Mann-Whitney (first sample), H for Kruskal-Wallis.
    pub statistic: f64,
    pub p_value: f64,
}

/// Result of a two-sample pooled-variance t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Two-sided confidence interval for a mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    /// Confidence level in `(0, 1)`, e.g. 0.95.
    pub level: f64,
}

fn tie_term(values: &[f64]) -> f64 {
    tie_group_sizes(values)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

/// Two-sided Mann-Whitney U test using the normal approximation with tie and
/// continuity correction.
///
/// The reported statistic is U for `a`. Returns `None` if either sample is
/// empty or every value is tied.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Option<RankTest> {
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 {
        return None;
    }
    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let ranks = average_ranks(&pooled);

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let n = n1f + n2f;
    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;

    let mu = n1f * n2f / 2.0;
    let var = n1f * n2f / 12.0 * ((n + 1.0) - tie_term(&pooled) / (n * (n - 1.0)));
    if var <= 0.0 {
        return None;
    }
    let z = (u1.max(u2) - mu - 0.5) / var.sqrt();
    let normal = Normal::new(0.0, 1.0).ok()?;

    Some(RankTest {
        statistic: u1,
        p_value: (2.0 * normal.sf(z)).min(1.0),
    })
}

/// Kruskal-Wallis H test with tie correction; p-value from the chi-squared
/// distribution with `k - 1` degrees of freedom.
///
/// Returns `None` with fewer than 2 groups, an empty group, or when every
/// value is tied.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Option<RankTest> {
    if groups.len() < 2 || groups.iter().any(|g| g.is_empty()) {
        return None;
    }
    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let ranks = average_ranks(&pooled);
    let n = pooled.len() as f64;

    let mut offset = 0;
    let mut sum = 0.0;
    for g in groups {
        let r: f64 = ranks[offset..offset + g.len()].iter().sum();
        sum += r * r / g.len() as f64;
        offset += g.len();
    }
    let h = 12.0 / (n * (n + 1.0)) * sum - 3.0 * (n + 1.0);

    let correction = 1.0 - tie_term(&pooled) / (n * n * n - n);
    if correction <= 0.0 {
        return None;
    }
    let h = h / correction;

    let chi2 = ChiSquared::new((groups.len() - 1) as f64).ok()?;
    Some(RankTest {
        statistic: h,
        p_value: chi2.sf(h),
    })
}

fn pooled_sd(a: &[f64], b: &[f64]) -> Option<f64> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    if a.is_empty() || b.is_empty() || n1 + n2 <= 2.0 {
        return None;
    }
    let ss = (n1 - 1.0) * crate::variance(a) + (n2 - 1.0) * crate::variance(b);
    let sp = (ss / (n1 + n2 - 2.0)).sqrt();
    (sp > 0.0).then_some(sp)
}

/// Student's two-sample t-test assuming equal variances.
///
/// Returns `None` if either sample is empty, there are no residual degrees of
/// freedom, or the pooled standard deviation is zero.
pub fn student_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let sp = pooled_sd(a, b)?;
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let df = n1 + n2 - 2.0;
    let t = (crate::mean(a) - crate::mean(b)) / (sp * (1.0 / n1 + 1.0 / n2).sqrt());
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(TTest {
        statistic: t,
        df,
        p_value: (2.0 * dist.sf(t.abs())).min(1.0),
    })
}

/// Absolute Cohen's d using the pooled standard deviation.
pub fn cohens_d(a: &[f64], b: &[f64]) -> Option<f64> {
    let sp = pooled_sd(a, b)?;
    Some((crate::mean(a) - crate::mean(b)).abs() / sp)
}

/// t-based confidence interval for the mean of `data`.
///
/// Non-finite values are ignored. Returns `None` with fewer than 2 finite
/// values or a level outside `(0, 1)`.
pub fn mean_confidence_interval(data: &[f64], level: f64) -> Option<ConfidenceInterval> {
    if !(level > 0.0 && level < 1.0) {
        return None;
    }
    let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let n = finite.len() as f64;
    let mean = crate::mean(&finite);
    let se = crate::sd(&finite) / n.sqrt();
    let dist = StudentsT::new(0.0, 1.0, n - 1.0).ok()?;
    let half = dist.inverse_cdf(0.5 + level / 2.0) * se;
    Some(ConfidenceInterval {
        mean,
        lower: mean - half,
        upper: mean + half,
        level,
    })
}
