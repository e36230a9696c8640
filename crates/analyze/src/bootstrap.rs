//! Pair bootstrap for the correlation coefficient.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Spread of the resampled correlation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapDistribution {
    pub mean: f64,
    /// Population standard deviation of the resampled coefficients.
    pub sd: f64,
    /// 2.5th percentile.
    pub ci_lower: f64,
    /// 97.5th percentile.
    pub ci_upper: f64,
}

/// Result of a pair bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapSummary {
    pub iterations_requested: usize,
    /// Resamples in which both vectors had more than one distinct value.
    pub valid_iterations: usize,
    /// `None` when no resample was valid.
    pub distribution: Option<BootstrapDistribution>,
}

/// Resamples `(x[i], y[i])` pairs with replacement `iterations` times and
/// collects the Pearson coefficient of each resample.
///
/// A resample in which either vector has a single distinct value is skipped
/// and not counted. Percentiles use linear interpolation between order
/// statistics.
pub(crate) fn bootstrap_correlation(
    x: &[f64],
    y: &[f64],
    iterations: usize,
    rng: &mut impl Rng,
) -> BootstrapSummary {
    assert_eq!(
        x.len(),
        y.len(),
        "bootstrap_correlation: x and y must have equal length"
    );
    let n = x.len();
    let mut coefficients = Vec::with_capacity(iterations);

    if n > 0 {
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for _ in 0..iterations {
            xs.clear();
            ys.clear();
            for _ in 0..n {
                let i = rng.random_range(0..n);
                xs.push(x[i]);
                ys.push(y[i]);
            }
            if lumen_stats::distinct_count(&xs) < 2 || lumen_stats::distinct_count(&ys) < 2 {
                continue;
            }
            if let Some(r) = lumen_stats::pearson_correlation(&xs, &ys) {
                coefficients.push(r);
            }
        }
    }

    let valid_iterations = coefficients.len();
    debug!(
        requested = iterations,
        valid = valid_iterations,
        skipped = iterations - valid_iterations,
        "bootstrap finished"
    );

    let distribution = (valid_iterations > 0).then(|| {
        let sorted = lumen_stats::sorted_copy(&coefficients);
        BootstrapDistribution {
            mean: lumen_stats::mean(&coefficients),
            sd: lumen_stats::population_sd(&coefficients),
            ci_lower: lumen_stats::quantile_type7(&sorted, 0.025),
            ci_upper: lumen_stats::quantile_type7(&sorted, 0.975),
        }
    });

    BootstrapSummary {
        iterations_requested: iterations,
        valid_iterations,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_perfect_line_gives_unit_coefficients() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [3.0, 5.0, 7.0, 9.0, 11.0, 13.0];
        let mut rng = StdRng::seed_from_u64(42);
        let summary = bootstrap_correlation(&x, &y, 200, &mut rng);
        let dist = summary.distribution.unwrap();
        assert!(summary.valid_iterations > 0);
        assert!(summary.valid_iterations <= 200);
        assert!((dist.mean - 1.0).abs() < 1e-9);
        assert!(dist.sd < 1e-9);
        assert!((dist.ci_lower - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_y_has_no_valid_iterations() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 4.0, 4.0];
        let mut rng = StdRng::seed_from_u64(1);
        let summary = bootstrap_correlation(&x, &y, 50, &mut rng);
        assert_eq!(summary.iterations_requested, 50);
        assert_eq!(summary.valid_iterations, 0);
        assert_eq!(summary.distribution, None);
    }

    /// With two points half of all resamples repeat one pair and are skipped.
    #[test]
    fn test_degenerate_resamples_are_not_counted() {
        let x = [1.0, 2.0];
        let y = [3.0, 5.0];
        let mut rng = StdRng::seed_from_u64(11);
        let summary = bootstrap_correlation(&x, &y, 200, &mut rng);
        assert_eq!(summary.iterations_requested, 200);
        assert!(summary.valid_iterations > 0);
        assert!(summary.valid_iterations < 200);
        let dist = summary.distribution.unwrap();
        assert_eq!(dist.mean, 1.0);
        assert_eq!(dist.sd, 0.0);
    }

    #[test]
    fn test_constant_x_has_no_valid_iterations() {
        let x = [2.0, 2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(5);
        let summary = bootstrap_correlation(&x, &y, 100, &mut rng);
        assert_eq!(summary.iterations_requested, 100);
        assert_eq!(summary.valid_iterations, 0);
        assert_eq!(summary.distribution, None);
    }

    #[test]
    fn test_zero_iterations() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 1.0, 3.0];
        let mut rng = StdRng::seed_from_u64(5);
        let summary = bootstrap_correlation(&x, &y, 0, &mut rng);
        assert_eq!(summary.iterations_requested, 0);
        assert_eq!(summary.valid_iterations, 0);
        assert_eq!(summary.distribution, None);
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let summary = bootstrap_correlation(&[], &[], 10, &mut rng);
        assert_eq!(summary.valid_iterations, 0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let x = [1.0, 5.0, 2.0, 8.0, 3.0];
        let y = [0.2, 0.9, 0.1, 0.7, 0.4];
        let a = bootstrap_correlation(&x, &y, 100, &mut StdRng::seed_from_u64(9));
        let b = bootstrap_correlation(&x, &y, 100, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_interval_is_ordered() {
        let x = [1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 4.0];
        let y = [0.2, 0.9, 0.1, 0.7, 0.4, 0.5, 0.3];
        let summary = bootstrap_correlation(&x, &y, 300, &mut StdRng::seed_from_u64(3));
        let dist = summary.distribution.unwrap();
        assert!(dist.ci_lower <= dist.ci_upper);
        assert!((-1.0..=1.0).contains(&dist.ci_lower));
        assert!((-1.0..=1.0).contains(&dist.ci_upper));
    }
}
