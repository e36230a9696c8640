//! Linear and log-linear fits of hourly success on declared size.

use serde::Serialize;

use crate::outcome::Outcome;

/// Which predictor transform a fit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionKind {
    /// `y = b0 + b1 * parameters`
    Linear,
    /// `y = b0 + b1 * log10(parameters)`
    LogLinear,
}

/// Shapiro-Wilk result on a fit's residuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResidualNormality {
    pub w: f64,
    pub p_value: f64,
}

/// One fitted regression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionFit {
    pub kind: RegressionKind,
    pub intercept: f64,
    pub slope: f64,
    /// `None` with fewer than 3 models.
    pub slope_se: Option<f64>,
    pub r_squared: f64,
    pub rmse: f64,
    /// `None` with fewer than 3 models.
    pub residual_sd: Option<f64>,
    pub residuals: Vec<f64>,
    /// Insufficient with fewer than 3 residuals or an exact fit, where the
    /// residuals are rounding noise.
    pub residual_normality: Outcome<ResidualNormality>,
    /// The fitted line in readable form.
    pub equation: String,
}

/// Fits with `1 - R²` below this leave nothing to test for normality.
const EXACT_FIT_TOLERANCE: f64 = 1e-10;

fn residual_normality(fit: &lumen_stats::LinearFit) -> Outcome<ResidualNormality> {
    if fit.residuals.len() < 3 {
        return Outcome::insufficient("need at least 3 residuals");
    }
    if 1.0 - fit.r_squared < EXACT_FIT_TOLERANCE {
        return Outcome::insufficient("exact fit: residual variance is zero");
    }
    Outcome::from_option(
        lumen_stats::shapiro_wilk(&fit.residuals).map(|sw| ResidualNormality {
            w: sw.w,
            p_value: sw.p_value,
        }),
        "residuals have no spread",
    )
}

impl RegressionFit {
    fn new(kind: RegressionKind, fit: lumen_stats::LinearFit) -> Self {
        let residual_normality = residual_normality(&fit);
        let predictor = match kind {
            RegressionKind::Linear => "parameters",
            RegressionKind::LogLinear => "log10(parameters)",
        };
        let equation = format!(
            "hourly_success_pct = {:.4} + {:.6e} * {}",
            fit.intercept, fit.slope, predictor
        );
        Self {
            kind,
            intercept: fit.intercept,
            slope: fit.slope,
            slope_se: fit.slope_se,
            r_squared: fit.r_squared,
            rmse: fit.rmse,
            residual_sd: fit.residual_sd,
            residuals: fit.residuals,
            residual_normality,
            equation,
        }
    }
}

/// Both regressions and which one explains more variance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    pub linear: Outcome<RegressionFit>,
    pub log_linear: Outcome<RegressionFit>,
    /// Higher R² wins; ties go to the linear model. `None` unless both fits
    /// were computed.
    pub preferred: Option<RegressionKind>,
}

const NO_FIT: &str = "need at least 2 models with differing values on both axes";

/// Fits both models. `parameters` must be positive.
pub(crate) fn regress(parameters: &[f64], success_pct: &[f64]) -> RegressionReport {
    let log_parameters: Vec<f64> = parameters.iter().map(|p| p.log10()).collect();

    let linear = Outcome::from_option(
        lumen_stats::ols(parameters, success_pct)
            .map(|fit| RegressionFit::new(RegressionKind::Linear, fit)),
        NO_FIT,
    );
    let log_linear = Outcome::from_option(
        lumen_stats::ols(&log_parameters, success_pct)
            .map(|fit| RegressionFit::new(RegressionKind::LogLinear, fit)),
        NO_FIT,
    );

    let preferred = match (linear.value(), log_linear.value()) {
        (Some(lin), Some(log)) if log.r_squared > lin.r_squared => Some(RegressionKind::LogLinear),
        (Some(_), Some(_)) => Some(RegressionKind::Linear),
        _ => None,
    };

    RegressionReport {
        linear,
        log_linear,
        preferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_linear_preferred_for_log_relation() {
        let params = [1e9, 1e10, 1e11, 1e12];
        let success = [10.0, 30.0, 50.0, 70.0];
        let report = regress(&params, &success);
        let log = report.log_linear.value().unwrap();
        assert_relative_eq!(log.r_squared, 1.0, epsilon = 1e-10);
        assert_relative_eq!(log.slope, 20.0, epsilon = 1e-8);
        assert_relative_eq!(log.intercept, -170.0, epsilon = 1e-6);
        assert_eq!(report.preferred, Some(RegressionKind::LogLinear));
        assert!(log.equation.contains("log10(parameters)"));
        assert_eq!(
            log.residual_normality.reason(),
            Some("exact fit: residual variance is zero")
        );
    }

    #[test]
    fn test_linear_fit_fields() {
        let params = [1.0, 2.0, 3.0, 4.0, 5.0];
        let success = [2.0, 4.0, 5.0, 4.0, 5.0];
        let report = regress(&params, &success);
        let lin = report.linear.value().unwrap();
        assert_relative_eq!(lin.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(lin.r_squared, 0.6, epsilon = 1e-12);
        assert_eq!(lin.residuals.len(), 5);
        assert!(lin.residual_normality.is_computed());
    }

    #[test]
    fn test_constant_outcome_is_insufficient() {
        let report = regress(&[1.0, 2.0, 3.0], &[50.0, 50.0, 50.0]);
        assert!(!report.linear.is_computed());
        assert!(!report.log_linear.is_computed());
        assert_eq!(report.preferred, None);
    }

    #[test]
    fn test_exact_linear_fit_skips_normality() {
        let params = [1e9, 2e9, 3e9, 4e9, 5e9];
        let success = [20.0, 35.0, 50.0, 65.0, 80.0];
        let lin = regress(&params, &success).linear.value().cloned().unwrap();
        assert_relative_eq!(lin.r_squared, 1.0, epsilon = 1e-12);
        assert!(!lin.residual_normality.is_computed());
    }

    #[test]
    fn test_two_points_skip_normality() {
        let report = regress(&[1.0, 2.0], &[10.0, 30.0]);
        let lin = report.linear.value().unwrap();
        assert_eq!(
            lin.residual_normality.reason(),
            Some("need at least 3 residuals")
        );
    }
}
