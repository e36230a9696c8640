//! Ordinary least squares for a single predictor.

/// A fitted simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    /// Fitted intercept.
    pub intercept: f64,
    /// Fitted slope.
    pub slope: f64,
    /// Standard error of the slope. `None` with fewer than 3 points.
    pub slope_se: Option<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Observed minus fitted, in input order.
    pub residuals: Vec<f64>,
    /// Residual standard deviation, `sqrt(SSR / (n - 2))`. `None` with fewer
    /// than 3 points.
    pub residual_sd: Option<f64>,
    /// Root mean squared residual, `sqrt(SSR / n)`.
    pub rmse: f64,
}

impl LinearFit {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits `y = b0 + b1 * x` by least squares.
///
/// Returns `None` if the slices differ in length, hold fewer than 2 points,
/// contain non-finite values, or if either `x` or `y` is constant.
pub fn ols(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return None;
    }

    let n = x.len() as f64;
    let mx = crate::mean(x);
    let my = crate::mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mx;
        let dy = yi - my;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let residuals: Vec<f64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| yi - (intercept + slope * xi))
        .collect();
    let ssr: f64 = residuals.iter().map(|r| r * r).sum();
    let r_squared = 1.0 - ssr / syy;

    let (slope_se, residual_sd) = if x.len() > 2 {
        let s2 = ssr / (n - 2.0);
        (Some((s2 / sxx).sqrt()), Some(s2.sqrt()))
    } else {
        (None, None)
    };

    Some(LinearFit {
        intercept,
        slope,
        slope_se,
        r_squared,
        residuals,
        residual_sd,
        rmse: (ssr / n).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let x = [7.0, 70.0, 200.0, 671.0];
        let y: Vec<f64> = x.iter().map(|v| 5.0 + 0.1 * v).collect();
        let fit = ols(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.1, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 5.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(fit.slope_se.unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(fit.predict(10.0), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_known_fit() {
        // x = 1..5, y = [2, 4, 5, 4, 5]: slope 0.6, intercept 2.2,
        // SSR = 2.4, SST = 6 -> R^2 = 0.6
        let fit = ols(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared, 0.6, epsilon = 1e-12);
        // s^2 = 2.4 / 3 = 0.8; se = sqrt(0.8 / 10)
        assert_relative_eq!(fit.slope_se.unwrap(), 0.08f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(fit.residual_sd.unwrap(), 0.8f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(fit.rmse, (2.4f64 / 5.0).sqrt(), epsilon = 1e-12);
        assert_eq!(fit.residuals.len(), 5);
        assert_relative_eq!(fit.residuals.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_points_have_no_standard_errors() {
        let fit = ols(&[1.0, 3.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(fit.slope, 5.0, epsilon = 1e-12);
        assert!(fit.slope_se.is_none());
        assert!(fit.residual_sd.is_none());
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(ols(&[1.0], &[2.0]).is_none());
        assert!(ols(&[1.0, 2.0], &[2.0]).is_none());
        assert!(ols(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(ols(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).is_none());
        assert!(ols(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]).is_none());
    }
}
