//! Shapiro-Wilk normality test (Royston's approximation, algorithm AS R94).

use std::f64::consts::PI;

use statrs::distribution::{ContinuousCDF, Normal};

/// Shapiro-Wilk statistic and its p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapiroWilk {
    /// W statistic in `(0, 1]`.
    pub w: f64,
    /// Upper-tail p-value. Small values reject normality.
    pub p_value: f64,
}

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Shapiro-Wilk test of the hypothesis that `data` was drawn from a normal
/// distribution.
///
/// Non-finite values are ignored. Returns `None` with fewer than 3 finite
/// values, more than 5000, or when all values are identical.
pub fn shapiro_wilk(data: &[f64]) -> Option<ShapiroWilk> {
    let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let x = crate::sorted_copy(&finite);
    let n = x.len();
    if !(3..=5000).contains(&n) {
        return None;
    }
    if x[n - 1] - x[0] == 0.0 {
        return None;
    }

    let a = coefficients(n)?;
    let m = crate::mean(&x);
    let ss: f64 = x.iter().map(|v| (v - m) * (v - m)).sum();
    let num: f64 = a.iter().zip(x.iter()).map(|(ai, xi)| ai * xi).sum();
    let w = (num * num / ss).min(1.0);

    Some(ShapiroWilk {
        w,
        p_value: p_value(w, n)?,
    })
}

/// Antisymmetric weights `a_1..a_n` for sorted data.
fn coefficients(n: usize) -> Option<Vec<f64>> {
    if n == 3 {
        let h = 0.5f64.sqrt();
        return Some(vec![-h, 0.0, h]);
    }

    let normal = Normal::new(0.0, 1.0).ok()?;
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2: f64 = m.iter().map(|v| v * v).sum();
    let ssumm2 = summ2.sqrt();
    let u = 1.0 / nf.sqrt();

    let mut a = vec![0.0; n];
    let an = m[n - 1] / ssumm2 + poly(&C1, u);
    if n > 5 {
        let an1 = m[n - 2] / ssumm2 + poly(&C2, u);
        let phi = (summ2 - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * an * an - 2.0 * an1 * an1);
        let root = phi.sqrt();
        for (ai, mi) in a[2..n - 2].iter_mut().zip(&m[2..n - 2]) {
            *ai = mi / root;
        }
        a[0] = -an;
        a[1] = -an1;
        a[n - 2] = an1;
        a[n - 1] = an;
    } else {
        let phi = (summ2 - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * an * an);
        let root = phi.sqrt();
        for (ai, mi) in a[1..n - 1].iter_mut().zip(&m[1..n - 1]) {
            *ai = mi / root;
        }
        a[0] = -an;
        a[n - 1] = an;
    }
    Some(a)
}

fn p_value(w: f64, n: usize) -> Option<f64> {
    if w >= 1.0 {
        return Some(1.0);
    }
    if n == 3 {
        // Exact distribution for three observations.
        let p = 6.0 / PI * (w.sqrt().asin() - PI / 3.0);
        return Some(p.clamp(0.0, 1.0));
    }

    let normal = Normal::new(0.0, 1.0).ok()?;
    let nf = n as f64;
    let w1 = (1.0 - w).ln();
    let z = if n <= 11 {
        let gamma = poly(&G, nf);
        if gamma - w1 <= 0.0 {
            return Some(0.0);
        }
        let y = -(gamma - w1).ln();
        let mu = poly(&C3, nf);
        let sigma = poly(&C4, nf).exp();
        (y - mu) / sigma
    } else {
        let ln_n = nf.ln();
        let mu = poly(&C5, ln_n);
        let sigma = poly(&C6, ln_n).exp();
        (w1 - mu) / sigma
    };
    Some(normal.sf(z))
}
