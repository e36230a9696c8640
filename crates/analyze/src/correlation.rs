//! Correlation of declared size against a performance metric, and its
//! qualitative reading.

use std::fmt;

use serde::Serialize;

use crate::bootstrap::BootstrapSummary;
use crate::outcome::Outcome;

/// Effect-size band of `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Negligible,
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl Strength {
    /// `<0.1` negligible, `<0.3` small, `<0.5` medium, `<0.7` large,
    /// otherwise very large.
    pub fn from_coefficient(r: f64) -> Self {
        let r = r.abs();
        if r < 0.1 {
            Strength::Negligible
        } else if r < 0.3 {
            Strength::Small
        } else if r < 0.5 {
            Strength::Medium
        } else if r < 0.7 {
            Strength::Large
        } else {
            Strength::VeryLarge
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Negligible => "negligible",
            Strength::Small => "small",
            Strength::Medium => "medium",
            Strength::Large => "large",
            Strength::VeryLarge => "very large",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    /// Exactly zero.
    None,
}

impl Direction {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            Direction::Positive
        } else if r < 0.0 {
            Direction::Negative
        } else {
            Direction::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
            Direction::None => "no",
        }
    }
}

/// Human-readable reading of a correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub strength: Strength,
    pub direction: Direction,
    /// `p < alpha`.
    pub significant: bool,
    /// e.g. "large positive correlation (significant)".
    pub description: String,
}

/// Reads a coefficient and its p-value against significance level `alpha`.
pub fn interpret(r: f64, p_value: f64, alpha: f64) -> Interpretation {
    let strength = Strength::from_coefficient(r);
    let direction = Direction::from_coefficient(r);
    let significant = p_value < alpha;
    let description = format!(
        "{} {} correlation ({})",
        strength,
        direction.as_str(),
        if significant {
            "significant"
        } else {
            "not significant"
        }
    );
    Interpretation {
        strength,
        direction,
        significant,
        description,
    }
}

/// One correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestedCorrelation {
    pub coefficient: f64,
    pub p_value: f64,
    pub significant: bool,
}

impl TestedCorrelation {
    fn new(test: lumen_stats::CorrelationTest, alpha: f64) -> Self {
        Self {
            coefficient: test.coefficient,
            p_value: test.p_value,
            significant: test.p_value < alpha,
        }
    }
}

/// Pearson and Spearman correlation of one pair of per-model vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    /// Number of models in the paired vectors.
    pub n: usize,
    pub pearson: TestedCorrelation,
    pub spearman: TestedCorrelation,
    /// Reading of the Pearson coefficient.
    pub interpretation: Interpretation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapSummary>,
}

/// Correlates `x` against `y` (already paired and finite).
///
/// Fewer than two pairs, or a constant vector, yields
/// [`Outcome::InsufficientData`].
pub(crate) fn correlate(x: &[f64], y: &[f64], alpha: f64) -> Outcome<CorrelationReport> {
    if x.len() < 2 {
        return Outcome::insufficient(format!(
            "need at least 2 models with both values, have {}",
            x.len()
        ));
    }
    let (Some(pearson), Some(spearman)) = (
        lumen_stats::pearson_test(x, y),
        lumen_stats::spearman_test(x, y),
    ) else {
        return Outcome::insufficient("no variation in one of the paired vectors");
    };

    Outcome::computed(CorrelationReport {
        n: pearson.n,
        pearson: TestedCorrelation::new(pearson, alpha),
        spearman: TestedCorrelation::new(spearman, alpha),
        interpretation: interpret(pearson.coefficient, pearson.p_value, alpha),
        bootstrap: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strength_bands() {
        assert_eq!(Strength::from_coefficient(0.05), Strength::Negligible);
        assert_eq!(Strength::from_coefficient(-0.1), Strength::Small);
        assert_eq!(Strength::from_coefficient(0.3), Strength::Medium);
        assert_eq!(Strength::from_coefficient(-0.69), Strength::Large);
        assert_eq!(Strength::from_coefficient(0.7), Strength::VeryLarge);
        assert_eq!(Strength::VeryLarge.to_string(), "very large");
    }

    #[test]
    fn test_interpret_description() {
        let i = interpret(0.62, 0.01, 0.05);
        assert_eq!(i.direction, Direction::Positive);
        assert!(i.significant);
        assert_eq!(i.description, "large positive correlation (significant)");

        let i = interpret(-0.2, 0.3, 0.05);
        assert_eq!(i.description, "small negative correlation (not significant)");
    }

    #[test]
    fn test_significance_is_strict() {
        assert!(!interpret(0.5, 0.05, 0.05).significant);
    }

    #[test]
    fn test_correlate_known_values() {
        let report = correlate(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[2.0, 4.0, 5.0, 4.0, 5.0],
            0.05,
        );
        let report = report.value().unwrap();
        assert_eq!(report.n, 5);
        assert_relative_eq!(report.pearson.coefficient, 0.7745966692414834, epsilon = 1e-10);
        assert!(!report.pearson.significant);
        assert_eq!(report.interpretation.strength, Strength::VeryLarge);
        assert!(report.bootstrap.is_none());
    }

    #[test]
    fn test_correlate_insufficient() {
        assert!(!correlate(&[1.0], &[2.0], 0.05).is_computed());
        let constant = correlate(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0], 0.05);
        assert!(constant.reason().unwrap().contains("no variation"));
    }
}
