//! Comparison of hourly success between model families.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

/// Minimum members for a family to take part in the comparison.
const MIN_GROUP_SIZE: usize = 2;

/// Which rank test compared the families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTestKind {
    /// Two families.
    MannWhitneyU,
    /// Three or more families.
    KruskalWallis,
}

/// One family in the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub family: String,
    pub n: usize,
    pub mean_hourly_success_pct: f64,
}

/// Rank test of hourly success across families.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub test: GroupTestKind,
    /// U for the first family (Mann-Whitney) or H (Kruskal-Wallis).
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    /// Families with at least two members, in name order.
    pub groups: Vec<GroupStats>,
    /// Families left out for having a single member.
    pub excluded: Vec<String>,
}

/// Groups `(family, hourly_success_pct)` observations and compares the
/// families that have at least two members.
///
/// Returns `None` when fewer than two families qualify or when the test is
/// undefined because every value is tied.
pub(crate) fn compare_groups<'a>(
    observations: impl IntoIterator<Item = (&'a str, f64)>,
    alpha: f64,
) -> Option<GroupComparison> {
    let mut by_family: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (family, value) in observations {
        by_family.entry(family).or_default().push(value);
    }

    let (qualifying, excluded): (Vec<_>, Vec<_>) = by_family
        .into_iter()
        .partition(|(_, values)| values.len() >= MIN_GROUP_SIZE);
    if qualifying.len() < 2 {
        debug!(
            qualifying = qualifying.len(),
            "not enough families for a group test"
        );
        return None;
    }

    let samples: Vec<&[f64]> = qualifying.iter().map(|(_, v)| v.as_slice()).collect();
    let (test, result) = if samples.len() == 2 {
        (
            GroupTestKind::MannWhitneyU,
            lumen_stats::mann_whitney_u(samples[0], samples[1])?,
        )
    } else {
        (
            GroupTestKind::KruskalWallis,
            lumen_stats::kruskal_wallis(&samples)?,
        )
    };

    let groups = qualifying
        .iter()
        .map(|(family, values)| GroupStats {
            family: family.to_string(),
            n: values.len(),
            mean_hourly_success_pct: lumen_stats::mean(values),
        })
        .collect();

    Some(GroupComparison {
        test,
        statistic: result.statistic,
        p_value: result.p_value,
        significant: result.p_value < alpha,
        groups,
        excluded: excluded.into_iter().map(|(f, _)| f.to_string()).collect(),
    })
}
