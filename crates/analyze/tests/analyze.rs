//! End-to-end cross-model analysis over aggregated summaries.

use approx::assert_relative_eq;
use lumen_analyze::{
    AnalysisReport, AnalyzeConfig, AnalyzeError, GroupTestKind, Outcome, RegressionKind, analyze,
};
use lumen_normalize::{AllocationVector, HOURS, normalize};
use lumen_score::{
    ModelInfo, ModelSummary, ScenarioResult, ScenarioSpec, ScoreConfig, aggregate, score,
};

fn spec(id: &str) -> ScenarioSpec {
    let optimal = AllocationVector::new(vec![10.0; HOURS]).unwrap();
    ScenarioSpec::new(id, 240.0, vec![0.1; HOURS], vec![50.0; HOURS], optimal).unwrap()
}

/// A response that matches the first `hits` hours and misses the rest.
fn response(hits: usize) -> String {
    let values: Vec<String> = (0..HOURS)
        .map(|h| if h < hits { "10" } else { "11" }.to_string())
        .collect();
    format!("{{\"allocation\": [{}]}}", values.join(","))
}

/// Summary of a model whose scenarios match `hits[i]` hours each. `None`
/// entries are unparseable responses.
fn summary(
    id: &str,
    parameters: u64,
    family: Option<&str>,
    hits: &[Option<usize>],
) -> ModelSummary {
    let config = ScoreConfig::default();
    let results: Vec<ScenarioResult> = hits
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let raw = h.map(response).unwrap_or_default();
            score(id, &normalize(&raw), &spec(&format!("s{i}")), &config).unwrap()
        })
        .collect();
    let mut info = ModelInfo::new(id, parameters);
    if let Some(family) = family {
        info = info.with_family(family);
    }
    aggregate(&info, &results, &config).unwrap()
}

fn config() -> AnalyzeConfig {
    AnalyzeConfig::default().with_bootstrap_iterations(200)
}

#[test]
fn exact_linear_relation_is_recovered() {
    // 25%, 50%, 75% hourly success at 1B, 2B, 3B parameters.
    let summaries = vec![
        summary("small", 1_000_000_000, None, &[Some(6)]),
        summary("mid", 2_000_000_000, None, &[Some(12)]),
        summary("large", 3_000_000_000, None, &[Some(18)]),
    ];
    let stats = analyze(&summaries, &config()).unwrap();
    assert_eq!(stats.n_paired, 3);

    let corr = stats.parameters_vs_hourly_success.value().unwrap();
    assert_relative_eq!(corr.pearson.coefficient, 1.0, epsilon = 1e-12);
    assert_relative_eq!(corr.spearman.coefficient, 1.0, epsilon = 1e-12);
    assert_eq!(corr.pearson.p_value, 0.0);
    assert!(corr.interpretation.significant);

    // A resample drawing one model three times is skipped (3 of 27 draws).
    let boot = corr.bootstrap.as_ref().unwrap();
    assert_eq!(boot.iterations_requested, 200);
    assert!(boot.valid_iterations > 0);
    assert!(boot.valid_iterations < 200);
    let dist = boot.distribution.unwrap();
    assert_relative_eq!(dist.mean, 1.0, epsilon = 1e-9);
    assert_relative_eq!(dist.ci_lower, 1.0, epsilon = 1e-9);

    let linear = stats.regression.linear.value().unwrap();
    assert_relative_eq!(linear.r_squared, 1.0, epsilon = 1e-12);
    assert_relative_eq!(linear.slope, 25.0 / 1e9, epsilon = 1e-18);
    assert_eq!(stats.regression.preferred, Some(RegressionKind::Linear));
}

#[test]
fn single_summary_marks_correlations_insufficient() {
    let summaries = vec![summary("only", 7_000_000_000, Some("llama"), &[Some(24)])];
    let stats = analyze(&summaries, &config()).unwrap();
    assert!(matches!(
        stats.parameters_vs_hourly_success,
        Outcome::InsufficientData { .. }
    ));
    assert!(!stats.regression.linear.is_computed());
    assert!(!stats.regression.log_linear.is_computed());
    assert!(stats.family_comparison.is_none());
    assert!(stats.pairwise.is_empty());

    let desc = stats.descriptive.parameters.value().unwrap();
    assert_eq!(desc.n, 1);
    assert_eq!(desc.sd, None);

    let json = AnalysisReport {
        summaries,
        statistics: stats,
    }
    .to_json()
    .unwrap();
    assert!(json.contains("insufficient_data"));
}

#[test]
fn models_without_scoreable_responses_are_not_paired() {
    let summaries = vec![
        summary("a", 1_000_000_000, None, &[Some(6)]),
        summary("b", 2_000_000_000, None, &[None, None]),
        summary("c", 4_000_000_000, None, &[Some(12)]),
    ];
    let stats = analyze(&summaries, &config()).unwrap();
    assert_eq!(stats.n_models, 3);
    assert_eq!(stats.n_paired, 2);
    assert_eq!(stats.descriptive.hourly_success_pct.value().unwrap().n, 2);
    assert_eq!(stats.descriptive.api_success_pct.value().unwrap().n, 3);

    // Two points: r = 1 but nothing can be said about significance.
    let corr = stats.parameters_vs_hourly_success.value().unwrap();
    assert_eq!(corr.n, 2);
    assert_eq!(corr.pearson.p_value, 1.0);
    assert!(!corr.interpretation.significant);
}

#[test]
fn fixed_seed_is_deterministic() {
    let summaries = vec![
        summary("a", 1_000_000_000, None, &[Some(3)]),
        summary("b", 3_000_000_000, None, &[Some(12)]),
        summary("c", 7_000_000_000, None, &[Some(9)]),
        summary("d", 13_000_000_000, None, &[Some(20)]),
        summary("e", 70_000_000_000, None, &[Some(18)]),
    ];
    let config = config().with_seed(Some(1234));
    let first = analyze(&summaries, &config).unwrap();
    let second = analyze(&summaries, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn family_comparison_needs_two_qualifying_families() {
    let one_family = vec![
        summary("a", 1_000_000_000, Some("llama"), &[Some(6)]),
        summary("b", 2_000_000_000, Some("llama"), &[Some(12)]),
        summary("c", 3_000_000_000, Some("qwen"), &[Some(18)]),
    ];
    let stats = analyze(&one_family, &config()).unwrap();
    assert!(stats.family_comparison.is_none());
    let json = serde_json::to_string(&stats).unwrap();
    assert!(!json.contains("family_comparison"));

    let two_families = vec![
        summary("a", 1_000_000_000, Some("llama"), &[Some(6)]),
        summary("b", 2_000_000_000, Some("llama"), &[Some(12)]),
        summary("c", 3_000_000_000, Some("qwen"), &[Some(18)]),
        summary("d", 4_000_000_000, Some("qwen"), &[Some(24)]),
    ];
    let stats = analyze(&two_families, &config()).unwrap();
    let cmp = stats.family_comparison.unwrap();
    assert_eq!(cmp.test, GroupTestKind::MannWhitneyU);
    assert_eq!(cmp.groups.len(), 2);
    assert_eq!(cmp.groups[0].family, "llama");
    assert_relative_eq!(cmp.groups[0].mean_hourly_success_pct, 37.5);
    // llama ranks 1, 2 -> U = 0
    assert_relative_eq!(cmp.statistic, 0.0);
}

#[test]
fn pairwise_comparisons_use_per_scenario_results() {
    let summaries = vec![
        summary("strong", 8_000_000_000, None, &[Some(24), Some(12), Some(18)]),
        summary("weak", 1_000_000_000, None, &[Some(6), Some(0), Some(12)]),
        summary("one", 2_000_000_000, None, &[Some(6)]),
    ];
    let stats = analyze(&summaries, &config()).unwrap();
    assert_eq!(stats.pairwise.len(), 1);
    let pair = &stats.pairwise[0];
    assert_eq!((pair.model_a.as_str(), pair.model_b.as_str()), ("strong", "weak"));
    // 100/50/75 vs 25/0/50: mean difference 50, pooled sd 25
    assert_relative_eq!(pair.mean_a_pct - pair.mean_b_pct, 50.0, epsilon = 1e-9);
    assert_relative_eq!(pair.cohens_d, 2.0, epsilon = 1e-9);
    assert_eq!(pair.df, 4.0);
}

#[test]
fn precondition_errors() {
    let zero = vec![summary("z", 0, None, &[Some(1)])];
    assert_eq!(
        analyze(&zero, &config()).unwrap_err(),
        AnalyzeError::InvalidParameters {
            model: "z".to_string()
        }
    );

    let dup = vec![
        summary("m", 1, None, &[Some(1)]),
        summary("m", 2, None, &[Some(2)]),
    ];
    assert!(matches!(
        analyze(&dup, &config()),
        Err(AnalyzeError::DuplicateModel { .. })
    ));

    let bad = config().with_alpha(2.0);
    assert!(matches!(
        analyze(&[], &bad),
        Err(AnalyzeError::InvalidAlpha { .. })
    ));
}

#[test]
fn zero_iterations_give_an_empty_bootstrap() {
    let summaries = vec![
        summary("small", 1_000_000_000, None, &[Some(6)]),
        summary("mid", 2_000_000_000, None, &[Some(12)]),
        summary("large", 3_000_000_000, None, &[Some(18)]),
    ];
    let config = AnalyzeConfig::default().with_bootstrap_iterations(0);
    let stats = analyze(&summaries, &config).unwrap();
    let corr = stats.parameters_vs_hourly_success.value().unwrap();
    let boot = corr.bootstrap.as_ref().unwrap();
    assert_eq!(boot.iterations_requested, 0);
    assert_eq!(boot.valid_iterations, 0);
    assert_eq!(boot.distribution, None);
    assert_relative_eq!(corr.pearson.coefficient, 1.0, epsilon = 1e-12);

    assert!(analyze(&[], &config).is_ok());
}

#[test]
fn empty_input_is_not_an_error() {
    let stats = analyze(&[], &config()).unwrap();
    assert_eq!(stats.n_models, 0);
    assert!(!stats.parameters_vs_hourly_success.is_computed());
    assert!(!stats.descriptive.parameters.is_computed());
}
