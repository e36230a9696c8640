//! Evaluate command: score, aggregate and analyse every configured model.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use lumen_analyze::{AnalysisReport, analyze};
use lumen_score::{
    GroundTruth, ModelInfo, ModelSummary, ResponseRecord, ScenarioResult, ScoreConfig, aggregate,
    score_record,
};

use crate::cli::EvaluateArgs;
use crate::config::LumenConfig;
use crate::convert;
use crate::load;
use crate::report;

fn resolve(cli: Option<PathBuf>, file: Option<&PathBuf>, what: &str) -> Result<PathBuf> {
    cli.or_else(|| file.cloned()).ok_or_else(|| {
        anyhow!("no {what} path: set [io].{what} in config or pass it on the command line")
    })
}

/// Groups records by model id, keeping file order within each model.
fn group_by_model(records: &[ResponseRecord]) -> BTreeMap<&str, Vec<&ResponseRecord>> {
    let mut grouped: BTreeMap<&str, Vec<&ResponseRecord>> = BTreeMap::new();
    for r in records {
        grouped.entry(r.model_id.as_str()).or_default().push(r);
    }
    grouped
}

/// Scores and aggregates one model's responses.
fn evaluate_model(
    model: &ModelInfo,
    records: &[&ResponseRecord],
    truth: &impl GroundTruth,
    config: &ScoreConfig,
) -> Result<ModelSummary> {
    let results = records
        .iter()
        .map(|r| score_record(r, truth, config))
        .collect::<Result<Vec<ScenarioResult>, _>>()
        .with_context(|| format!("failed to score model '{}'", model.id))?;
    let summary = aggregate(model, &results, config)
        .with_context(|| format!("failed to aggregate model '{}'", model.id))?;
    debug!(
        model = %model.id,
        scoreable = summary.scoreable_count,
        total = summary.total,
        "model evaluated"
    );
    Ok(summary)
}

/// Run the full evaluation pipeline.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: LumenConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let score_cfg = convert::build_score_config(&config.scoring)?;
    let analyze_cfg = convert::build_analyze_config(&config.analysis, args.seed)?;
    let models = convert::build_models(&config.models)?;

    // 2. Read inputs
    let gt_path = resolve(args.ground_truth, config.io.ground_truth.as_ref(), "ground_truth")?;
    let responses_path = resolve(args.responses, config.io.responses.as_ref(), "responses")?;
    let truth = load::load_ground_truth(&gt_path)?;
    let records = load::load_responses(&responses_path)?;

    let grouped = group_by_model(&records);
    let configured: BTreeSet<&str> = models.iter().map(|m| m.id.as_str()).collect();
    for (model_id, recs) in &grouped {
        if !configured.contains(model_id) {
            warn!(
                model = %model_id,
                records = recs.len(),
                "responses for unconfigured model ignored"
            );
        }
    }

    // 3. Score and aggregate, one task per model; results keep config order
    info!(models = models.len(), "scoring responses");
    let summaries = models
        .par_iter()
        .map(|model| {
            let recs = grouped
                .get(model.id.as_str())
                .ok_or_else(|| anyhow!("no responses found for model '{}'", model.id))?;
            evaluate_model(model, recs, &truth, &score_cfg)
        })
        .collect::<Result<Vec<_>>>()?;

    // 4. Cross-model statistics
    info!("running cross-model analysis");
    let statistics = analyze(&summaries, &analyze_cfg).context("cross-model analysis failed")?;

    // 5. Outputs
    if let Some(summary_path) = args.summary.or(config.io.summary) {
        let labels: BTreeMap<String, String> = config
            .models
            .iter()
            .map(|m| (m.id.clone(), m.label().to_string()))
            .collect();
        let markdown = report::markdown_summary(&summaries, &statistics, &labels);
        write_file(&summary_path, &markdown, "summary")?;
    }

    let json = AnalysisReport {
        summaries,
        statistics,
    }
    .to_json()
    .context("failed to serialise report")?;

    match args.output.or(config.io.output) {
        Some(path) => write_file(&path, &json, "report")?,
        None => println!("{json}"),
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str, what: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {what}: {}", path.display()))?;
    info!(path = %path.display(), "{what} written");
    Ok(())
}
