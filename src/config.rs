use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Lumen configuration (`lumen.toml`).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LumenConfig {
    /// Input and output paths.
    #[serde(default)]
    pub io: IoConfig,

    /// Scorer and aggregator settings.
    #[serde(default)]
    pub scoring: ScoringToml,

    /// Cross-model analysis settings.
    #[serde(default)]
    pub analysis: AnalysisToml,

    /// Models under evaluation, in report order.
    #[serde(default)]
    pub models: Vec<ModelToml>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub responses: Option<PathBuf>,
    pub ground_truth: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringToml {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_penalty")]
    pub penalty: f64,
}

impl Default for ScoringToml {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            penalty: default_penalty(),
        }
    }
}

fn default_tolerance() -> f64 {
    lumen_score::DEFAULT_TOLERANCE
}
fn default_penalty() -> f64 {
    lumen_score::DEFAULT_PENALTY
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisToml {
    #[serde(default = "default_bootstrap_iterations")]
    pub bootstrap_iterations: usize,
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
    /// Draw the bootstrap seed from OS entropy, ignoring `seed`.
    #[serde(default)]
    pub random_seed: bool,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for AnalysisToml {
    fn default() -> Self {
        Self {
            bootstrap_iterations: default_bootstrap_iterations(),
            seed: default_seed(),
            random_seed: false,
            alpha: default_alpha(),
        }
    }
}

fn default_bootstrap_iterations() -> usize {
    1000
}
fn default_seed() -> Option<u64> {
    Some(42)
}
fn default_alpha() -> f64 {
    0.05
}

/// One `[[models]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    /// Identifier used in the responses file.
    pub id: String,
    /// Declared parameter count, e.g. `7_000_000_000`.
    pub parameters: u64,
    #[serde(default)]
    pub family: Option<String>,
    /// Name used in the Markdown summary; falls back to `id`.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ModelToml {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: LumenConfig = toml::from_str("").unwrap();
        assert!(config.io.responses.is_none());
        assert_eq!(config.scoring.tolerance, 1e-6);
        assert_eq!(config.scoring.penalty, 10_000.0);
        assert_eq!(config.analysis.bootstrap_iterations, 1000);
        assert_eq!(config.analysis.seed, Some(42));
        assert!(!config.analysis.random_seed);
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_full_config() {
        let src = r#"
            [io]
            responses = "data/responses.json"
            ground_truth = "data/ground_truth.json"

            [scoring]
            tolerance = 0.5

            [analysis]
            bootstrap_iterations = 250
            seed = 7

            [[models]]
            id = "llama3.1:8b"
            parameters = 8_000_000_000
            family = "llama"
            display_name = "Llama 3.1 8B"

            [[models]]
            id = "phi3:mini"
            parameters = 3_800_000_000
        "#;
        let config: LumenConfig = toml::from_str(src).unwrap();
        assert_eq!(
            config.io.ground_truth.as_deref(),
            Some(std::path::Path::new("data/ground_truth.json"))
        );
        assert_eq!(config.scoring.tolerance, 0.5);
        assert_eq!(config.scoring.penalty, 10_000.0);
        assert_eq!(config.analysis.seed, Some(7));
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].label(), "Llama 3.1 8B");
        assert_eq!(config.models[1].label(), "phi3:mini");
        assert_eq!(config.models[1].family, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = toml::from_str::<LumenConfig>("[scoring]\ntolerence = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("tolerence"));
    }
}
