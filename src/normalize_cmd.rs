//! Normalize command: show what the normaliser makes of one response.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use lumen_normalize::normalize;

use crate::cli::NormalizeArgs;

/// Reads the raw response and prints the normalisation result as JSON.
pub fn run(args: NormalizeArgs) -> Result<()> {
    let _cmd = info_span!("normalize").entered();
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read response: {}", args.input.display()))?;

    let result = normalize(&raw);
    info!(success = result.is_success(), "response normalised");

    let json = serde_json::to_string_pretty(&result).context("failed to serialise result")?;
    println!("{json}");
    Ok(())
}
