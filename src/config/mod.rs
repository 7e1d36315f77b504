// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load check settings from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<PartialConfig> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    parse_config(path, &contents)
}

fn parse_config(path: &Path, contents: &str) -> Result<PartialConfig> {
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    let config = if is_yaml {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")?
    };
    Ok(config)
}
