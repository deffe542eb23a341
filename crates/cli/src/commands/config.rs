use anyhow::{Context, Result};
use merchant_config::ConfigLoader;
use std::path::Path;

/// Load configuration the way a server would and render it as JSON
pub fn execute(file: Option<&Path>, use_env: bool) -> Result<String> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = file {
        loader = loader.file(path);
    }
    if !use_env {
        loader = loader.without_env();
    }

    let config = loader.load().context("failed to load configuration")?;
    serde_json::to_string_pretty(&config).context("failed to render configuration")
}
