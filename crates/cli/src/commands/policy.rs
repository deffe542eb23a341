use anyhow::{Context, Result};
use merchant_config::CachePolicy;

/// Parse a policy string and render it back in canonical form
pub fn execute(policy: &str) -> Result<String> {
    let parsed: CachePolicy = policy
        .parse()
        .with_context(|| format!("invalid cache policy '{policy}'"))?;
    Ok(parsed.to_string())
}
