//! Configuration loader
//!
//! Precedence, lowest to highest: built-in defaults, the JSON file (when one
//! is given), then environment variables.

use crate::config::AuthConfig;
use crate::policy::CachePolicy;
use merchant_core::{Error, Result, ResultExt};
use merchant_utils::parse_duration;
use std::path::PathBuf;
use tracing::{debug, info};

/// Overrides the cache policy, in string form
pub const ENV_CACHE_POLICY: &str = "MERCHANT_AUTH_CACHE_POLICY";
/// Overrides the store lookup timeout; `off` disables it
pub const ENV_LOOKUP_TIMEOUT: &str = "MERCHANT_AUTH_LOOKUP_TIMEOUT";

/// Loads [`AuthConfig`] at startup
#[derive(Debug)]
pub struct ConfigLoader {
    /// Optional JSON file to read
    file: Option<PathBuf>,
    /// Whether environment variables are consulted
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Read settings from this JSON file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore environment variable overrides
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<AuthConfig> {
        let mut config = match &self.file {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| Error::file_system(path, "read", e))?;
                AuthConfig::from_json(&contents)
                    .with_context(|| format!("failed to load {}", path.display()))?
            }
            None => AuthConfig::default(),
        };

        if self.use_env {
            apply_env_overrides(&mut config)?;
        }

        info!(
            cache_policy = %config.cache_policy,
            lookup_timeout = ?config.lookup_timeout,
            "loaded authentication config"
        );
        Ok(config)
    }
}

fn apply_env_overrides(config: &mut AuthConfig) -> Result<()> {
    if let Ok(policy) = std::env::var(ENV_CACHE_POLICY) {
        debug!(variable = ENV_CACHE_POLICY, "overriding cache policy from environment");
        config.cache_policy = CachePolicy::parse(&policy).context(ENV_CACHE_POLICY)?;
    }

    if let Ok(timeout) = std::env::var(ENV_LOOKUP_TIMEOUT) {
        debug!(variable = ENV_LOOKUP_TIMEOUT, "overriding lookup timeout from environment");
        config.lookup_timeout = match timeout.trim() {
            "off" | "none" => None,
            literal => Some(parse_duration(literal).context(ENV_LOOKUP_TIMEOUT)?),
        };
    }

    Ok(())
}
