//! Authentication configuration

use crate::policy::CachePolicy;
use merchant_utils::{format_duration, parse_duration};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on a single principal store lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the verifier and its cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AuthConfig {
    /// Cache bounds, in either string or object form
    #[serde(default)]
    pub cache_policy: CachePolicy,
    /// Upper bound on one store lookup; `null` disables the bound
    #[serde(default = "default_lookup_timeout", with = "optional_duration")]
    pub lookup_timeout: Option<Duration>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::default(),
            lookup_timeout: default_lookup_timeout(),
        }
    }
}

impl AuthConfig {
    /// Parse from a JSON document. Unknown fields are an error.
    pub fn from_json(json: &str) -> merchant_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_lookup_timeout() -> Option<Duration> {
    Some(DEFAULT_LOOKUP_TIMEOUT)
}

mod optional_duration {
    use super::{format_duration, parse_duration};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_str(&format_duration(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        use serde::de::Error as _;

        Option::<String>::deserialize(deserializer)?
            .as_deref()
            .map(parse_duration)
            .transpose()
            .map_err(D::Error::custom)
    }
}

/// Builder for [`AuthConfig`]
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache policy
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.config.cache_policy = policy;
        self
    }

    /// Bound each store lookup
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.config.lookup_timeout = Some(timeout);
        self
    }

    /// Remove the bound on store lookups
    pub fn no_lookup_timeout(mut self) -> Self {
        self.config.lookup_timeout = None;
        self
    }

    pub fn build(self) -> AuthConfig {
        self.config
    }
}
