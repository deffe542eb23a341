//! Cache policy: how many verification outcomes to keep, and for how long

use merchant_core::{Error, Result};
use merchant_utils::{format_duration, parse_duration};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const MAX_ENTRIES: &str = "maxEntries";
const TTL: &str = "ttl";

/// Bounds for the authentication cache.
///
/// `None` means unbounded for `max_entries` and "never expires" for `ttl`.
///
/// The string form is a comma-separated list of `key=value` options, for
/// example `maxEntries=10000, ttl=10m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_entries: Option<usize>,
    pub ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: Some(10_000),
            ttl: Some(Duration::from_secs(600)),
        }
    }
}

impl CachePolicy {
    /// A policy with no size bound and no expiry
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_entries: None,
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Parse the `key=value, ...` string form
    pub fn parse(input: &str) -> Result<Self> {
        let mut policy = Self::unbounded();
        let mut seen = HashSet::new();

        for option in input.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = option
                .split_once('=')
                .ok_or_else(|| Error::invalid_policy(option, "expected key=value"))?;
            let (key, value) = (key.trim(), value.trim());

            if !seen.insert(key.to_string()) {
                return Err(Error::invalid_policy(key, "specified more than once"));
            }
            if value.is_empty() {
                return Err(Error::invalid_policy(key, "missing value"));
            }

            match key {
                MAX_ENTRIES => {
                    let max_entries = value.parse::<usize>().map_err(|_| {
                        Error::invalid_policy(key, format!("'{value}' is not a non-negative integer"))
                    })?;
                    policy.max_entries = Some(max_entries);
                }
                TTL => {
                    policy.ttl = Some(parse_duration(value)?);
                }
                _ => {
                    return Err(Error::invalid_policy(
                        key,
                        format!("unrecognized option (expected {MAX_ENTRIES} or {TTL})"),
                    ))
                }
            }
        }

        Ok(policy)
    }
}

impl FromStr for CachePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if let Some(max_entries) = self.max_entries {
            parts.push(format!("{MAX_ENTRIES}={max_entries}"));
        }
        if let Some(ttl) = self.ttl {
            parts.push(format!("{TTL}={}", format_duration(ttl)));
        }
        f.write_str(&parts.join(", "))
    }
}

impl Serialize for CachePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Text(String),
    Fields(PolicyFields),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct PolicyFields {
    max_entries: Option<usize>,
    ttl: Option<String>,
}

impl<'de> Deserialize<'de> for CachePolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;

        match PolicyRepr::deserialize(deserializer)? {
            PolicyRepr::Text(text) => Self::parse(&text).map_err(D::Error::custom),
            PolicyRepr::Fields(fields) => {
                let ttl = fields
                    .ttl
                    .as_deref()
                    .map(parse_duration)
                    .transpose()
                    .map_err(D::Error::custom)?;
                Ok(Self {
                    max_entries: fields.max_entries,
                    ttl,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_full_policy() {
        let policy: CachePolicy = "maxEntries=500, ttl=30s".parse().unwrap();
        assert_eq!(policy.max_entries, Some(500));
        assert_eq!(policy.ttl, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_omitted_options_are_unbounded() {
        assert_eq!(CachePolicy::parse("").unwrap(), CachePolicy::unbounded());
        let policy = CachePolicy::parse("ttl=1h").unwrap();
        assert_eq!(policy.max_entries, None);
        let policy = CachePolicy::parse("maxEntries=3,").unwrap();
        assert_eq!(policy.ttl, None);
    }

    #[test]
    fn test_rejects_bad_options() {
        for bad in [
            "maximumSize=10",
            "maxEntries",
            "maxEntries=",
            "maxEntries=-1",
            "maxEntries=ten",
            "ttl=10",
            "ttl=10w",
            "maxEntries=1, maxEntries=2",
        ] {
            assert!(CachePolicy::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_unknown_option_names_the_option() {
        let err = CachePolicy::parse("maxEntries=10, expireAfterAccess=10m").unwrap_err();
        assert!(err.to_string().contains("expireAfterAccess"));
    }

    #[test]
    fn test_display_is_normalised() {
        let policy = CachePolicy::parse(" ttl = 600s ,maxEntries= 10").unwrap();
        assert_eq!(policy.to_string(), "maxEntries=10, ttl=10m");
        assert_eq!(CachePolicy::default().to_string(), "maxEntries=10000, ttl=10m");
    }

    #[test]
    fn test_deserialize_both_forms() {
        let from_string: CachePolicy = serde_json::from_str(r#""maxEntries=5, ttl=1m""#).unwrap();
        let from_object: CachePolicy =
            serde_json::from_str(r#"{"maxEntries": 5, "ttl": "1m"}"#).unwrap();
        assert_eq!(from_string, from_object);

        assert!(serde_json::from_str::<CachePolicy>(r#"{"maxEntries": 5, "size": 1}"#).is_err());
        assert!(serde_json::from_str::<CachePolicy>(r#"{"ttl": "soon"}"#).is_err());
    }

    proptest! {
        #[test]
        fn test_display_parse_round_trip(
            max_entries in proptest::option::of(0usize..1_000_000),
            ttl_secs in proptest::option::of(0u64..1_000_000),
        ) {
            let policy = CachePolicy {
                max_entries,
                ttl: ttl_secs.map(Duration::from_secs),
            };
            prop_assert_eq!(CachePolicy::parse(&policy.to_string()).unwrap(), policy);
        }
    }
}
