//! Identifier newtypes: API keys and authorities

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier used to look up a principal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new ApiKey, rejecting empty or whitespace-only values
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::validation("api_key", "API key cannot be empty"));
        }
        Ok(Self(key))
    }

    /// Create an ApiKey without validation (use only when input is already validated)
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generate a fresh random 128-bit key
    #[must_use]
    pub fn generate() -> Self {
        Self::from(Uuid::new_v4())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for ApiKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }
}

impl Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ApiKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for ApiKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// A named permission, e.g. `ADMIN` or `CUSTOMER`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Authority(String);

impl Authority {
    /// Get the authority name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Authority {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Authority {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of authorities.
///
/// Ordering keeps hashing and equality independent of insertion order, which
/// matters because authority sets are part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authorities(BTreeSet<Authority>);

impl Authorities {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add an authority, returning whether it was newly inserted
    pub fn insert(&mut self, authority: impl Into<Authority>) -> bool {
        self.0.insert(authority.into())
    }

    /// Check membership by name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|a| a.as_str() == name)
    }

    /// True when every authority in `required` is also in `self`
    #[must_use]
    pub fn is_superset_of(&self, required: &Authorities) -> bool {
        self.0.is_superset(&required.0)
    }

    /// Authorities in `required` that `self` lacks
    pub fn missing_from<'a>(&'a self, required: &'a Authorities) -> impl Iterator<Item = &'a Authority> {
        required.0.difference(&self.0)
    }

    /// Number of authorities
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in name order
    pub fn iter(&self) -> impl Iterator<Item = &Authority> {
        self.0.iter()
    }
}

impl<A: Into<Authority>> FromIterator<A> for Authorities {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Authority>, const N: usize> From<[A; N]> for Authorities {
    fn from(names: [A; N]) -> Self {
        names.into_iter().collect()
    }
}

impl Display for Authorities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Authority::as_str).collect();
        write!(f, "{{{}}}", names.join(","))
    }
}
