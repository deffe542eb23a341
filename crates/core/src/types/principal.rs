//! Principals as resolved from the principal store

use super::identity::{ApiKey, Authorities};
use super::secret::SecretKey;
use serde::{Deserialize, Serialize};

/// An authenticated identity. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub api_key: ApiKey,
    pub name: Option<String>,
    pub granted_authorities: Authorities,
}

impl Principal {
    pub fn new(api_key: ApiKey, granted_authorities: Authorities) -> Self {
        Self {
            api_key,
            name: None,
            granted_authorities,
        }
    }

    /// Attach a display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when this principal holds every authority in `required`
    #[must_use]
    pub fn has_all_authorities(&self, required: &Authorities) -> bool {
        self.granted_authorities.is_superset_of(required)
    }
}

/// What a principal store hands back: the principal plus its shared secret.
///
/// Only the verifier should ever hold one of these, and only for the duration
/// of a single verification.
#[derive(Debug, Clone)]
pub struct PrincipalRecord {
    pub principal: Principal,
    pub secret_key: SecretKey,
}

impl PrincipalRecord {
    pub fn new(principal: Principal, secret_key: impl Into<SecretKey>) -> Self {
        Self {
            principal,
            secret_key: secret_key.into(),
        }
    }

    /// Split into the principal and its secret
    pub fn into_parts(self) -> (Principal, SecretKey) {
        (self.principal, self.secret_key)
    }
}
