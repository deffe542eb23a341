//! Authentication outcomes

use super::principal::Principal;
use std::fmt;

/// Result of verifying one set of credentials.
///
/// There is deliberately no reason attached to `Rejected`; see [`Rejection`]
/// for the internal-only classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated(Principal),
    Rejected,
}

impl AuthenticationOutcome {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthenticationOutcome::Authenticated(_))
    }

    /// The authenticated principal, if any
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthenticationOutcome::Authenticated(principal) => Some(principal),
            AuthenticationOutcome::Rejected => None,
        }
    }

    pub fn into_principal(self) -> Option<Principal> {
        match self {
            AuthenticationOutcome::Authenticated(principal) => Some(principal),
            AuthenticationOutcome::Rejected => None,
        }
    }
}

/// Why a credential was rejected. For diagnostics and audit only, never
/// returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    UnknownApiKey,
    InsufficientAuthorities,
    UnsupportedAlgorithm,
    SignatureMismatch,
}

impl Rejection {
    /// Stable label used as a structured log field
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::UnknownApiKey => "unknown_api_key",
            Rejection::InsufficientAuthorities => "insufficient_authorities",
            Rejection::UnsupportedAlgorithm => "unsupported_algorithm",
            Rejection::SignatureMismatch => "signature_mismatch",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
