//! Protected-endpoint contract
//!
//! Request handling extracts the signed parts of a request into a
//! [`SignedRequest`]; a route declares what it needs with [`RestrictedTo`].
//! The guard adds the route's authorities, runs the authenticator and maps the
//! result onto an outward status without any detail about why it failed.

use crate::verifier::Authenticator;
use merchant_core::{ApiKey, AuthenticationOutcome, Authorities, Credentials, Principal};
use thiserror::Error;
use tracing::debug;

/// Realm advertised in authentication challenges
pub const DEFAULT_REALM: &str = "REST";

/// The signature-bearing parts of one inbound request
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub api_key: ApiKey,
    pub algorithm: String,
    pub canonical_representation: Vec<u8>,
    pub digest: Vec<u8>,
}

/// Why access was refused, as visible to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("authentication failed")]
    Unauthenticated,

    #[error("authentication temporarily unavailable")]
    Unavailable,
}

impl AccessDenied {
    /// HTTP status to respond with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            AccessDenied::Unauthenticated => 401,
            AccessDenied::Unavailable => 503,
        }
    }

    /// Whether the client may retry the same request unchanged
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, AccessDenied::Unavailable)
    }
}

/// Authorities a route requires
#[derive(Debug, Clone)]
pub struct RestrictedTo {
    required: Authorities,
    realm: String,
}

impl RestrictedTo {
    pub fn new(required: impl Into<Authorities>) -> Self {
        Self {
            required: required.into(),
            realm: DEFAULT_REALM.to_string(),
        }
    }

    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn required_authorities(&self) -> &Authorities {
        &self.required
    }

    /// Value for a `WWW-Authenticate` header on a 401
    #[must_use]
    pub fn challenge(&self) -> String {
        format!("HMAC realm=\"{}\"", self.realm)
    }

    /// Build credentials for this route from the request parts
    pub fn credentials(&self, request: SignedRequest) -> Credentials {
        Credentials::builder(request.api_key)
            .algorithm(request.algorithm)
            .canonical_representation(request.canonical_representation)
            .digest(request.digest)
            .required_authorities(self.required.clone())
            .build()
    }

    /// Authenticate the request, returning the principal to attach to the
    /// request context
    pub async fn authorize<A>(
        &self,
        authenticator: &A,
        request: SignedRequest,
    ) -> Result<Principal, AccessDenied>
    where
        A: Authenticator + ?Sized,
    {
        let credentials = self.credentials(request);
        match authenticator.authenticate(&credentials).await {
            Ok(AuthenticationOutcome::Authenticated(principal)) => Ok(principal),
            Ok(AuthenticationOutcome::Rejected) => Err(AccessDenied::Unauthenticated),
            Err(unavailable) => {
                debug!(reason = unavailable.reason(), "authentication unavailable");
                Err(AccessDenied::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::HmacAlgorithm;
    use crate::store::{InMemoryPrincipalStore, PrincipalStore};
    use crate::verifier::CredentialVerifier;
    use async_trait::async_trait;
    use merchant_core::{PrincipalRecord, StoreError};

    fn request(secret: &[u8]) -> SignedRequest {
        let message = b"GET /customers/carts".to_vec();
        SignedRequest {
            api_key: ApiKey::new_unchecked("u1"),
            algorithm: "HmacSHA256".to_string(),
            digest: HmacAlgorithm::Sha256.sign(&message, secret).unwrap(),
            canonical_representation: message,
        }
    }

    fn verifier() -> CredentialVerifier<InMemoryPrincipalStore> {
        let principal = Principal::new(ApiKey::new_unchecked("u1"), Authorities::from(["CUSTOMER"]))
            .with_name("Alice");
        CredentialVerifier::new([PrincipalRecord::new(principal, "s3cr3t")].into_iter().collect())
    }

    #[tokio::test]
    async fn test_authorized_request_yields_principal() {
        let guard = RestrictedTo::new(["CUSTOMER"]);
        let principal = guard.authorize(&verifier(), request(b"s3cr3t")).await.unwrap();
        assert_eq!(principal.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let admin_only = RestrictedTo::new(["ADMIN"]);
        let customer = RestrictedTo::new(["CUSTOMER"]);

        let missing_authority = admin_only
            .authorize(&verifier(), request(b"s3cr3t"))
            .await
            .unwrap_err();
        let bad_signature = customer
            .authorize(&verifier(), request(b"guess"))
            .await
            .unwrap_err();

        assert_eq!(missing_authority, bad_signature);
        assert_eq!(bad_signature.status_code(), 401);
        assert!(!bad_signature.is_retryable());
        assert_eq!(bad_signature.to_string(), "authentication failed");
        assert_eq!(customer.challenge(), "HMAC realm=\"REST\"");
    }

    struct DownStore;

    #[async_trait]
    impl PrincipalStore for DownStore {
        async fn find_by_api_key(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Option<PrincipalRecord>, StoreError> {
            Err(StoreError::unreachable("database offline"))
        }
    }

    #[tokio::test]
    async fn test_store_outage_is_retryable() {
        let guard = RestrictedTo::new(["CUSTOMER"]).with_realm("admin");
        let denied = guard
            .authorize(&CredentialVerifier::new(DownStore), request(b"s3cr3t"))
            .await
            .unwrap_err();
        assert_eq!(denied, AccessDenied::Unavailable);
        assert_eq!(denied.status_code(), 503);
        assert!(denied.is_retryable());
        assert_eq!(guard.challenge(), "HMAC realm=\"admin\"");
    }

    #[test]
    fn test_route_authorities_are_stamped_in() {
        let guard = RestrictedTo::new(["ADMIN", "SUPPORT"]);
        let credentials = guard.credentials(request(b"s3cr3t"));
        assert_eq!(credentials.required_authorities(), guard.required_authorities());
        assert_eq!(credentials.algorithm(), "HmacSHA256");
    }
}
