//! Credential verification
//!
//! Given a credential, the verifier:
//!
//! 1. resolves the principal from the [`PrincipalStore`],
//! 2. checks the principal holds every required authority,
//! 3. recomputes the signature over the canonical bytes with the principal's
//!    secret,
//! 4. compares it with the supplied digest in constant time.
//!
//! Every failure in steps 1-4 collapses to [`AuthenticationOutcome::Rejected`].
//! Only store failures are reported as errors.

use crate::constant_time::constant_time_eq;
use crate::signature::{SignatureEngine, SignatureError};
use crate::store::PrincipalStore;
use async_trait::async_trait;
use merchant_core::{
    ApiKey, AuthenticationOutcome, Credentials, Principal, PrincipalRecord, Rejection, StoreError,
    VerificationUnavailable,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, debug_span, warn, Instrument};

/// Anything that turns credentials into an outcome.
///
/// Implemented by [`CredentialVerifier`] and by caching wrappers around it.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationOutcome, VerificationUnavailable>;
}

#[async_trait]
impl<T: Authenticator + ?Sized> Authenticator for Arc<T> {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationOutcome, VerificationUnavailable> {
        (**self).authenticate(credentials).await
    }
}

/// Verification result with the internal reason retained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(Principal),
    Denied(Rejection),
}

impl Verdict {
    /// Drop the reason, leaving only what a caller may see
    pub fn into_outcome(self) -> AuthenticationOutcome {
        match self {
            Verdict::Accepted(principal) => AuthenticationOutcome::Authenticated(principal),
            Verdict::Denied(_) => AuthenticationOutcome::Rejected,
        }
    }
}

pub struct CredentialVerifier<S> {
    store: S,
    lookup_timeout: Option<Duration>,
}

impl<S: PrincipalStore> CredentialVerifier<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lookup_timeout: None,
        }
    }

    /// Bound each store lookup. An elapsed lookup is reported as unavailable.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Verify credentials, collapsing every rejection reason
    pub async fn verify(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationOutcome, VerificationUnavailable> {
        Ok(self.verify_detailed(credentials).await?.into_outcome())
    }

    /// Verify credentials and keep the rejection reason, for audit trails
    pub async fn verify_detailed(
        &self,
        credentials: &Credentials,
    ) -> Result<Verdict, VerificationUnavailable> {
        let span = debug_span!("verify_credentials", api_key = %credentials.api_key());
        async move {
            let verdict = match self.lookup(credentials.api_key()).await? {
                None => Verdict::Denied(Rejection::UnknownApiKey),
                Some(record) => check(credentials, record),
            };

            match &verdict {
                Verdict::Accepted(_) => debug!("credentials verified"),
                Verdict::Denied(Rejection::UnsupportedAlgorithm) => warn!(
                    reason = Rejection::UnsupportedAlgorithm.as_str(),
                    algorithm = %credentials.algorithm(),
                    "credentials rejected"
                ),
                Verdict::Denied(reason) => debug!(reason = reason.as_str(), "credentials rejected"),
            }
            Ok(verdict)
        }
        .instrument(span)
        .await
    }

    async fn lookup(&self, api_key: &ApiKey) -> Result<Option<PrincipalRecord>, VerificationUnavailable> {
        let lookup = self.store.find_by_api_key(api_key);
        let result = match self.lookup_timeout {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::timeout(limit)),
            },
            None => lookup.await,
        };

        result.map_err(|error| {
            warn!(%error, "principal store lookup failed");
            VerificationUnavailable::from(error)
        })
    }
}

/// Steps 2-4. Consumes the record so the secret is dropped on return.
fn check(credentials: &Credentials, record: PrincipalRecord) -> Verdict {
    let (principal, secret_key) = record.into_parts();

    if !principal.has_all_authorities(credentials.required_authorities()) {
        return Verdict::Denied(Rejection::InsufficientAuthorities);
    }

    let expected = match SignatureEngine::compute_signature(
        credentials.algorithm(),
        credentials.canonical_representation(),
        secret_key.expose_secret(),
    ) {
        Ok(signature) => signature,
        Err(SignatureError::UnsupportedAlgorithm { .. }) => {
            return Verdict::Denied(Rejection::UnsupportedAlgorithm)
        }
        Err(SignatureError::InvalidKey { .. }) => {
            return Verdict::Denied(Rejection::SignatureMismatch)
        }
    };
    drop(secret_key);

    if constant_time_eq(&expected, credentials.digest()) {
        Verdict::Accepted(principal)
    } else {
        Verdict::Denied(Rejection::SignatureMismatch)
    }
}

#[async_trait]
impl<S: PrincipalStore> Authenticator for CredentialVerifier<S> {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationOutcome, VerificationUnavailable> {
        self.verify(credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::HmacAlgorithm;
    use crate::store::InMemoryPrincipalStore;
    use merchant_core::{Authorities, CredentialsBuilder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "s3cr3t";
    const MESSAGE: &[u8] = b"GET /items";

    fn store() -> InMemoryPrincipalStore {
        let principal = Principal::new(
            ApiKey::new_unchecked("u1"),
            Authorities::from(["CUSTOMER", "ADMIN"]),
        );
        [PrincipalRecord::new(principal, SECRET)].into_iter().collect()
    }

    fn signed(required: impl Into<Authorities>) -> CredentialsBuilder {
        let digest = HmacAlgorithm::Sha256.sign(MESSAGE, SECRET.as_bytes()).unwrap();
        Credentials::builder(ApiKey::new_unchecked("u1"))
            .algorithm("HmacSHA256")
            .canonical_representation(MESSAGE.to_vec())
            .digest(digest)
            .required_authorities(required)
    }

    #[tokio::test]
    async fn test_valid_signature_authenticates() {
        let verifier = CredentialVerifier::new(store());
        let outcome = verifier.verify(&signed(["CUSTOMER"]).build()).await.unwrap();
        let principal = outcome.principal().unwrap();
        assert_eq!(principal.api_key.as_str(), "u1");
        assert!(principal.granted_authorities.contains("ADMIN"));
    }

    #[tokio::test]
    async fn test_flipped_digest_is_rejected() {
        let verifier = CredentialVerifier::new(store());
        let mut digest = HmacAlgorithm::Sha256.sign(MESSAGE, SECRET.as_bytes()).unwrap();
        if let Some(last) = digest.last_mut() {
            *last ^= 0x01;
        }
        let credentials = signed(["CUSTOMER"]).digest(digest).build();

        let verdict = verifier.verify_detailed(&credentials).await.unwrap();
        assert_eq!(verdict, Verdict::Denied(Rejection::SignatureMismatch));
        assert_eq!(verdict.into_outcome(), AuthenticationOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_missing_authority_is_rejected_despite_valid_signature() {
        let verifier = CredentialVerifier::new(store());
        let verdict = verifier
            .verify_detailed(&signed(["ADMIN", "SUPPORT"]).build())
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Denied(Rejection::InsufficientAuthorities));
    }

    #[tokio::test]
    async fn test_unknown_key_and_algorithm_are_rejected() {
        let verifier = CredentialVerifier::new(store());

        let unknown = Credentials::builder(ApiKey::new_unchecked("nobody"))
            .algorithm("HmacSHA256")
            .build();
        assert_eq!(
            verifier.verify_detailed(&unknown).await.unwrap(),
            Verdict::Denied(Rejection::UnknownApiKey)
        );

        let md5 = signed(["CUSTOMER"]).algorithm("HmacMD5").build();
        assert_eq!(
            verifier.verify_detailed(&md5).await.unwrap(),
            Verdict::Denied(Rejection::UnsupportedAlgorithm)
        );
        assert_eq!(verifier.verify(&md5).await.unwrap(), AuthenticationOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_message_or_key_bit_flip_is_rejected() {
        let verifier = CredentialVerifier::new(store());

        let tampered = signed(["CUSTOMER"])
            .canonical_representation(b"GET /itemr".to_vec())
            .build();
        assert!(!verifier.verify(&tampered).await.unwrap().is_authenticated());

        let wrong_key = HmacAlgorithm::Sha256.sign(MESSAGE, b"s3cr3u").unwrap();
        let forged = signed(["CUSTOMER"]).digest(wrong_key).build();
        assert!(!verifier.verify(&forged).await.unwrap().is_authenticated());
    }

    struct FailingStore;

    #[async_trait]
    impl PrincipalStore for FailingStore {
        async fn find_by_api_key(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Option<PrincipalRecord>, StoreError> {
            Err(StoreError::unreachable("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable_not_rejected() {
        let verifier = CredentialVerifier::new(FailingStore);
        let err = verifier.verify(&signed(["CUSTOMER"]).build()).await.unwrap_err();
        assert!(err.reason().contains("connection refused"));
    }

    struct HangingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrincipalStore for HangingStore {
        async fn find_by_api_key(
            &self,
            _api_key: &ApiKey,
        ) -> Result<Option<PrincipalRecord>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_timeout_is_unavailable() {
        let store = Arc::new(HangingStore {
            calls: AtomicUsize::new(0),
        });
        let verifier = CredentialVerifier::new(store.clone())
            .with_lookup_timeout(Some(Duration::from_millis(200)));

        let err = verifier.verify(&signed(["CUSTOMER"]).build()).await.unwrap_err();
        assert!(err.reason().contains("timed out"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
