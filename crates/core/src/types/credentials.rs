//! Signed request credentials

use super::identity::{ApiKey, Authorities};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// The credential presented with one request.
///
/// Equality and hashing cover every field that can change the verification
/// outcome, so two credentials differing in any field are distinct cache keys.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    api_key: ApiKey,
    algorithm: String,
    canonical_representation: Vec<u8>,
    digest: Vec<u8>,
    required_authorities: Authorities,
}

impl Credentials {
    /// Start building credentials for `api_key`
    pub fn builder(api_key: ApiKey) -> CredentialsBuilder {
        CredentialsBuilder::new(api_key)
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Algorithm identifier exactly as the client supplied it
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The bytes the client signed
    pub fn canonical_representation(&self) -> &[u8] {
        &self.canonical_representation
    }

    /// The client's signature
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn required_authorities(&self) -> &Authorities {
        &self.required_authorities
    }
}

// Digest and payload are left out so credentials can be logged safely.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("algorithm", &self.algorithm)
            .field(
                "canonical_representation",
                &format_args!("<{} bytes>", self.canonical_representation.len()),
            )
            .field("digest", &format_args!("<redacted>"))
            .field("required_authorities", &self.required_authorities)
            .finish()
    }
}

/// Builder for [`Credentials`]
#[derive(Debug, Clone)]
pub struct CredentialsBuilder {
    api_key: ApiKey,
    algorithm: String,
    canonical_representation: Vec<u8>,
    digest: Vec<u8>,
    required_authorities: Authorities,
}

impl CredentialsBuilder {
    fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            algorithm: String::new(),
            canonical_representation: Vec::new(),
            digest: Vec::new(),
            required_authorities: Authorities::new(),
        }
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn canonical_representation(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.canonical_representation = bytes.into();
        self
    }

    /// Raw signature bytes
    pub fn digest(mut self, digest: impl Into<Vec<u8>>) -> Self {
        self.digest = digest.into();
        self
    }

    /// Signature as standard base64. Undecodable input leaves the digest empty,
    /// which never matches a computed signature.
    pub fn digest_base64(mut self, encoded: &str) -> Self {
        self.digest = STANDARD.decode(encoded.trim()).unwrap_or_default();
        self
    }

    /// Signature as hex. Same fallback as [`digest_base64`](Self::digest_base64).
    pub fn digest_hex(mut self, encoded: &str) -> Self {
        self.digest = hex::decode(encoded.trim()).unwrap_or_default();
        self
    }

    pub fn required_authorities(mut self, authorities: impl Into<Authorities>) -> Self {
        self.required_authorities = authorities.into();
        self
    }

    pub fn build(self) -> Credentials {
        Credentials {
            api_key: self.api_key,
            algorithm: self.algorithm,
            canonical_representation: self.canonical_representation,
            digest: self.digest,
            required_authorities: self.required_authorities,
        }
    }
}
