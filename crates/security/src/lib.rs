//! HMAC credential verification
//!
//! Leaf-first:
//!
//! - [`signature`]: keyed-hash signatures over a request's canonical bytes
//! - [`constant_time`]: byte comparison whose timing does not reveal where
//!   two signatures differ
//! - [`store`]: the principal store capability consumed by the verifier
//! - [`verifier`]: store lookup, authority check, signature check
//! - [`guard`]: the per-route contract used by request handling

pub mod constant_time;
pub mod guard;
pub mod signature;
pub mod store;
pub mod verifier;

pub use constant_time::{constant_time_eq, ConstantTimeComparator};
pub use guard::{AccessDenied, RestrictedTo, SignedRequest, DEFAULT_REALM};
pub use signature::{HmacAlgorithm, SignatureEngine, SignatureError};
pub use store::{InMemoryPrincipalStore, PrincipalStore};
pub use verifier::{Authenticator, CredentialVerifier, Verdict};
