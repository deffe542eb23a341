//! Domain types for credential authentication

mod credentials;
mod identity;
mod outcome;
mod principal;
mod secret;

pub use credentials::{Credentials, CredentialsBuilder};
pub use identity::{ApiKey, Authorities, Authority};
pub use outcome::{AuthenticationOutcome, Rejection};
pub use principal::{Principal, PrincipalRecord};
pub use secret::SecretKey;
