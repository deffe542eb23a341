//! Core domain types and errors for HMAC credential authentication.
//!
//! ## Key Components
//!
//! - **`errors`**: configuration errors, principal store failures, and the
//!   transient [`VerificationUnavailable`] condition.
//! - **`types`**: newtypes for API keys, authorities and secrets, plus the
//!   [`Credentials`] cache key and the [`AuthenticationOutcome`] it resolves to.

pub mod errors;
pub mod types;

pub use self::{
    errors::{Error, Result, ResultExt, StoreError, VerificationUnavailable},
    types::*,
};
