//! Configuration for the authentication subsystem
//!
//! This crate parses cache policies and loads [`AuthConfig`] from JSON files
//! and environment variables. All validation happens at load time so that a
//! bad option never reaches a running authenticator.

pub mod config;
pub mod loader;
pub mod policy;

#[cfg(test)]
mod config_tests;

pub use config::{AuthConfig, AuthConfigBuilder, DEFAULT_LOOKUP_TIMEOUT};
pub use loader::{ConfigLoader, ENV_CACHE_POLICY, ENV_LOOKUP_TIMEOUT};
pub use policy::CachePolicy;
