//! Shared utilities and pure functions for merchant-auth
//!
//! Everything here is side-effect free apart from tracing initialisation.

pub mod duration;
pub mod tracing;

pub use duration::{format_duration, parse_duration};
