//! Authentication cache
//!
//! [`AuthenticationCache`] memoizes verification outcomes per distinct
//! credential. Each key moves through `Absent -> Pending -> Resolved`:
//!
//! - the first caller for an absent key runs the verifier,
//! - concurrent callers for the same key wait on that run instead of starting
//!   their own,
//! - authenticated and rejected outcomes are stored until the policy's TTL
//!   elapses or the entry is evicted,
//! - a verifier that reports [`VerificationUnavailable`] leaves the key absent.
//!
//! [`VerificationUnavailable`]: merchant_core::VerificationUnavailable

mod cache;
mod flight;
mod shard;
mod stats;

pub use cache::{AuthenticationCache, DEFAULT_SHARDS, MIN_SHARD_CAPACITY};
pub use stats::CacheStatsSnapshot;
