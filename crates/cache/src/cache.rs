//! Single-flight memoizing authenticator

use crate::flight::{self, Flight, FlightResult};
use crate::shard::{Claim, Resolved, Shard};
use crate::stats::{CacheStats, CacheStatsSnapshot};
use async_trait::async_trait;
use merchant_config::{AuthConfig, CachePolicy};
use merchant_core::{AuthenticationOutcome, Credentials, VerificationUnavailable};
use merchant_security::{Authenticator, CredentialVerifier, PrincipalStore};
use merchant_utils::tracing::{auth_span, cache_event};
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use tokio::time::Instant;
use tracing::{debug, Instrument};

/// Shard count used by [`AuthenticationCache::new`]
pub const DEFAULT_SHARDS: usize = 16;

/// Smallest bound a shard is given when `max_entries` is set. Below it,
/// hash skew would let one shard evict while the others sit empty.
pub const MIN_SHARD_CAPACITY: usize = 20;

/// Caches the outcomes of an inner [`Authenticator`].
///
/// At most one verification per distinct credential runs at any instant;
/// concurrent callers with the same credential share its result. Rejections
/// are cached like successes. `VerificationUnavailable` is handed to every
/// caller of that run and then forgotten, so the next call verifies again.
pub struct AuthenticationCache<V> {
    inner: V,
    policy: CachePolicy,
    shards: Box<[Shard]>,
    hasher: RandomState,
    stats: CacheStats,
}

impl<S: PrincipalStore> AuthenticationCache<CredentialVerifier<S>> {
    /// Verifier over `store` with the configured lookup timeout, wrapped in a
    /// cache with the configured policy
    pub fn from_config(store: S, config: &AuthConfig) -> Self {
        let verifier = CredentialVerifier::new(store).with_lookup_timeout(config.lookup_timeout);
        Self::new(verifier, config.cache_policy)
    }
}

impl<V: Authenticator> AuthenticationCache<V> {
    pub fn new(inner: V, policy: CachePolicy) -> Self {
        Self::with_shards(inner, policy, DEFAULT_SHARDS)
    }

    /// Use up to `shards` independently locked partitions. With a bounded
    /// policy the count is reduced until each partition holds at least
    /// [`MIN_SHARD_CAPACITY`] entries; small bounds get a single partition.
    pub fn with_shards(inner: V, policy: CachePolicy, shards: usize) -> Self {
        let count = match policy.max_entries {
            Some(max) => shards.min(max / MIN_SHARD_CAPACITY).max(1),
            None => shards.max(1),
        };
        let shards = (0..count)
            .map(|index| Shard::new(policy.max_entries.map(|max| share(max, count, index))))
            .collect();

        debug!(%policy, shards = count, "authentication cache created");
        Self {
            inner,
            policy,
            shards,
            hasher: RandomState::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    /// Resolve `credentials`, from the cache when a fresh outcome is stored
    pub async fn authenticate(&self, credentials: &Credentials) -> FlightResult {
        self.resolve(credentials)
            .instrument(auth_span(credentials.api_key().as_str()))
            .await
    }

    async fn resolve(&self, credentials: &Credentials) -> FlightResult {
        let shard = self.shard_for(credentials);
        let (claim, expired) = shard.claim(credentials, Instant::now());
        if expired {
            self.stats.record_expirations(1);
        }

        let api_key = credentials.api_key().as_str();
        match claim {
            Claim::Hit(outcome) => {
                self.stats.record_hit();
                cache_event(api_key, true, "authenticate");
                Ok(outcome)
            }
            Claim::Join(receiver) => {
                self.stats.record_miss();
                self.stats.record_coalesced();
                cache_event(api_key, false, "join");
                flight::join(receiver).await
            }
            Claim::Lead(sender) => {
                self.stats.record_miss();
                self.stats.record_verification();
                cache_event(api_key, false, "verify");
                let flight = Flight::new(shard, credentials, sender);
                self.verify(flight, credentials).await
            }
        }
    }

    async fn verify(&self, flight: Flight<'_>, credentials: &Credentials) -> FlightResult {
        let result = self.inner.authenticate(credentials).await;

        let entry = match &result {
            Ok(outcome) => Some(Resolved::new(outcome.clone(), self.expiry())),
            Err(unavailable) => {
                self.stats.record_transient_failure();
                debug!(reason = unavailable.reason(), "verification unavailable, not cached");
                None
            }
        };

        if flight.land(result.clone(), entry) {
            self.stats.record_eviction();
        }
        result
    }

    /// Drop the stored outcome for `credentials`, if any
    pub fn invalidate(&self, credentials: &Credentials) -> bool {
        self.shard_for(credentials).remove(credentials)
    }

    /// Drop every stored outcome. Verifications already running still store
    /// their result when they finish.
    pub fn invalidate_all(&self) {
        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    /// Remove stale entries now instead of on their next lookup
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let removed: usize = self.shards.iter().map(|shard| shard.remove_expired(now)).sum();
        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!(removed, "expired authentication entries removed");
        }
        removed
    }

    /// Number of stored outcomes, including stale ones not yet removed
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    fn expiry(&self) -> Option<Instant> {
        self.policy
            .ttl
            .and_then(|ttl| Instant::now().checked_add(ttl))
    }

    fn shard_for(&self, credentials: &Credentials) -> &Shard {
        let index = self.hasher.hash_one(credentials) as usize % self.shards.len();
        &self.shards[index]
    }
}

/// Split `total` into `parts` shares differing by at most one
fn share(total: usize, parts: usize, index: usize) -> usize {
    total / parts + usize::from(index < total % parts)
}

#[async_trait]
impl<V: Authenticator> Authenticator for AuthenticationCache<V> {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationOutcome, VerificationUnavailable> {
        AuthenticationCache::authenticate(self, credentials).await
    }
}
