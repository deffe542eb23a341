//! One independently locked slice of the entry table

use crate::flight::{FlightReceiver, FlightSender};
use lru::LruCache;
use merchant_core::{AuthenticationOutcome, Credentials};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tokio::sync::watch;
use tokio::time::Instant;

/// A stored outcome and when it goes stale
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    outcome: AuthenticationOutcome,
    /// `None` never expires
    expires_at: Option<Instant>,
}

impl Resolved {
    pub(crate) fn new(outcome: AuthenticationOutcome, expires_at: Option<Instant>) -> Self {
        Self {
            outcome,
            expires_at,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// What a caller should do after looking a key up
pub(crate) enum Claim {
    /// A fresh outcome was stored
    Hit(AuthenticationOutcome),
    /// Another caller is verifying this key
    Join(FlightReceiver),
    /// This caller now owns the verification
    Lead(FlightSender),
}

struct ShardState {
    /// `None` when the policy retains nothing
    resolved: Option<LruCache<Credentials, Resolved>>,
    in_flight: HashMap<Credentials, FlightReceiver>,
}

pub(crate) struct Shard {
    state: Mutex<ShardState>,
}

impl Shard {
    /// `capacity` of `None` is unbounded; `Some(0)` retains nothing
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        let resolved = match capacity {
            None => Some(LruCache::unbounded()),
            Some(n) => NonZeroUsize::new(n).map(LruCache::new),
        };
        Self {
            state: Mutex::new(ShardState {
                resolved,
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Look the key up and, if nothing fresh is stored and nobody is
    /// verifying it, register the caller as the owner. The flag reports
    /// whether a stale entry was dropped on the way.
    pub(crate) fn claim(&self, credentials: &Credentials, now: Instant) -> (Claim, bool) {
        let mut state = self.state.lock();
        let mut expired = false;

        if let Some(resolved) = state.resolved.as_mut() {
            let fresh = resolved
                .get(credentials)
                .map(|entry| entry.is_fresh(now).then(|| entry.outcome.clone()));
            match fresh {
                Some(Some(outcome)) => return (Claim::Hit(outcome), false),
                Some(None) => {
                    resolved.pop(credentials);
                    expired = true;
                }
                None => {}
            }
        }

        if let Some(receiver) = state.in_flight.get(credentials) {
            return (Claim::Join(receiver.clone()), expired);
        }

        let (sender, receiver) = watch::channel(None);
        state.in_flight.insert(credentials.clone(), receiver);
        (Claim::Lead(sender), expired)
    }

    /// Clear the pending marker and store `entry` if there is one. Returns
    /// true when storing pushed out a different key.
    pub(crate) fn settle(&self, credentials: &Credentials, entry: Option<Resolved>) -> bool {
        let mut state = self.state.lock();
        state.in_flight.remove(credentials);

        let (Some(entry), Some(resolved)) = (entry, state.resolved.as_mut()) else {
            return false;
        };
        match resolved.push(credentials.clone(), entry) {
            Some((previous, _)) => previous != *credentials,
            None => false,
        }
    }

    pub(crate) fn remove(&self, credentials: &Credentials) -> bool {
        self.state
            .lock()
            .resolved
            .as_mut()
            .and_then(|resolved| resolved.pop(credentials))
            .is_some()
    }

    /// Drop every resolved entry. Pending verifications are left alone.
    pub(crate) fn clear(&self) {
        if let Some(resolved) = self.state.lock().resolved.as_mut() {
            resolved.clear();
        }
    }

    pub(crate) fn remove_expired(&self, now: Instant) -> usize {
        let mut state = self.state.lock();
        let Some(resolved) = state.resolved.as_mut() else {
            return 0;
        };

        let stale: Vec<Credentials> = resolved
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(now))
            .map(|(credentials, _)| credentials.clone())
            .collect();
        for credentials in &stale {
            resolved.pop(credentials);
        }
        stale.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.state
            .lock()
            .resolved
            .as_ref()
            .map_or(0, LruCache::len)
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.state.lock().in_flight.len()
    }
}
