//! In-flight verification handoff
//!
//! The owner of a pending key holds a [`Flight`]. Waiters hold a receiver on
//! the same watch channel and wake when the owner publishes a result or goes
//! away.

use crate::shard::{Resolved, Shard};
use merchant_core::{AuthenticationOutcome, Credentials, VerificationUnavailable};
use tokio::sync::watch;
use tracing::debug;

pub(crate) type FlightResult = Result<AuthenticationOutcome, VerificationUnavailable>;
pub(crate) type FlightSender = watch::Sender<Option<FlightResult>>;
pub(crate) type FlightReceiver = watch::Receiver<Option<FlightResult>>;

const ABANDONED: &str = "verification abandoned before completing";

/// Ownership of one pending key.
///
/// Dropping it without calling [`Flight::land`] clears the pending marker and
/// wakes waiters with `VerificationUnavailable`.
pub(crate) struct Flight<'a> {
    shard: &'a Shard,
    credentials: &'a Credentials,
    sender: Option<FlightSender>,
}

impl<'a> Flight<'a> {
    pub(crate) fn new(shard: &'a Shard, credentials: &'a Credentials, sender: FlightSender) -> Self {
        Self {
            shard,
            credentials,
            sender: Some(sender),
        }
    }

    /// Publish the result to waiters and store `entry`. Returns true if
    /// storing evicted another key.
    pub(crate) fn land(mut self, result: FlightResult, entry: Option<Resolved>) -> bool {
        let evicted = self.shard.settle(self.credentials, entry);
        if let Some(sender) = self.sender.take() {
            sender.send_replace(Some(result));
        }
        evicted
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        if self.sender.take().is_some() {
            self.shard.settle(self.credentials, None);
            debug!(api_key = %self.credentials.api_key(), "{ABANDONED}");
        }
    }
}

/// Wait for the owner of a pending key to finish
pub(crate) async fn join(mut receiver: FlightReceiver) -> FlightResult {
    let published = receiver
        .wait_for(Option::is_some)
        .await
        .ok()
        .and_then(|value| (*value).clone());
    published.unwrap_or_else(|| Err(VerificationUnavailable::new(ABANDONED)))
}
