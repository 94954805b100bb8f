//! In-process subscriber fan-out keyed by item id.
//!
//! Endpoint handlers publish "this id changed" notifications; consumers
//! register callbacks for one id, a set of ids, or everything. Dispatch is
//! synchronous and single-threaded: `notify` runs every matching callback to
//! completion before returning.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The wildcard channel: callbacks registered here fire for every id.
pub const ID_FILTER_ALL: &str = "*";

/// Unique identifier for one registered subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which item ids a subscription should fire for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    /// Every id (the wildcard channel).
    All,
    /// A single id.
    One(String),
    /// An ordered set of ids; the callback is registered under each.
    Many(Vec<String>),
}

impl From<&str> for IdFilter {
    fn from(id: &str) -> Self {
        Self::One(id.to_string())
    }
}

impl From<String> for IdFilter {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl From<Vec<String>> for IdFilter {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

impl From<&[&str]> for IdFilter {
    fn from(ids: &[&str]) -> Self {
        Self::Many(ids.iter().map(|id| (*id).to_string()).collect())
    }
}

type Callback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Registrations {
    channels: HashMap<String, Vec<(SubscriptionId, Callback)>>,
}

impl Registrations {
    fn remove(&mut self, channel: &str, subscription_id: SubscriptionId) {
        if let Some(entries) = self.channels.get_mut(channel) {
            entries.retain(|(id, _)| *id != subscription_id);
            if entries.is_empty() {
                self.channels.remove(channel);
            }
        }
    }
}

/// Registry of per-id subscriber callbacks with a wildcard channel.
///
/// Cloning shares the underlying registrations, so an endpoint handler and
/// external consumers can hold the same registry. The interior lock is never
/// held while callbacks run: `notify` snapshots the dispatch list first, so a
/// callback may freely subscribe or unsubscribe mid-dispatch.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<Mutex<Registrations>>,
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under every channel named by `filter`.
    ///
    /// The returned [`Subscription`] handle removes the registration when
    /// invoked; dropping the handle without calling it leaves the
    /// subscription in place.
    pub fn subscribe(
        &self,
        filter: impl Into<IdFilter>,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription {
        let subscription_id = SubscriptionId::new();
        let callback: Callback = Arc::new(callback);

        let channels = match filter.into() {
            IdFilter::All => vec![ID_FILTER_ALL.to_string()],
            IdFilter::One(id) => vec![id],
            IdFilter::Many(ids) => ids,
        };

        let mut inner = self.lock();
        for channel in &channels {
            inner
                .channels
                .entry(channel.clone())
                .or_default()
                .push((subscription_id, Arc::clone(&callback)));
        }
        drop(inner);

        Subscription {
            subscription_id,
            channels,
            registry: Arc::downgrade(&self.inner),
            removed: AtomicBool::new(false),
        }
    }

    /// Invokes every callback registered for `id`, then every wildcard
    /// callback, each group in registration order.
    ///
    /// Callback panics propagate to the caller; the registry itself stays
    /// consistent because the lock is released before dispatch.
    pub fn notify(&self, id: &str) {
        let batch: Vec<Callback> = {
            let inner = self.lock();
            let mut batch = Vec::new();
            if let Some(entries) = inner.channels.get(id) {
                batch.extend(entries.iter().map(|(_, cb)| Arc::clone(cb)));
            }
            if id != ID_FILTER_ALL {
                if let Some(entries) = inner.channels.get(ID_FILTER_ALL) {
                    batch.extend(entries.iter().map(|(_, cb)| Arc::clone(cb)));
                }
            }
            batch
        };

        for callback in batch {
            callback(id);
        }
    }

    /// Total number of live registrations across all channels.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().channels.values().map(Vec::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registrations> {
        // A poisoning panic can only come from a subscriber callback that
        // panicked while we were not holding the lock, so the data is intact.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle removing one subscription from every channel it was added under.
#[derive(Debug)]
pub struct Subscription {
    subscription_id: SubscriptionId,
    channels: Vec<String>,
    registry: Weak<Mutex<Registrations>>,
    removed: AtomicBool,
}

impl Subscription {
    /// The id backing this subscription.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Removes the registration. Idempotent: calling this twice, or after the
    /// registry has been dropped, has no effect.
    pub fn unsubscribe(&self) {
        if self.removed.swap(true, Ordering::AcqRel) {
            return;
        }

        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        for channel in &self.channels {
            inner.remove(channel, self.subscription_id);
        }
    }
}
