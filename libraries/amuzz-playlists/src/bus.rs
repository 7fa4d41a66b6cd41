//! In-process publish/subscribe channel for playlist events
//!
//! Delivery is synchronous, on the publisher's thread, in subscription
//! order. Nothing is buffered or replayed.

use crate::event::PlaylistEvent;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, trace};

type Handler = Arc<dyn Fn(&PlaylistEvent) + Send + Sync>;

/// Token returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Cloneable handle to a shared subscriber list
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every event published from now on
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PlaylistEvent) + Send + Sync + 'static,
    {
        let mut subs = self.lock();
        subs.next_id += 1;
        let id = SubscriptionId(subs.next_id);
        subs.handlers.push((id, Arc::new(handler)));
        trace!(%id, "Subscribed");
        id
    }

    /// Remove a handler; returns whether it was still registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.lock();
        let before = subs.handlers.len();
        subs.handlers.retain(|(sub, _)| *sub != id);
        let removed = subs.handlers.len() != before;
        if removed {
            trace!(%id, "Unsubscribed");
        }
        removed
    }

    /// Deliver `event` to every current subscriber
    ///
    /// The subscriber list is snapshotted first, so handlers may subscribe,
    /// unsubscribe or publish from inside the callback. A panicking handler
    /// is logged and skipped. Returns the number of handlers that completed.
    pub fn publish(&self, event: &PlaylistEvent) -> usize {
        let snapshot: Vec<(SubscriptionId, Handler)> = self.lock().handlers.clone();

        trace!(
            action = ?event.action,
            source = %event.source,
            sequence = event.sequence,
            subscribers = snapshot.len(),
            "Publishing playlist event"
        );

        let mut delivered = 0;
        for (id, handler) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    error!(
                        %id,
                        action = ?event.action,
                        panic = panic_message(payload.as_ref()),
                        "Playlist event handler panicked"
                    );
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        // Handlers never run under the lock, so poisoning cannot leave it half-updated
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
