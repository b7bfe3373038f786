//! Session-change observer registry with disposable subscriptions.
//!
//! DESIGN
//! ======
//! Listeners are held behind a `Weak` in each `Subscription`, so dropping the
//! subscription (or the view that owns it) unregisters the callback and a
//! torn-down view never receives another event. `emit` snapshots the
//! listener list before calling out, so a listener may drop its own
//! subscription without deadlocking.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{AuthEvent, SessionHandle};

/// Callback invoked on every session transition.
pub type SessionListener = Box<dyn Fn(AuthEvent, Option<SessionHandle>) + Send + Sync>;

type SharedListener = Arc<dyn Fn(AuthEvent, Option<SessionHandle>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, SharedListener>,
}

/// Set of registered session listeners. Cloning shares the same set.
#[derive(Clone, Default)]
pub struct SessionListeners {
    inner: Arc<Mutex<Registry>>,
}

impl SessionListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it stays registered until the returned
    /// subscription is dropped or unsubscribed.
    #[must_use]
    pub fn subscribe(&self, listener: SessionListener) -> Subscription {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Arc::from(listener));
        Subscription { id, registry: Arc::downgrade(&self.inner) }
    }

    /// Notify every registered listener, in registration order.
    pub fn emit(&self, event: AuthEvent, session: Option<&SessionHandle>) {
        let snapshot: Vec<SharedListener> = lock(&self.inner).listeners.values().cloned().collect();
        tracing::debug!(?event, listeners = snapshot.len(), "session change");
        for listener in snapshot {
            listener(event, session.cloned());
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `subscribe`. Unregisters its listener on drop.
#[must_use = "dropping a subscription unregisters the listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Explicitly release the listener. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
