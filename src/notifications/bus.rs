// SPDX-License-Identifier: MPL-2.0
//! Subscriber fan-out for store snapshots.
//!
//! Subscribers receive every snapshot committed after they subscribed, in
//! subscription order. Past state is never replayed; read
//! [`Manager::snapshot`](super::Manager::snapshot) at subscribe time instead.

use super::store::State;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with each committed snapshot.
pub type Callback = Arc<dyn Fn(&Arc<State>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Ordered set of subscriber callbacks.
#[derive(Clone, Default)]
pub(crate) struct Bus {
    registry: Arc<Mutex<Registry>>,
}

impl Bus {
    pub(crate) fn subscribe(&self, callback: Callback) -> Subscription {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, callback));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Calls every subscriber with `snapshot`. A panicking subscriber is
    /// logged and skipped. Returns how many subscribers panicked.
    pub(crate) fn publish(&self, snapshot: &Arc<State>) -> usize {
        // Clone the list so callbacks may subscribe or unsubscribe re-entrantly.
        let entries = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone();

        let mut failures = 0;
        for (id, callback) in entries {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot))).is_err() {
                failures += 1;
                tracing::warn!(subscriber = id, "subscriber panicked, continuing fan-out");
            }
        }
        failures
    }

    pub(crate) fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// Handle to a registered subscriber.
///
/// Dropping the handle unsubscribes; call [`Subscription::detach`] to keep
/// the callback registered for the lifetime of the manager.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the callback. Safe to call any number of times.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }

    /// Returns true while the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .iter()
                .any(|(id, _)| *id == self.id)
        })
    }

    /// Leaves the callback registered after this handle is dropped.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
