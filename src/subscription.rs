//! Change-notification plumbing shared by stores and lensed views.
//!
//! Each observable owns a [`SubscriberSet`]; subscribing hands back a
//! [`Subscription`] that removes the callback when cancelled or dropped.
//! Notification iterates over a snapshot of the registry taken before the
//! first callback runs, so subscribing or cancelling from inside a callback
//! affects the next notification, not the one in flight.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Id-keyed list of change callbacks behind a mutex.
pub(crate) struct SubscriberSet<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> SubscriberSet<T> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback` and return the handle that removes it.
    pub(crate) fn subscribe(&self, callback: Callback<T>) -> Subscription
    where
        T: Send + 'static,
    {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, callback));
            id
        };
        let registry = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Invoke every currently registered callback with `value`.
    ///
    /// Callbacks run against a snapshot of the registry, outside the lock.
    /// A panicking callback does not stop the remaining ones; the first
    /// captured panic resumes unwinding once the snapshot is exhausted.
    pub(crate) fn notify(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = {
            let registry = self.registry.lock();
            registry
                .entries
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        let mut first_panic = None;
        for callback in snapshot {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(value))) {
                tracing::error!("subscriber panicked during change notification");
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }
}

/// Handle tying a change callback to a scope.
///
/// Cancelling the subscription, or letting it drop, removes the callback
/// from its registry. Cancellation after the observed object is gone is a
/// no-op.
#[must_use = "dropping a Subscription immediately cancels it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the callback now. Equivalent to dropping the handle.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
