//! Lensed views: change-gated projections of a store.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::action::Action;
use crate::state::{Projection, StoreState};
use crate::store::{Observable, Store};
use crate::subscription::{SubscriberSet, Subscription};

/// A narrowed, independently observable view of a [`Store`].
///
/// The view caches `projection(state)` and re-emits to its own subscribers
/// only when a commit actually changes that projected value, compared with
/// the projection's `PartialEq`. Components watching disjoint slices of
/// state therefore do not wake each other up.
///
/// Dispatching through the view forwards verbatim to the parent store; the
/// view itself holds no reducers. Dropping the view detaches it from the
/// parent's notifications.
pub struct LensedStore<A, S, P> {
    store: Store<A, S>,
    cell: Arc<LensCell<P>>,
    // Dropping the view drops this subscription, which removes the
    // projection callback from the parent store's registry.
    _parent: Subscription,
}

struct LensCell<P> {
    value: Mutex<P>,
    subscribers: SubscriberSet<P>,
}

impl<A: Action, S: StoreState, P: Projection> LensedStore<A, S, P> {
    pub(crate) fn new(store: Store<A, S>, projection: Arc<dyn Fn(&S) -> P + Send + Sync>) -> Self {
        let initial = store.select(|state| projection(state));
        let cell = Arc::new(LensCell {
            value: Mutex::new(initial),
            subscribers: SubscriberSet::new(),
        });

        // The parent callback holds the cell weakly: once every handle to
        // the view is gone the callback degrades to a no-op until the
        // subscription itself is dropped and removes it.
        let weak: Weak<LensCell<P>> = Arc::downgrade(&cell);
        let parent = store.subscribe(move |state: &S| {
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let next = projection(state);
            let changed = {
                let mut value = cell.value.lock();
                if *value == next {
                    false
                } else {
                    *value = next.clone();
                    true
                }
            };
            if changed {
                tracing::trace!(
                    subscribers = cell.subscribers.len(),
                    "lensed projection changed"
                );
                cell.subscribers.notify(&next);
            }
        });

        Self {
            store,
            cell,
            _parent: parent,
        }
    }

    /// Forward `action` verbatim to the parent store's pipeline.
    pub fn dispatch(&self, action: A) {
        self.store.dispatch(action);
    }

    /// Clone of the cached projected value.
    ///
    /// After any dispatch completes synchronously this equals the
    /// projection applied to the parent store's current state.
    pub fn state(&self) -> P {
        self.cell.value.lock().clone()
    }

    /// Apply `project` to the cached projected value and return the owned
    /// result.
    pub fn select<T>(&self, project: impl FnOnce(&P) -> T) -> T {
        project(&self.cell.value.lock())
    }

    /// Register a change callback, fired only when a commit changes the
    /// projected value. The callback lives until the returned
    /// [`Subscription`] is cancelled or dropped.
    pub fn subscribe(&self, callback: impl Fn(&P) + Send + Sync + 'static) -> Subscription {
        self.cell.subscribers.subscribe(Arc::new(callback))
    }
}

impl<A: Action, S: StoreState, P: Projection> Observable for LensedStore<A, S, P> {
    type Action = A;
    type State = P;

    fn dispatch(&self, action: A) {
        LensedStore::dispatch(self, action);
    }

    fn state(&self) -> P {
        LensedStore::state(self)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        LensedStore::subscribe(self, callback)
    }
}
