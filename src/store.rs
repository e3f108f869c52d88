//! The store: single source of truth and dispatch entry point.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::action::Action;
use crate::lens::LensedStore;
use crate::middleware::{compose, Dispatch, Middleware};
use crate::reducer::{reduce, Reducer};
use crate::state::{Projection, StoreState};
use crate::subscription::{SubscriberSet, Subscription};

/// Owner of the current state, the reducer list, and the middleware list.
///
/// `Store` is a cheap-clone handle: clones share one state cell, so
/// middlewares and background tasks can keep their own copies. All state
/// transitions go through [`dispatch`](Store::dispatch); reads go through
/// [`state`](Store::state) or [`select`](Store::select).
pub struct Store<A, S> {
    inner: Arc<StoreInner<A, S>>,
}

struct StoreInner<A, S> {
    state: Mutex<S>,
    reducers: Vec<Reducer<A, S>>,
    middlewares: Vec<Middleware<A, S>>,
    subscribers: SubscriberSet<S>,
}

impl<A, S> Clone for Store<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Action, S: StoreState> Store<A, S> {
    /// Create a store from its initial state and the ordered reducer and
    /// middleware lists. Both lists are fixed for the store's lifetime.
    pub fn new(
        initial_state: S,
        reducers: Vec<Reducer<A, S>>,
        middlewares: Vec<Middleware<A, S>>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(initial_state),
                reducers,
                middlewares,
                subscribers: SubscriberSet::new(),
            }),
        }
    }

    /// Run `action` through the middleware chain into reduction.
    ///
    /// The chain is composed per call over the base commit. Each action
    /// that reaches the end of the chain produces exactly one commit:
    /// reduce, replace the state, notify subscribers. An action a
    /// middleware swallows produces none; an action forwarded twice
    /// produces two. Reducer and middleware panics unwind to the caller
    /// and leave the state at its last committed value.
    pub fn dispatch(&self, action: A) {
        tracing::trace!(
            middlewares = self.inner.middlewares.len(),
            "dispatching through middleware chain"
        );
        let base: Dispatch<A> = {
            let store = self.clone();
            Box::new(move |action| store.commit(action))
        };
        let chain = compose(base, &self.inner.middlewares, self);
        chain(action);
    }

    /// Dispatch, then run `completion`.
    ///
    /// `completion` runs once the synchronous middleware pass has returned
    /// and never runs when that pass panics. It does not wait for
    /// continuations a middleware deferred onto another thread or task.
    pub fn dispatch_then(&self, action: A, completion: impl FnOnce()) {
        self.dispatch(action);
        completion();
    }

    /// Clone of the current state. Always the most recently committed value.
    pub fn state(&self) -> S {
        self.inner.state.lock().clone()
    }

    /// Apply `project` to the current state and return the owned result.
    ///
    /// The named-projection way of reading one field off the state:
    /// `store.select(|s| s.counter)`. `project` runs under the state lock
    /// and must not dispatch.
    pub fn select<T>(&self, project: impl FnOnce(&S) -> T) -> T {
        project(&self.inner.state.lock())
    }

    /// Register a change callback, fired once per commit with the freshly
    /// committed state. The callback lives until the returned
    /// [`Subscription`] is cancelled or dropped.
    pub fn subscribe(&self, callback: impl Fn(&S) + Send + Sync + 'static) -> Subscription {
        self.inner.subscribers.subscribe(Arc::new(callback))
    }

    /// Build a lensed view over this store.
    ///
    /// The view observes `projection` of this store's state and notifies
    /// its own subscribers only when that projected value actually changes.
    pub fn lense<P: Projection>(
        &self,
        projection: impl Fn(&S) -> P + Send + Sync + 'static,
    ) -> LensedStore<A, S, P> {
        LensedStore::new(self.clone(), Arc::new(projection))
    }

    /// Base dispatch: fold the action through the reducers, publish the
    /// result, notify subscribers.
    ///
    /// The state lock is held across the fold and the replacement so
    /// concurrent dispatches serialize, and released before notification
    /// so subscribers may read state or dispatch re-entrantly. A panicking
    /// reducer unwinds before the replacement: nothing is published.
    fn commit(&self, action: A) {
        let committed = {
            let mut state = self.inner.state.lock();
            let next = reduce(&action, state.clone(), &self.inner.reducers);
            *state = next.clone();
            next
        };
        tracing::trace!(
            subscribers = self.inner.subscribers.len(),
            "state committed"
        );
        self.inner.subscribers.notify(&committed);
    }
}

/// The minimal observable-store surface shared by [`Store`] and
/// [`LensedStore`]: dispatch an action, read the observed value, subscribe
/// to its changes. Use it as a bound where code must accept either.
///
/// The trait is generic over the subscriber callback and therefore not
/// object-safe; it exists for bounds, not for vtables.
pub trait Observable {
    type Action: Action;
    type State: StoreState;

    /// Feed an action into the owning store's pipeline.
    fn dispatch(&self, action: Self::Action);

    /// Clone of the currently observed value.
    fn state(&self) -> Self::State;

    /// Register a change callback for the observed value.
    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Self::State) + Send + Sync + 'static;
}

impl<A: Action, S: StoreState> Observable for Store<A, S> {
    type Action = A;
    type State = S;

    fn dispatch(&self, action: A) {
        Store::dispatch(self, action);
    }

    fn state(&self) -> S {
        Store::state(self)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        Store::subscribe(self, callback)
    }
}
