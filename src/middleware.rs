//! Middleware chain: dispatch interception around the base commit.

use std::sync::Arc;

use crate::action::Action;
use crate::state::StoreState;
use crate::store::Store;

/// A dispatch continuation: "send this action onward".
///
/// Built fresh for each `dispatch` call. `Send + Sync` so a middleware may
/// share the continuation and defer it onto another thread or task.
pub type Dispatch<A> = Box<dyn Fn(A) + Send + Sync>;

/// A dispatch interceptor factory.
///
/// Given the continuation covering the rest of the chain and a handle to
/// the owning store, returns the wrapped dispatch function. The store
/// handle lets a middleware re-enter the whole pipeline with
/// `store.dispatch(..)` rather than only forwarding downstream.
///
/// A middleware may forward the action as-is, forward it later, forward it
/// several times, forward a different action, or swallow it. Only actions
/// that reach the end of the chain are reduced and published.
pub type Middleware<A, S> = Arc<dyn Fn(Dispatch<A>, Store<A, S>) -> Dispatch<A> + Send + Sync>;

/// Wrap `base` with `middlewares` so the first-registered middleware forms
/// the outermost layer: `m1(m2(… mn(base) …))`.
///
/// The first middleware in the list therefore sees every action before any
/// other, and an action it swallows never reaches the rest of the chain.
pub(crate) fn compose<A: Action, S: StoreState>(
    base: Dispatch<A>,
    middlewares: &[Middleware<A, S>],
    store: &Store<A, S>,
) -> Dispatch<A> {
    middlewares
        .iter()
        .rev()
        .fold(base, |next, middleware| middleware(next, store.clone()))
}
