//! Reduction pipeline: folding one action through an ordered reducer list.

use std::sync::Arc;

use crate::action::Action;
use crate::state::StoreState;

/// A pure state transition: `(action, state) -> state`.
///
/// Reducers must not have side effects. Registration order is significant:
/// each reducer receives the state produced by the one before it, all
/// against the same action.
pub type Reducer<A, S> = Arc<dyn Fn(&A, S) -> S + Send + Sync>;

/// Fold `action` through `reducers` in list order.
///
/// With reducers `[r1, r2]` the result is `r2(a, r1(a, state))`. An empty
/// list returns `state` unchanged. A panicking reducer aborts the fold and
/// unwinds to the `dispatch` caller; the store publishes nothing in that
/// case.
pub(crate) fn reduce<A: Action, S: StoreState>(
    action: &A,
    state: S,
    reducers: &[Reducer<A, S>],
) -> S {
    reducers
        .iter()
        .fold(state, |state, reducer| reducer(action, state))
}
