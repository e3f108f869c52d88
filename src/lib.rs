//! refold: a unidirectional-data-flow state container.
//!
//! One mutable state value, updated only by folding dispatched actions
//! through pure reducers, with an ordered middleware chain intercepting
//! dispatch and change-gated lensed views for scoped observation. Built to
//! back reactive user interfaces while staying independent of any
//! rendering layer.
//!
//! # Architecture
//!
//! ```text
//! dispatch(action)
//!     │
//!     ▼
//! Middleware chain (first registered = outermost)
//!     │
//!     ▼
//! Reducer fold (registration order)
//!     │
//!     ▼
//! State replaced ──→ Store subscribers ──→ LensedStore subscribers
//!                                          (only when the projected
//!                                           value changed)
//! ```
//!
//! # Example
//!
//! ```
//! use refold::{Changeable, Reducer, Store};
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct AppState {
//!     counter: i64,
//!     muted: bool,
//! }
//!
//! impl Changeable for AppState {}
//!
//! enum AppAction {
//!     Increase,
//!     Toggle,
//! }
//!
//! fn counter(action: &AppAction, state: AppState) -> AppState {
//!     match action {
//!         AppAction::Increase => state.changed(|s| &mut s.counter, state.counter + 1),
//!         _ => state,
//!     }
//! }
//!
//! fn muted(action: &AppAction, state: AppState) -> AppState {
//!     match action {
//!         AppAction::Toggle => state.changed(|s| &mut s.muted, !state.muted),
//!         _ => state,
//!     }
//! }
//!
//! let reducers: Vec<Reducer<AppAction, AppState>> = vec![Arc::new(counter), Arc::new(muted)];
//! let store = Store::new(AppState { counter: 0, muted: false }, reducers, Vec::new());
//!
//! let counter_lens = store.lense(|state: &AppState| state.counter);
//! store.dispatch(AppAction::Increase);
//! store.dispatch(AppAction::Toggle);
//!
//! assert_eq!(store.state().counter, 1);
//! assert!(store.state().muted);
//! assert_eq!(counter_lens.state(), 1);
//! ```

mod action;
mod change;
mod lens;
mod middleware;
mod reducer;
mod state;
mod store;
mod subscription;

pub use action::Action;
pub use change::Changeable;
pub use lens::LensedStore;
pub use middleware::{Dispatch, Middleware};
pub use reducer::Reducer;
pub use state::{Projection, StoreState};
pub use store::{Observable, Store};
pub use subscription::Subscription;
