//! Capability trait for dispatchable actions.

/// Values that can be dispatched through a store.
///
/// Actions describe an intended state transition ("increase the counter"),
/// not the resulting state. The store treats them as opaque: no equality,
/// no serialization, no naming. `Send + 'static` is the only requirement,
/// so a middleware may carry an action onto another thread or task before
/// forwarding it.
///
/// Implemented automatically for every eligible type.
pub trait Action: Send + 'static {}

impl<T: Send + 'static> Action for T {}
