//! Capability traits for state values and lens projections.

/// Whole-store state values.
///
/// States should be:
/// - Immutable: each commit produces a wholly new value
/// - Cheap to clone: every commit clones once to seed the reducer fold
/// - Self-contained: everything observers need lives in the value
///
/// Equality is deliberately *not* required here. Only the slices observed
/// through a lens need it, and that requirement lives on [`Projection`].
///
/// Implemented automatically for every eligible type.
pub trait StoreState: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> StoreState for T {}

/// Values a lens projects out of a store's state.
///
/// `PartialEq` is what gates lens notifications: a lensed view re-emits
/// only when the freshly computed projection differs from its cached one.
///
/// Implemented automatically for every eligible type.
pub trait Projection: Clone + PartialEq + Send + 'static {}

impl<T: Clone + PartialEq + Send + 'static> Projection for T {}
