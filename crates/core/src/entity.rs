//! Entity and aggregate-root traits: identity + continuity across change.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that owns a consistency boundary.
///
/// `version` increases by one on every applied mutation; managers use it
/// for optimistic whole-record replacement.
pub trait AggregateRoot: Entity {
    /// Monotonically increasing version of the aggregate's state.
    fn version(&self) -> u64;
}
