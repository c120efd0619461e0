//! Value object trait: equality by value, not identity.

/// Marker for immutable domain values compared by their attributes.
///
/// Two value objects with the same attribute values are the same value;
/// "modifying" one means constructing a new one. Implementors are cheap
/// to clone and safe to share.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
