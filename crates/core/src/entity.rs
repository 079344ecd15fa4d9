//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    ///
    /// Identifiers are immutable after creation; merges and reconciliation never
    /// change them.
    fn id(&self) -> &Self::Id;
}
