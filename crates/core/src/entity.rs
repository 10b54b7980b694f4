//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Identifiers must render through `Display`; document stores key records by
/// that textual form.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
