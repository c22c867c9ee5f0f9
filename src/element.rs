//! Element identity
//!
//! Elements are application-defined records owned by the host collection.
//! The engine only needs a stable identity to hand back on delete and to
//! distinguish add episodes from edit episodes.

use std::fmt::Debug;
use std::hash::Hash;

/// A record with a stable identity, comparable by id rather than by value.
pub trait Element {
    /// Identity type. Equality of ids means "same record", regardless of
    /// whether the field values differ.
    type Id: Clone + Eq + Hash + Debug;

    /// The element's identity.
    fn id(&self) -> Self::Id;
}
