//! adaptive-map: a key/value map that stores up to six entries inline and
//! moves into a general-purpose hash map only once it outgrows them.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep tiny maps cheap (no hashing, no heap table) without giving
//!   up the behavior of a full hash map once they grow.
//! - Layers:
//!   - `Repr<K, V, M>`: one variant per arity (`Empty`, `One` .. `Six`)
//!     plus `Overflow(M)`. Every mutation consumes the representation and
//!     returns its successor, changing the arity by at most one.
//!   - `OverflowMap` / `OverflowFactory`: the fallback map contract and the
//!     policy that builds it. The factory fixes the inline limit and
//!     whether the map may move back inline.
//!   - `AdaptiveMap<K, V, F>`: public facade. Holds exactly one `Repr` and
//!     replaces it with whatever each mutation returns.
//!   - `Unmodifiable<K, V, F>`: shared read-only snapshot; every mutator
//!     fails with `MapError::Unsupported`.
//!
//! Constraints
//! - Inline lookups are a linear `Eq` scan over at most six entries;
//!   `K: Hash` is only used by the overflow map and by `content_hash`.
//! - Keys are unique. Overwriting a key keeps its position and the
//!   representation.
//! - Equality and `content_hash` ignore iteration order and layout.
//! - Single writer: mutation needs `&mut self`. Shared readers are fine,
//!   and `Unmodifiable` can be cloned across threads.
//!
//! Transition policy
//! - `HashFactory` (fixed fallback): spills when a sixth distinct key
//!   arrives; removing from the overflow map down to five entries moves
//!   them back inline.
//! - `FromFn` (caller-supplied fallback): spills on the seventh distinct
//!   key and stays in overflow until `clear`.
//! - Spilling copies every inline entry and the new one into a map
//!   created with room for all of them.
//!
//! Notes and non-goals
//! - Iteration order is unspecified. Inline forms happen to iterate in
//!   insertion order with removals closing the gap.
//! - No ordered or sorted variant, no persistence.

mod adaptive_map;
mod entry;
mod error;
mod overflow;
mod repr;
mod unmodifiable;
mod views;

#[cfg(feature = "serde")]
mod serde_impl;

mod adaptive_map_proptest;

// Public surface
pub use adaptive_map::AdaptiveMap;
pub use error::MapError;
pub use overflow::{
    from_fn, FromFn, HashFactory, OverflowFactory, OverflowMap, FIXED_SMALL_LIMIT,
    MAX_SMALL_ARITY,
};
pub use unmodifiable::{unmodifiable, IntoUnmodifiable, Unmodifiable};
pub use views::{
    EntrySet, IntoIter, Iter, IterMut, KeySet, Keys, Values, ValuesMut, ValuesView,
};
