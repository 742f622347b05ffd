//! Overflow storage: the general-purpose map used once a container outgrows
//! its inline representations, and the factories that build it.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Largest arity with an inline representation.
pub const MAX_SMALL_ARITY: usize = 6;

/// Small limit of the fixed-fallback variant ([`HashFactory`]).
pub const FIXED_SMALL_LIMIT: usize = 5;

/// Contract a fallback map must satisfy to back an [`AdaptiveMap`](crate::AdaptiveMap)
/// after it spills.
///
/// Lookups go through `Borrow` like the std maps, so a map keyed by
/// `String` can be queried with `&str`.
pub trait OverflowMap<K, V> {
    type Iter<'a>: ExactSizeIterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IterMut<'a>: ExactSizeIterator<Item = (&'a K, &'a mut V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IntoEntries: ExactSizeIterator<Item = (K, V)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Insert or overwrite; returns the displaced value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn iter(&self) -> Self::Iter<'_>;

    fn iter_mut(&mut self) -> Self::IterMut<'_>;

    /// Consume the map, yielding owned pairs.
    fn into_entries(self) -> Self::IntoEntries;
}

impl<K, V, S> OverflowMap<K, V> for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Iter<'a> = hashbrown::hash_map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IterMut<'a> = hashbrown::hash_map::IterMut<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IntoEntries = hashbrown::hash_map::IntoIter<K, V>;

    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        hashbrown::HashMap::get_key_value(self, key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        hashbrown::HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        hashbrown::HashMap::insert(self, key, value)
    }

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        hashbrown::HashMap::remove_entry(self, key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        hashbrown::HashMap::iter(self)
    }

    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        hashbrown::HashMap::iter_mut(self)
    }

    fn into_entries(self) -> Self::IntoEntries {
        IntoIterator::into_iter(self)
    }
}

impl<K, V, S> OverflowMap<K, V> for std::collections::HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Iter<'a> = std::collections::hash_map::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IterMut<'a> = std::collections::hash_map::IterMut<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;
    type IntoEntries = std::collections::hash_map::IntoIter<K, V>;

    fn len(&self) -> usize {
        std::collections::HashMap::len(self)
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        std::collections::HashMap::get_key_value(self, key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        std::collections::HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        std::collections::HashMap::insert(self, key, value)
    }

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        std::collections::HashMap::remove_entry(self, key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        std::collections::HashMap::iter(self)
    }

    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        std::collections::HashMap::iter_mut(self)
    }

    fn into_entries(self) -> Self::IntoEntries {
        IntoIterator::into_iter(self)
    }
}

/// Builds the overflow map and fixes the variant's transition policy.
pub trait OverflowFactory<K, V> {
    type Map: OverflowMap<K, V>;

    /// Largest arity kept inline; the next distinct key spills. Values
    /// above [`MAX_SMALL_ARITY`] are clamped.
    const SMALL_LIMIT: usize = MAX_SMALL_ARITY;

    /// Whether removing from the overflow map down to exactly
    /// `SMALL_LIMIT` entries moves the contents back inline.
    const SHRINKS_BACK: bool = false;

    /// Fresh, empty map able to hold `capacity` entries without growing.
    fn create(&self, capacity: usize) -> Self::Map;
}

/// Effective inline limit for a factory.
#[inline]
pub(crate) fn small_limit<K, V, F: OverflowFactory<K, V>>() -> usize {
    if F::SMALL_LIMIT < MAX_SMALL_ARITY {
        F::SMALL_LIMIT
    } else {
        MAX_SMALL_ARITY
    }
}

/// Fixed fallback: a `hashbrown::HashMap` with hasher `S`.
///
/// Spills after [`FIXED_SMALL_LIMIT`] entries and moves back inline when
/// removals bring the overflow map down to that size.
#[derive(Clone, Debug, Default)]
pub struct HashFactory<S = RandomState> {
    hasher: S,
}

impl<S> HashFactory<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, V, S> OverflowFactory<K, V> for HashFactory<S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    type Map = hashbrown::HashMap<K, V, S>;

    const SMALL_LIMIT: usize = FIXED_SMALL_LIMIT;
    const SHRINKS_BACK: bool = true;

    fn create(&self, capacity: usize) -> Self::Map {
        hashbrown::HashMap::with_capacity_and_hasher(capacity, self.hasher.clone())
    }
}

/// Caller-supplied fallback built by a closure `Fn(capacity) -> M`.
///
/// Keeps up to [`MAX_SMALL_ARITY`] entries inline. Once spilled the map
/// stays in overflow until cleared.
#[derive(Clone, Copy, Debug, Default)]
pub struct FromFn<F>(F);

/// Wrap a closure as an [`OverflowFactory`].
///
/// ```
/// use adaptive_map::{from_fn, AdaptiveMap};
/// use std::collections::HashMap;
///
/// let mut m: AdaptiveMap<u32, &str, _> =
///     AdaptiveMap::with_factory(from_fn(|n| HashMap::<u32, &str>::with_capacity(n)));
/// for k in 0..7 {
///     m.insert(k, "v");
/// }
/// assert!(m.is_overflow());
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<K, V, M, F> OverflowFactory<K, V> for FromFn<F>
where
    F: Fn(usize) -> M,
    M: OverflowMap<K, V>,
{
    type Map = M;

    fn create(&self, capacity: usize) -> M {
        (self.0)(capacity)
    }
}
