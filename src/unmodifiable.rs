//! Unmodifiable: read-only, shareable snapshot of an [`AdaptiveMap`].
//!
//! The wrapper owns the map it was built from, behind an `Arc`. It is a
//! snapshot rather than a live view: the source was either moved in or
//! copied, so no handle to it remains that could change what readers see.
//! Clones share the same snapshot and may be sent to other threads for
//! concurrent reads.
//!
//! Mutators keep the map's signatures but always fail with
//! [`MapError::Unsupported`].

use crate::adaptive_map::AdaptiveMap;
use crate::error::MapError;
use crate::overflow::{HashFactory, OverflowFactory};
use crate::views::{EntrySet, Iter, KeySet, Keys, Values, ValuesView};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Index;
use std::sync::Arc;

pub struct Unmodifiable<K, V, F = HashFactory>
where
    F: OverflowFactory<K, V>,
{
    map: Arc<AdaptiveMap<K, V, F>>,
}

impl<K, V, F> Clone for Unmodifiable<K, V, F>
where
    F: OverflowFactory<K, V>,
{
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
        }
    }
}

impl<K, V, F> Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    /// Wrap `map` without copying it.
    pub fn new(map: AdaptiveMap<K, V, F>) -> Self {
        Self { map: Arc::new(map) }
    }

    /// Snapshot of an arbitrary source; `None` yields an empty map.
    pub fn copy_of<I>(source: Option<I>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: Default,
    {
        Self::new(AdaptiveMap::copy_of(source))
    }

    /// Read access to the wrapped map.
    pub fn as_map(&self) -> &AdaptiveMap<K, V, F> {
        &self.map
    }

    /// Independent, mutable copy of the contents.
    pub fn to_modifiable(&self) -> AdaptiveMap<K, V, F>
    where
        K: Clone,
        V: Clone,
        F: Clone,
    {
        self.map.copy()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn is_overflow(&self) -> bool {
        self.map.is_overflow()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }

    pub fn iter(&self) -> Iter<'_, K, V, F::Map> {
        self.map.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V, F::Map> {
        self.map.keys()
    }

    pub fn values(&self) -> Values<'_, K, V, F::Map> {
        self.map.values()
    }

    pub fn key_set(&self) -> KeySet<'_, K, V, F::Map> {
        self.map.key_set()
    }

    pub fn values_view(&self) -> ValuesView<'_, K, V, F::Map> {
        self.map.values_view()
    }

    pub fn entry_set(&self) -> EntrySet<'_, K, V, F::Map> {
        self.map.entry_set()
    }

    pub fn content_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        self.map.content_hash()
    }

    pub fn insert(&mut self, _key: K, _value: V) -> Result<Option<V>, MapError> {
        Err(MapError::unsupported("insert"))
    }

    pub fn remove<Q>(&mut self, _key: &Q) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Err(MapError::unsupported("remove"))
    }

    pub fn remove_entry<Q>(&mut self, _key: &Q) -> Result<Option<(K, V)>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Err(MapError::unsupported("remove_entry"))
    }

    pub fn clear(&mut self) -> Result<(), MapError> {
        Err(MapError::unsupported("clear"))
    }

    pub fn put_all<I>(&mut self, _other: Option<I>) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Err(MapError::unsupported("put_all"))
    }

    pub fn put_if_absent(&mut self, _key: K, _value: V) -> Result<Option<&V>, MapError> {
        Err(MapError::unsupported("put_if_absent"))
    }

    pub fn replace<Q>(&mut self, _key: &Q, _value: V) -> Result<Option<V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Err(MapError::unsupported("replace"))
    }

    pub fn merge<R>(&mut self, _key: K, _value: V, _remap: R) -> Result<(), MapError>
    where
        R: FnOnce(V, V) -> Option<V>,
    {
        Err(MapError::unsupported("merge"))
    }
}

/// Conversion into an [`Unmodifiable`] map.
///
/// Already-frozen maps convert to themselves, so wrapping twice never
/// nests.
pub trait IntoUnmodifiable<K, V, F>
where
    F: OverflowFactory<K, V>,
{
    fn into_unmodifiable(self) -> Unmodifiable<K, V, F>;
}

impl<K, V, F> IntoUnmodifiable<K, V, F> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    fn into_unmodifiable(self) -> Unmodifiable<K, V, F> {
        Unmodifiable::new(self)
    }
}

impl<K, V, F> IntoUnmodifiable<K, V, F> for Unmodifiable<K, V, F>
where
    F: OverflowFactory<K, V>,
{
    fn into_unmodifiable(self) -> Unmodifiable<K, V, F> {
        self
    }
}

/// Freeze `map`.
///
/// ```
/// use adaptive_map::{unmodifiable, AdaptiveMap, MapError};
///
/// let mut m = AdaptiveMap::new();
/// m.insert("a", 1);
/// let mut frozen = unmodifiable(m);
/// assert_eq!(frozen.get("a"), Some(&1));
/// assert!(matches!(frozen.insert("b", 2), Err(MapError::Unsupported { .. })));
/// let again = unmodifiable(frozen.clone());
/// assert_eq!(again, frozen);
/// ```
pub fn unmodifiable<K, V, F, M>(map: M) -> Unmodifiable<K, V, F>
where
    F: OverflowFactory<K, V>,
    M: IntoUnmodifiable<K, V, F>,
{
    map.into_unmodifiable()
}

impl<K, V, F> fmt::Debug for Unmodifiable<K, V, F>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    F: OverflowFactory<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.map, f)
    }
}

impl<K, V, F, G> PartialEq<Unmodifiable<K, V, G>> for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    F: OverflowFactory<K, V>,
    G: OverflowFactory<K, V>,
{
    fn eq(&self, other: &Unmodifiable<K, V, G>) -> bool {
        *self.map == *other.map
    }
}

impl<K, V, F> Eq for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    V: Eq,
    F: OverflowFactory<K, V>,
{
}

impl<K, V, F, G> PartialEq<AdaptiveMap<K, V, G>> for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    F: OverflowFactory<K, V>,
    G: OverflowFactory<K, V>,
{
    fn eq(&self, other: &AdaptiveMap<K, V, G>) -> bool {
        *self.map == *other
    }
}

impl<K, V, F, G> PartialEq<Unmodifiable<K, V, G>> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    F: OverflowFactory<K, V>,
    G: OverflowFactory<K, V>,
{
    fn eq(&self, other: &Unmodifiable<K, V, G>) -> bool {
        *self == *other.map
    }
}

impl<K, V, F> Hash for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    V: Hash,
    F: OverflowFactory<K, V>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<K, Q, V, F> Index<&Q> for Unmodifiable<K, V, F>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    F: OverflowFactory<K, V>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.map[key]
    }
}

impl<K, V, F> FromIterator<(K, V)> for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<K, V, F> From<AdaptiveMap<K, V, F>> for Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    fn from(map: AdaptiveMap<K, V, F>) -> Self {
        Self::new(map)
    }
}

impl<'a, K, V, F> IntoIterator for &'a Unmodifiable<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, F::Map>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: u32) -> AdaptiveMap<u32, String> {
        (0..n).map(|i| (i, i.to_string())).collect()
    }

    /// Invariant: every mutator fails with `Unsupported` naming itself, and
    /// the contents stay as they were.
    #[test]
    fn all_mutators_are_rejected() {
        let mut frozen = sample(3).into_unmodifiable();
        assert_eq!(
            frozen.insert(9, "x".into()),
            Err(MapError::Unsupported { operation: "insert" })
        );
        assert_eq!(
            frozen.remove(&0),
            Err(MapError::Unsupported { operation: "remove" })
        );
        assert!(frozen.remove_entry(&0).is_err());
        assert_eq!(
            frozen.clear(),
            Err(MapError::Unsupported { operation: "clear" })
        );
        assert!(frozen.put_all(Some(vec![(5, "5".to_string())])).is_err());
        assert!(frozen.put_all(None::<Vec<(u32, String)>>).is_err());
        assert!(frozen.put_if_absent(7, "7".into()).is_err());
        assert!(frozen.replace(&1, "one".into()).is_err());
        assert!(frozen.merge(1, "m".into(), |a, _| Some(a)).is_err());
        assert_eq!(frozen.len(), 3);
        assert_eq!(frozen.get(&1).map(String::as_str), Some("1"));
    }

    /// Invariant: a snapshot taken with `to_unmodifiable` ignores later
    /// writes to the source map.
    #[test]
    fn snapshot_is_not_live() {
        let mut source = sample(2);
        let frozen = source.to_unmodifiable();
        source.insert(2, "2".into());
        source.remove(&0);
        assert_eq!(frozen.len(), 2);
        assert!(frozen.contains_key(&0));
        assert!(!frozen.contains_key(&2));
    }

    /// Invariant: wrapping an already frozen map shares the same snapshot.
    #[test]
    fn unmodifiable_does_not_double_wrap() {
        let frozen = sample(8).into_unmodifiable();
        let again = unmodifiable(frozen.clone());
        assert!(Arc::ptr_eq(&frozen.map, &again.map));
    }

    #[test]
    fn to_modifiable_is_independent() {
        let frozen = sample(7).into_unmodifiable();
        let mut copy = frozen.to_modifiable();
        copy.insert(100, "100".into());
        assert_eq!(frozen.len(), 7);
        assert_eq!(copy.len(), 8);
        assert!(frozen.is_overflow());
    }

    #[test]
    fn reads_forward_to_the_wrapped_map() {
        let map = sample(4);
        let frozen = Unmodifiable::from(map.copy());
        assert_eq!(frozen, map);
        assert_eq!(map, frozen);
        assert_eq!(frozen.content_hash(), map.content_hash());
        assert_eq!(frozen.keys().count(), 4);
        assert_eq!(frozen.values().count(), 4);
        assert!(frozen.key_set().contains(&3));
        assert!(frozen.values_view().contains(&"2".to_string()));
        assert!(frozen.entry_set().contains(&1, &"1".to_string()));
        assert_eq!(&frozen[&2], "2");
        assert_eq!(frozen.as_map().len(), 4);
        assert_eq!((&frozen).into_iter().count(), 4);
    }

    #[test]
    fn copy_of_none_is_empty() {
        let frozen: Unmodifiable<u32, u32> = Unmodifiable::copy_of(None::<Vec<(u32, u32)>>);
        assert!(frozen.is_empty());
    }
}
