//! AdaptiveMap: public facade owning exactly one representation.

use crate::entry::pair_hash;
use crate::error::MapError;
use crate::overflow::{small_limit, HashFactory, OverflowFactory};
use crate::repr::Repr;
use crate::unmodifiable::Unmodifiable;
use crate::views::{
    EntrySet, IntoIter, Iter, IterMut, KeySet, Keys, Values, ValuesMut, ValuesView,
};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::mem;
use core::ops::Index;

/// Map that stores a handful of entries inline and spills into an
/// overflow map produced by `F` once it outgrows them.
///
/// Every mutation is forwarded to the current representation, which
/// returns its successor; the map stores whatever comes back. Reads are
/// forwarded as is.
///
/// ```
/// use adaptive_map::AdaptiveMap;
///
/// let mut m = AdaptiveMap::new();
/// assert_eq!(m.insert("a", 1), None);
/// assert_eq!(m.insert("b", 2), None);
/// assert_eq!(m.insert("a", 3), Some(1));
/// assert_eq!(m.get("a"), Some(&3));
/// assert_eq!(m.remove("b"), Some(2));
/// assert_eq!(m.remove("z"), None);
/// assert_eq!(m.len(), 1);
/// ```
pub struct AdaptiveMap<K, V, F = HashFactory>
where
    F: OverflowFactory<K, V>,
{
    repr: Repr<K, V, F::Map>,
    factory: F,
}

impl<K, V> AdaptiveMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map using the fixed `hashbrown` fallback.
    pub fn new() -> Self {
        Self::with_factory(HashFactory::default())
    }

    /// Empty map sized for `capacity` entries. Above the inline limit the
    /// overflow map is allocated up front and used from the first insert.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_factory(capacity, HashFactory::default())
    }
}

impl<K, V, F> AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    pub fn with_factory(factory: F) -> Self {
        Self {
            repr: Repr::Empty,
            factory,
        }
    }

    pub fn with_capacity_and_factory(capacity: usize, factory: F) -> Self {
        Self {
            repr: Repr::for_size(capacity, &factory),
            factory,
        }
    }

    /// Build from an optional source. `None` gives an empty map; a source
    /// larger than the inline limit goes straight into overflow.
    pub fn copy_of<I>(source: Option<I>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: Default,
    {
        match source {
            Some(entries) => entries.into_iter().collect(),
            None => Self::with_factory(F::default()),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Largest number of entries this map keeps inline.
    pub fn small_limit(&self) -> usize {
        small_limit::<K, V, F>()
    }

    pub fn len(&self) -> usize {
        self.repr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the overflow map is the active representation.
    pub fn is_overflow(&self) -> bool {
        self.repr.is_overflow()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repr.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repr.get_key_value(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repr.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repr.get_key_value(key).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.repr.contains_value(value)
    }

    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (repr, previous) = mem::take(&mut self.repr).put(key, value, &self.factory);
        self.repr = repr;
        previous
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (repr, removed) = mem::take(&mut self.repr).remove::<Q, F>(key);
        self.repr = repr;
        removed
    }

    /// Insert every pair of `other` in its iteration order.
    ///
    /// `None` is rejected with [`MapError::NullArgument`]. There is no
    /// rollback; pairs are applied one by one.
    pub fn put_all<I>(&mut self, other: Option<I>) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let other = other.ok_or(MapError::null_argument("other"))?;
        self.extend(other);
        Ok(())
    }

    /// Insert only if `key` is absent. Returns the value already present,
    /// if any, leaving it untouched.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        if self.contains_key(&key) {
            return self.get(&key);
        }
        self.insert(key, value);
        None
    }

    /// Overwrite the value of a present key; absent keys are left absent.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).map(|slot| mem::replace(slot, value))
    }

    /// Insert `value`, or combine it with the present one via `remap`.
    /// A combined value replaces the old one in place; a `None` from
    /// `remap` removes the key.
    pub fn merge<R>(&mut self, key: K, value: V, remap: R)
    where
        R: FnOnce(V, V) -> Option<V>,
    {
        self.repr = mem::take(&mut self.repr).merge(key, value, remap, &self.factory);
    }

    /// Undo pre-sizing once a bulk build is done. Repeated keys can leave
    /// fewer entries than the source length suggested.
    pub(crate) fn settle(&mut self) {
        self.repr = mem::take(&mut self.repr).settle::<F>();
    }

    /// Drop every entry and return to the empty representation.
    pub fn clear(&mut self) {
        self.repr = Repr::Empty;
    }

    /// Independent map with the same entries. Keys and values are cloned;
    /// the representation is freshly built.
    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        F: Clone,
    {
        Self {
            repr: self.repr.copy(&self.factory),
            factory: self.factory.clone(),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V, F::Map> {
        Iter::new(&self.repr)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, F::Map> {
        IterMut::new(&mut self.repr)
    }

    pub fn keys(&self) -> Keys<'_, K, V, F::Map> {
        Keys::new(&self.repr)
    }

    pub fn values(&self) -> Values<'_, K, V, F::Map> {
        Values::new(&self.repr)
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, F::Map> {
        ValuesMut::new(&mut self.repr)
    }

    pub fn key_set(&self) -> KeySet<'_, K, V, F::Map> {
        KeySet::new(&self.repr)
    }

    pub fn values_view(&self) -> ValuesView<'_, K, V, F::Map> {
        ValuesView::new(&self.repr)
    }

    pub fn entry_set(&self) -> EntrySet<'_, K, V, F::Map> {
        EntrySet::new(&self.repr)
    }

    /// Order-independent hash of the contents: the wrapping sum of each
    /// pair's hash. Equal maps agree regardless of layout.
    pub fn content_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        self.iter()
            .fold(0u64, |acc, (k, v)| acc.wrapping_add(pair_hash(k, v)))
    }

    /// Freeze this map. The wrapper takes ownership; nothing else can
    /// mutate it afterwards.
    pub fn into_unmodifiable(self) -> Unmodifiable<K, V, F> {
        Unmodifiable::new(self)
    }

    /// Frozen snapshot of the current contents.
    pub fn to_unmodifiable(&self) -> Unmodifiable<K, V, F>
    where
        K: Clone,
        V: Clone,
        F: Clone,
    {
        Unmodifiable::new(self.copy())
    }
}

impl<K, V, F> Default for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V> + Default,
{
    fn default() -> Self {
        Self::with_factory(F::default())
    }
}

impl<K, V, F> Clone for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: OverflowFactory<K, V> + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K, V, F> fmt::Debug for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    F: OverflowFactory<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, F, G> PartialEq<AdaptiveMap<K, V, G>> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    F: OverflowFactory<K, V>,
    G: OverflowFactory<K, V>,
{
    fn eq(&self, other: &AdaptiveMap<K, V, G>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, F> Eq for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: Eq,
    F: OverflowFactory<K, V>,
{
}

impl<K, V, S, F> PartialEq<std::collections::HashMap<K, V, S>> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    F: OverflowFactory<K, V>,
{
    fn eq(&self, other: &std::collections::HashMap<K, V, S>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S, F> PartialEq<AdaptiveMap<K, V, F>> for std::collections::HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    F: OverflowFactory<K, V>,
{
    fn eq(&self, other: &AdaptiveMap<K, V, F>) -> bool {
        other == self
    }
}

impl<K, V, S, F> PartialEq<hashbrown::HashMap<K, V, S>> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    F: OverflowFactory<K, V>,
{
    fn eq(&self, other: &hashbrown::HashMap<K, V, S>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S, F> PartialEq<AdaptiveMap<K, V, F>> for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    F: OverflowFactory<K, V>,
{
    fn eq(&self, other: &AdaptiveMap<K, V, F>) -> bool {
        other == self
    }
}

impl<K, V, F> Hash for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    V: Hash,
    F: OverflowFactory<K, V>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        state.write_u64(self.content_hash());
    }
}

impl<K, Q, V, F> Index<&Q> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    F: OverflowFactory<K, V>,
{
    type Output = V;

    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, F> Extend<(K, V)> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, F> Extend<(&'a K, &'a V)> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + Copy,
    V: Copy,
    F: OverflowFactory<K, V>,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(*k, *v);
        }
    }
}

impl<K, V, F> FromIterator<(K, V)> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_factory(iter.size_hint().0, F::default());
        map.extend(iter);
        map.settle();
        map
    }
}

impl<K, V, F, const N: usize> From<[(K, V); N]> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V> + Default,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V, F> IntoIterator for AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, F::Map>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.repr)
    }
}

impl<'a, K, V, F> IntoIterator for &'a AdaptiveMap<K, V, F>
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

impl<'a, K, V, F> IntoIterator for &'a mut AdaptiveMap<K, V, F>
where
    K: Eq + Hash,
    F: OverflowFactory<K, V>,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, F::Map>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
