//! Views: iterators and set-shaped read-only views over a representation.
//!
//! Nothing here allocates. A view holds a shared borrow of the map, so it
//! cannot outlive a representation change.

use crate::entry::Entry;
use crate::overflow::OverflowMap;
use crate::repr::{Layout, LayoutMut, Repr, Slots};
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    inner: IterInner<'a, K, V, M>,
}

enum IterInner<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    Small(core::slice::Iter<'a, Entry<K, V>>),
    Overflow(M::Iter<'a>),
}

impl<'a, K, V, M> Iter<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    pub(crate) fn new(repr: &'a Repr<K, V, M>) -> Self {
        let inner = match repr.layout() {
            Layout::Small(slots) => IterInner::Small(slots.iter()),
            Layout::Overflow(m) => IterInner::Overflow(m.iter()),
        };
        Iter { inner }
    }
}

impl<'a, K, V, M> Iterator for Iter<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Small(it) => it.next().map(Entry::pair),
            IterInner::Overflow(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Small(it) => it.size_hint(),
            IterInner::Overflow(it) => it.size_hint(),
        }
    }
}

impl<'a, K, V, M> ExactSizeIterator for Iter<'a, K, V, M> where M: OverflowMap<K, V> + 'a {}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    inner: IterMutInner<'a, K, V, M>,
}

enum IterMutInner<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    Small(core::slice::IterMut<'a, Entry<K, V>>),
    Overflow(M::IterMut<'a>),
}

impl<'a, K, V, M> IterMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    pub(crate) fn new(repr: &'a mut Repr<K, V, M>) -> Self {
        let inner = match repr.layout_mut() {
            LayoutMut::Small(slots) => IterMutInner::Small(slots.iter_mut()),
            LayoutMut::Overflow(m) => IterMutInner::Overflow(m.iter_mut()),
        };
        IterMut { inner }
    }
}

impl<'a, K, V, M> Iterator for IterMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterMutInner::Small(it) => it.next().map(Entry::pair_mut),
            IterMutInner::Overflow(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterMutInner::Small(it) => it.size_hint(),
            IterMutInner::Overflow(it) => it.size_hint(),
        }
    }
}

impl<'a, K, V, M> ExactSizeIterator for IterMut<'a, K, V, M> where M: OverflowMap<K, V> + 'a {}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V, M>
where
    M: OverflowMap<K, V>,
{
    inner: IntoIterInner<K, V, M>,
}

enum IntoIterInner<K, V, M>
where
    M: OverflowMap<K, V>,
{
    Small(arrayvec::IntoIter<Entry<K, V>, { crate::overflow::MAX_SMALL_ARITY }>),
    Overflow(M::IntoEntries),
}

impl<K, V, M> IntoIter<K, V, M>
where
    M: OverflowMap<K, V>,
{
    pub(crate) fn new(repr: Repr<K, V, M>) -> Self {
        let inner = match repr.into_slots() {
            Ok(slots) => IntoIterInner::Small(Slots::into_iter(slots)),
            Err(m) => IntoIterInner::Overflow(m.into_entries()),
        };
        IntoIter { inner }
    }
}

impl<K, V, M> Iterator for IntoIter<K, V, M>
where
    M: OverflowMap<K, V>,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        match &mut self.inner {
            IntoIterInner::Small(it) => it.next().map(Entry::into_pair),
            IntoIterInner::Overflow(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IntoIterInner::Small(it) => it.size_hint(),
            IntoIterInner::Overflow(it) => it.size_hint(),
        }
    }
}

impl<K, V, M> ExactSizeIterator for IntoIter<K, V, M> where M: OverflowMap<K, V> {}

/// Iterator over keys.
pub struct Keys<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    inner: Iter<'a, K, V, M>,
}

impl<'a, K, V, M> Iterator for Keys<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, M> ExactSizeIterator for Keys<'a, K, V, M> where M: OverflowMap<K, V> + 'a {}

/// Iterator over values.
pub struct Values<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    inner: Iter<'a, K, V, M>,
}

impl<'a, K, V, M> Iterator for Values<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, M> ExactSizeIterator for Values<'a, K, V, M> where M: OverflowMap<K, V> + 'a {}

/// Iterator over mutable values.
pub struct ValuesMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    inner: IterMut<'a, K, V, M>,
}

impl<'a, K, V, M> Iterator for ValuesMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, M> ExactSizeIterator for ValuesMut<'a, K, V, M> where M: OverflowMap<K, V> + 'a {}

impl<'a, K, V, M> Keys<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    pub(crate) fn new(repr: &'a Repr<K, V, M>) -> Self {
        Keys {
            inner: Iter::new(repr),
        }
    }
}

impl<'a, K, V, M> Values<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    pub(crate) fn new(repr: &'a Repr<K, V, M>) -> Self {
        Values {
            inner: Iter::new(repr),
        }
    }
}

impl<'a, K, V, M> ValuesMut<'a, K, V, M>
where
    M: OverflowMap<K, V> + 'a,
{
    pub(crate) fn new(repr: &'a mut Repr<K, V, M>) -> Self {
        ValuesMut {
            inner: IterMut::new(repr),
        }
    }
}

/// Read-only set of the map's keys.
pub struct KeySet<'a, K, V, M> {
    repr: &'a Repr<K, V, M>,
}

/// Read-only collection of the map's values. Duplicates are kept.
pub struct ValuesView<'a, K, V, M> {
    repr: &'a Repr<K, V, M>,
}

/// Read-only set of the map's `(key, value)` pairs.
pub struct EntrySet<'a, K, V, M> {
    repr: &'a Repr<K, V, M>,
}

macro_rules! view_common {
    ($view:ident) => {
        impl<'a, K, V, M> $view<'a, K, V, M> {
            pub(crate) fn new(repr: &'a Repr<K, V, M>) -> Self {
                $view { repr }
            }
        }

        impl<'a, K, V, M> Clone for $view<'a, K, V, M> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<'a, K, V, M> Copy for $view<'a, K, V, M> {}

        impl<'a, K, V, M> $view<'a, K, V, M>
        where
            K: Eq + Hash,
            M: OverflowMap<K, V>,
        {
            pub fn len(&self) -> usize {
                self.repr.len()
            }

            pub fn is_empty(&self) -> bool {
                self.repr.len() == 0
            }
        }
    };
}

view_common!(KeySet);
view_common!(ValuesView);
view_common!(EntrySet);

impl<'a, K, V, M> KeySet<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repr.get_key_value(key).is_some()
    }

    pub fn iter(&self) -> Keys<'a, K, V, M> {
        Keys::new(self.repr)
    }
}

impl<'a, K, V, M> ValuesView<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.repr.contains_value(value)
    }

    pub fn iter(&self) -> Values<'a, K, V, M> {
        Values::new(self.repr)
    }
}

impl<'a, K, V, M> EntrySet<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    /// Whether `key` is present and mapped to `value`.
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.repr
            .get_key_value(key)
            .map_or(false, |(_, v)| v == value)
    }

    pub fn iter(&self) -> Iter<'a, K, V, M> {
        Iter::new(self.repr)
    }
}

impl<'a, K, V, M> IntoIterator for KeySet<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, M> IntoIterator for ValuesView<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    type Item = &'a V;
    type IntoIter = Values<'a, K, V, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, M> IntoIterator for EntrySet<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Set equality: same size and every element of one is in the other.
impl<'a, 'b, K, V, W, M, N> PartialEq<KeySet<'b, K, W, N>> for KeySet<'a, K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
    N: OverflowMap<K, W>,
{
    fn eq(&self, other: &KeySet<'b, K, W, N>) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<'a, 'b, K, V, M, N> PartialEq<EntrySet<'b, K, V, N>> for EntrySet<'a, K, V, M>
where
    K: Eq + Hash,
    V: PartialEq,
    M: OverflowMap<K, V>,
    N: OverflowMap<K, V>,
{
    fn eq(&self, other: &EntrySet<'b, K, V, N>) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.contains(k, v))
    }
}

impl<'a, K, V, M> fmt::Debug for KeySet<'a, K, V, M>
where
    K: Eq + Hash + fmt::Debug,
    M: OverflowMap<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, V, M> fmt::Debug for ValuesView<'a, K, V, M>
where
    K: Eq + Hash,
    V: fmt::Debug,
    M: OverflowMap<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V, M> fmt::Debug for EntrySet<'a, K, V, M>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    M: OverflowMap<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
