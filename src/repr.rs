//! Repr: arity-tagged representations and the transitions between them.
//!
//! Each small arity has its own variant holding exactly that many entries
//! inline. Mutations consume the current representation and return the
//! next one, so a representation that has been replaced cannot be used.
//!
//! Lookups in the small variants are a linear equality scan over at most
//! six slots; the query key is never hashed.

use crate::entry::Entry;
use crate::overflow::{small_limit, OverflowFactory, OverflowMap, MAX_SMALL_ARITY};
use arrayvec::ArrayVec;
use core::borrow::Borrow;
use core::hash::Hash;

/// Staging buffer used while rebuilding across an arity boundary.
pub(crate) type Slots<K, V> = ArrayVec<Entry<K, V>, MAX_SMALL_ARITY>;

pub(crate) enum Repr<K, V, M> {
    Empty,
    One([Entry<K, V>; 1]),
    Two([Entry<K, V>; 2]),
    Three([Entry<K, V>; 3]),
    Four([Entry<K, V>; 4]),
    Five([Entry<K, V>; 5]),
    Six([Entry<K, V>; 6]),
    Overflow(M),
}

/// Borrowed view of whichever storage is active.
pub(crate) enum Layout<'a, K, V, M> {
    Small(&'a [Entry<K, V>]),
    Overflow(&'a M),
}

pub(crate) enum LayoutMut<'a, K, V, M> {
    Small(&'a mut [Entry<K, V>]),
    Overflow(&'a mut M),
}

impl<K, V, M> Default for Repr<K, V, M> {
    fn default() -> Self {
        Repr::Empty
    }
}

impl<K, V, M> Repr<K, V, M> {
    pub(crate) fn layout(&self) -> Layout<'_, K, V, M> {
        match self {
            Repr::Empty => Layout::Small(&[]),
            Repr::One(s) => Layout::Small(s),
            Repr::Two(s) => Layout::Small(s),
            Repr::Three(s) => Layout::Small(s),
            Repr::Four(s) => Layout::Small(s),
            Repr::Five(s) => Layout::Small(s),
            Repr::Six(s) => Layout::Small(s),
            Repr::Overflow(m) => Layout::Overflow(m),
        }
    }

    pub(crate) fn layout_mut(&mut self) -> LayoutMut<'_, K, V, M> {
        match self {
            Repr::Empty => LayoutMut::Small(&mut []),
            Repr::One(s) => LayoutMut::Small(s),
            Repr::Two(s) => LayoutMut::Small(s),
            Repr::Three(s) => LayoutMut::Small(s),
            Repr::Four(s) => LayoutMut::Small(s),
            Repr::Five(s) => LayoutMut::Small(s),
            Repr::Six(s) => LayoutMut::Small(s),
            Repr::Overflow(m) => LayoutMut::Overflow(m),
        }
    }

    #[inline]
    pub(crate) fn is_overflow(&self) -> bool {
        matches!(self, Repr::Overflow(_))
    }

    /// Move the inline entries out, or hand back the overflow map.
    pub(crate) fn into_slots(self) -> Result<Slots<K, V>, M> {
        match self {
            Repr::Empty => Ok(Slots::new()),
            Repr::One(s) => Ok(s.into_iter().collect()),
            Repr::Two(s) => Ok(s.into_iter().collect()),
            Repr::Three(s) => Ok(s.into_iter().collect()),
            Repr::Four(s) => Ok(s.into_iter().collect()),
            Repr::Five(s) => Ok(s.into_iter().collect()),
            Repr::Six(s) => Ok(s.into_iter().collect()),
            Repr::Overflow(m) => Err(m),
        }
    }

    /// Pick the variant whose arity matches `slots.len()`, keeping order.
    pub(crate) fn from_slots(slots: Slots<K, V>) -> Self {
        let mut it = slots.into_iter();
        match (it.next(), it.next(), it.next(), it.next(), it.next(), it.next()) {
            (None, ..) => Repr::Empty,
            (Some(a), None, ..) => Repr::One([a]),
            (Some(a), Some(b), None, ..) => Repr::Two([a, b]),
            (Some(a), Some(b), Some(c), None, ..) => Repr::Three([a, b, c]),
            (Some(a), Some(b), Some(c), Some(d), None, _) => Repr::Four([a, b, c, d]),
            (Some(a), Some(b), Some(c), Some(d), Some(e), None) => Repr::Five([a, b, c, d, e]),
            (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => {
                Repr::Six([a, b, c, d, e, f])
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn arity(&self) -> Option<usize> {
        match self.layout() {
            Layout::Small(slots) => Some(slots.len()),
            Layout::Overflow(_) => None,
        }
    }
}

fn position<K, V, Q>(slots: &[Entry<K, V>], key: &Q) -> Option<usize>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    slots.iter().position(|e| e.key().borrow() == key)
}

impl<K, V, M> Repr<K, V, M>
where
    K: Eq + Hash,
    M: OverflowMap<K, V>,
{
    /// Empty representation sized for `capacity` entries: inline when they
    /// fit, otherwise a pre-allocated overflow map.
    pub(crate) fn for_size<F>(capacity: usize, factory: &F) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        if capacity > small_limit::<K, V, F>() {
            Repr::Overflow(factory.create(capacity))
        } else {
            Repr::Empty
        }
    }

    /// Number of entries, read from the tag for the inline variants.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Repr::Empty => 0,
            Repr::One(_) => 1,
            Repr::Two(_) => 2,
            Repr::Three(_) => 3,
            Repr::Four(_) => 4,
            Repr::Five(_) => 5,
            Repr::Six(_) => 6,
            Repr::Overflow(m) => m.len(),
        }
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.layout() {
            Layout::Small(slots) => position(slots, key).map(|i| slots[i].pair()),
            Layout::Overflow(m) => m.get_key_value(key),
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.layout_mut() {
            LayoutMut::Small(slots) => slots
                .iter_mut()
                .find(|e| e.key().borrow() == key)
                .map(|e| e.pair_mut().1),
            LayoutMut::Overflow(m) => m.get_mut(key),
        }
    }

    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        match self.layout() {
            Layout::Small(slots) => slots.iter().any(|e| e.value() == value),
            Layout::Overflow(m) => m.iter().any(|(_, v)| v == value),
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// An existing key keeps its slot and the arity is unchanged. A new key
    /// moves to the next arity, or into a fresh overflow map when the
    /// inline limit of `F` is reached.
    pub(crate) fn put<F>(self, key: K, value: V, factory: &F) -> (Self, Option<V>)
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        let mut slots = match self.into_slots() {
            Ok(slots) => slots,
            Err(mut map) => {
                let previous = map.insert(key, value);
                return (Repr::Overflow(map), previous);
            }
        };
        if let Some(slot) = slots.iter_mut().find(|e| *e.key() == key) {
            let previous = slot.replace_value(value);
            return (Self::from_slots(slots), Some(previous));
        }
        (Self::grow(slots, Entry::new(key, value), factory), None)
    }

    /// Append a new entry, spilling when the inline limit is reached.
    fn grow<F>(mut slots: Slots<K, V>, entry: Entry<K, V>, factory: &F) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        if slots.len() >= small_limit::<K, V, F>() {
            return Self::spill(slots, entry, factory);
        }
        match slots.try_push(entry) {
            Ok(()) => Self::from_slots(slots),
            Err(full) => Self::spill(slots, full.element(), factory),
        }
    }

    /// Copy every inline entry plus `entry` into a new overflow map.
    fn spill<F>(slots: Slots<K, V>, entry: Entry<K, V>, factory: &F) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        let mut map = factory.create(slots.len() + 1);
        for e in slots.into_iter().chain(core::iter::once(entry)) {
            let (key, value) = e.into_pair();
            map.insert(key, value);
        }
        log::trace!("spilled {} entries into overflow storage", map.len());
        Repr::Overflow(map)
    }

    /// Remove `key`, returning the owned pair.
    ///
    /// Inline variants drop to the previous arity with the untouched
    /// entries in their original order. Overflow stays overflow unless
    /// `F::SHRINKS_BACK` is set and exactly `SMALL_LIMIT` entries remain.
    pub(crate) fn remove<Q, F>(self, key: &Q) -> (Self, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: OverflowFactory<K, V, Map = M>,
    {
        let mut slots = match self.into_slots() {
            Ok(slots) => slots,
            Err(mut map) => {
                return match map.remove_entry(key) {
                    Some(removed) => (Self::after_removal::<F>(map), Some(removed)),
                    None => (Repr::Overflow(map), None),
                };
            }
        };
        let removed = position(&slots, key)
            .and_then(|index| slots.pop_at(index))
            .map(Entry::into_pair);
        (Self::from_slots(slots), removed)
    }

    /// Insert `value`, or combine it with the stored one through `remap`.
    ///
    /// A combined value stays where the old one was, so inline order and
    /// the representation are kept. `None` from `remap` removes the entry
    /// with the same transition as [`Repr::remove`].
    pub(crate) fn merge<F, R>(self, key: K, value: V, remap: R, factory: &F) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
        R: FnOnce(V, V) -> Option<V>,
    {
        let mut slots = match self.into_slots() {
            Ok(slots) => slots,
            Err(mut map) => {
                let Some((stored, previous)) = map.remove_entry(&key) else {
                    map.insert(key, value);
                    return Repr::Overflow(map);
                };
                return match remap(previous, value) {
                    Some(merged) => {
                        map.insert(stored, merged);
                        Repr::Overflow(map)
                    }
                    None => Self::after_removal::<F>(map),
                };
            }
        };
        let Some(index) = position(&slots, &key) else {
            return Self::grow(slots, Entry::new(key, value), factory);
        };
        let (stored, previous) = slots.remove(index).into_pair();
        if let Some(merged) = remap(previous, value) {
            slots.insert(index, Entry::new(stored, merged));
        }
        Self::from_slots(slots)
    }

    /// Representation after an entry left the overflow map `map`.
    fn after_removal<F>(map: M) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        if F::SHRINKS_BACK && map.len() == small_limit::<K, V, F>() {
            Self::shrink(map)
        } else {
            Repr::Overflow(map)
        }
    }

    /// Move a freshly bulk-built overflow map inline when its entries fit.
    ///
    /// Only for maps that have seen inserts alone since they were sized:
    /// their length is then the most they ever held, so no spill was due.
    pub(crate) fn settle<F>(self) -> Self
    where
        F: OverflowFactory<K, V, Map = M>,
    {
        match self {
            Repr::Overflow(map) if map.len() <= small_limit::<K, V, F>() => Self::shrink(map),
            other => other,
        }
    }

    fn shrink(map: M) -> Self {
        if map.len() > MAX_SMALL_ARITY {
            return Repr::Overflow(map);
        }
        let slots: Slots<K, V> = map
            .into_entries()
            .map(|(key, value)| Entry::new(key, value))
            .collect();
        log::trace!("moved {} entries back inline", slots.len());
        Self::from_slots(slots)
    }

    /// Fresh structure with the same entries. Inline arrays are cloned;
    /// an overflow map is rebuilt through `factory`.
    pub(crate) fn copy<F>(&self, factory: &F) -> Self
    where
        K: Clone,
        V: Clone,
        F: OverflowFactory<K, V, Map = M>,
    {
        match self {
            Repr::Empty => Repr::Empty,
            Repr::One(s) => Repr::One(s.clone()),
            Repr::Two(s) => Repr::Two(s.clone()),
            Repr::Three(s) => Repr::Three(s.clone()),
            Repr::Four(s) => Repr::Four(s.clone()),
            Repr::Five(s) => Repr::Five(s.clone()),
            Repr::Six(s) => Repr::Six(s.clone()),
            Repr::Overflow(m) => {
                let mut fresh = factory.create(m.len());
                for (key, value) in m.iter() {
                    fresh.insert(key.clone(), value.clone());
                }
                Repr::Overflow(fresh)
            }
        }
    }
}
