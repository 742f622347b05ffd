//! Entry: the key/value slot stored by every small representation.

use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

/// Key/value pair held inline by the small representations.
///
/// The key is fixed for the lifetime of the entry; only the owning
/// representation may swap the value.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    #[inline]
    pub(crate) fn pair_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Store `value` and hand back the one it displaced.
    #[inline]
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Hash of a single key/value pair. Fixed SipHash keys make the result
/// identical across map instances, which `content_hash` relies on.
pub(crate) fn pair_hash<K, V>(key: &K, value: &V) -> u64
where
    K: ?Sized + Hash,
    V: ?Sized + Hash,
{
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    value.hash(&mut h);
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: replacing a value returns the previous one and keeps the key.
    #[test]
    fn replace_value_keeps_key() {
        let mut e = Entry::new("k", 1);
        assert_eq!(e.replace_value(2), 1);
        assert_eq!(e.pair(), (&"k", &2));
        assert_eq!(e.into_pair(), ("k", 2));
    }

    /// Invariant: the pair hash is a pure function of key and value.
    #[test]
    fn pair_hash_is_deterministic() {
        assert_eq!(pair_hash("a", &1), pair_hash("a", &1));
        assert_ne!(pair_hash("a", &1), pair_hash("a", &2));
    }

    #[test]
    fn clone_is_independent() {
        let original = Entry::new(1, String::from("one"));
        let mut copy = original.clone();
        copy.replace_value(String::from("uno"));
        assert_eq!(original.value(), "one");
        assert_eq!(copy.value(), "uno");
        assert_eq!(copy.key(), &1);
    }
}
