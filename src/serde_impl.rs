// Serde support, enabled with the `serde` feature. Maps serialize as plain
// maps; deserializing inserts pair by pair so the representation follows
// the usual transitions.

use crate::adaptive_map::AdaptiveMap;
use crate::overflow::OverflowFactory;
use crate::unmodifiable::Unmodifiable;
use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl<K, V, F> Serialize for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + Serialize,
    V: Serialize,
    F: OverflowFactory<K, V>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K, V, F> Serialize for Unmodifiable<K, V, F>
where
    K: Eq + Hash + Serialize,
    V: Serialize,
    F: OverflowFactory<K, V>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_map().serialize(serializer)
    }
}

struct AdaptiveMapVisitor<K, V, F> {
    marker: PhantomData<fn() -> (K, V, F)>,
}

impl<K, V, F> AdaptiveMapVisitor<K, V, F> {
    const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<'de, K, V, F> Visitor<'de> for AdaptiveMapVisitor<K, V, F>
where
    K: Eq + Hash + Deserialize<'de>,
    V: Deserialize<'de>,
    F: OverflowFactory<K, V> + Default,
{
    type Value = AdaptiveMap<K, V, F>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0);
        let mut map = AdaptiveMap::with_capacity_and_factory(capacity, F::default());
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        map.settle();
        Ok(map)
    }
}

impl<'de, K, V, F> Deserialize<'de> for AdaptiveMap<K, V, F>
where
    K: Eq + Hash + Deserialize<'de>,
    V: Deserialize<'de>,
    F: OverflowFactory<K, V> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AdaptiveMapVisitor::new())
    }
}

impl<'de, K, V, F> Deserialize<'de> for Unmodifiable<K, V, F>
where
    K: Eq + Hash + Deserialize<'de>,
    V: Deserialize<'de>,
    F: OverflowFactory<K, V> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        AdaptiveMap::deserialize(deserializer).map(Unmodifiable::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::{AdaptiveMap, Unmodifiable};

    #[test]
    fn json_round_trip_small_and_overflow() {
        for n in [0u32, 3, 12] {
            let m: AdaptiveMap<String, u32> = (0..n).map(|i| (format!("k{i}"), i)).collect();
            let text = serde_json::to_string(&m).unwrap();
            let back: AdaptiveMap<String, u32> = serde_json::from_str(&text).unwrap();
            assert_eq!(back, m);
            assert_eq!(back.is_overflow(), m.is_overflow());
        }
    }

    #[test]
    fn unmodifiable_serializes_like_its_map() {
        let m: AdaptiveMap<String, u32> = AdaptiveMap::from([("a".to_string(), 1)]);
        let frozen = m.to_unmodifiable();
        assert_eq!(
            serde_json::to_string(&frozen).unwrap(),
            serde_json::to_string(&m).unwrap()
        );
        let back: Unmodifiable<String, u32> = serde_json::from_str("{\"a\":1}").unwrap();
        assert_eq!(back, m);
    }
}
