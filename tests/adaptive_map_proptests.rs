// AdaptiveMap property tests through the public API.
//
// Property 1: contents decide equality and hashing, not history.
//  - Build two maps from the same pairs in different orders, one through
//    the fixed fallback and one through a closure factory.
//  - Invariant: maps are equal, content_hash agrees, and both equal a
//    std HashMap built from the same pairs.
//
// Property 2: a collected map is inline iff its distinct keys fit.
//  - Collect pairs with repeated keys into the fixed variant.
//  - Invariant: is_overflow() == (len() > FIXED_SMALL_LIMIT).
//
// Property 3: a frozen snapshot ignores later writes.
//  - Freeze a copy, then apply random inserts/removes to the source.
//  - Invariant: the snapshot still equals the map as it was when frozen.
use adaptive_map::{from_fn, AdaptiveMap, FIXED_SMALL_LIMIT};
use proptest::prelude::*;
use std::collections::HashMap;

fn pairs() -> impl Strategy<Value = Vec<(u8, i16)>> {
    proptest::collection::vec((0u8..16, any::<i16>()), 0..24)
}

proptest! {
    #[test]
    fn prop_order_independent_equality(entries in pairs(), seed in any::<u64>()) {
        let model: HashMap<u8, i16> = entries.iter().copied().collect();

        let fixed: AdaptiveMap<u8, i16> = model.iter().map(|(k, v)| (*k, *v)).collect();

        let mut shuffled: Vec<(u8, i16)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        shuffled.sort_by_key(|(k, _)| (*k as u64).wrapping_mul(seed | 1) % 97);
        let mut custom = AdaptiveMap::with_factory(from_fn(
            HashMap::with_capacity as fn(usize) -> HashMap<u8, i16>,
        ));
        custom.extend(shuffled);

        prop_assert!(fixed == custom);
        prop_assert!(fixed == model);
        prop_assert_eq!(fixed.len(), model.len());
        prop_assert_eq!(fixed.content_hash(), custom.content_hash());
    }

    #[test]
    fn prop_collect_follows_distinct_keys(entries in pairs()) {
        let distinct: HashMap<u8, i16> = entries.iter().copied().collect();
        let m: AdaptiveMap<u8, i16> = entries.into_iter().collect();
        prop_assert_eq!(m.len(), distinct.len());
        prop_assert_eq!(m.is_overflow(), m.len() > FIXED_SMALL_LIMIT);
        prop_assert!(m == distinct);
    }

    #[test]
    fn prop_snapshot_is_stable(
        entries in pairs(),
        writes in proptest::collection::vec((any::<bool>(), 0u8..16, any::<i16>()), 1..32),
    ) {
        let mut source: AdaptiveMap<u8, i16> = entries.into_iter().collect();
        let expected: HashMap<u8, i16> = source.iter().map(|(k, v)| (*k, *v)).collect();
        let frozen = source.to_unmodifiable();

        for (insert, k, v) in writes {
            if insert {
                source.insert(k, v);
            } else {
                source.remove(&k);
            }
        }

        prop_assert_eq!(frozen.len(), expected.len());
        for (k, v) in &expected {
            prop_assert_eq!(frozen.get(k), Some(v));
        }
    }
}
