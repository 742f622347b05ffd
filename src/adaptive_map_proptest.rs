#![cfg(test)]

// Property tests for AdaptiveMap kept inside the crate so they can check
// the active representation against the model after every step.

use crate::{AdaptiveMap, FromFn, HashFactory, OverflowFactory, FIXED_SMALL_LIMIT, MAX_SMALL_ARITY};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    PutIfAbsent(usize, i32),
    Replace(usize, i32),
    Merge(usize, i32),
    Clear,
    Iterate,
    CopyEq,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            4 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (-3i32..3).prop_map(OpI::ContainsValue),
            2 => (idx.clone(), -100i32..100).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::PutIfAbsent(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            2 => (idx.clone(), -3i32..3).prop_map(|(i, v)| OpI::Merge(i, v)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::CopyEq),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// How the representation is expected to move for a given factory.
#[derive(Clone, Copy, Debug)]
enum Policy {
    // Overflow exactly when more than `limit` entries are present.
    ShrinksBack { limit: usize },
    // Overflow once more than `limit` entries were ever present since the
    // last clear.
    Ratchet { limit: usize },
}

fn run_ops<F>(
    mut sut: AdaptiveMap<Key, i32, F>,
    pool: &[String],
    ops: Vec<OpI>,
    policy: Policy,
) -> Result<(), TestCaseError>
where
    F: OverflowFactory<Key, i32> + Clone,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut spilled = false;

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove_entry(k.0.as_str()), model.remove_entry(&k));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get_key_value(k.0.as_str()), model.get_key_value(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
                prop_assert_eq!(sut.key_set().contains(s.as_str()), has_model);
            }
            OpI::ContainsValue(v) => {
                let has_model = model.values().any(|x| *x == v);
                prop_assert_eq!(sut.contains_value(&v), has_model);
                prop_assert_eq!(sut.values_view().contains(&v), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(vr) = sut.get_mut(&k) {
                    *vr = vr.saturating_add(d);
                }
                if let Some(mv) = model.get_mut(&k) {
                    *mv = mv.saturating_add(d);
                }
            }
            OpI::PutIfAbsent(i, v) => {
                let k = key_from(pool, i);
                let expected = model.get(&k).copied();
                prop_assert_eq!(sut.put_if_absent(k.clone(), v).copied(), expected);
                model.entry(k).or_insert(v);
            }
            OpI::Replace(i, v) => {
                let k = key_from(pool, i);
                let expected = model.get_mut(&k).map(|slot| std::mem::replace(slot, v));
                prop_assert_eq!(sut.replace(&k, v), expected);
            }
            OpI::Merge(i, v) => {
                // Sum, dropping the key when the sum is zero.
                let k = key_from(pool, i);
                sut.merge(k.clone(), v, |a, b| {
                    let sum = a.saturating_add(b);
                    (sum != 0).then_some(sum)
                });
                match model.remove(&k) {
                    None => {
                        model.insert(k, v);
                    }
                    Some(prev) => {
                        let sum = prev.saturating_add(v);
                        if sum != 0 {
                            model.insert(k, sum);
                        }
                    }
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                spilled = false;
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().len(), model.len());
                let s_sum: i64 = sut.values().map(|v| *v as i64).sum();
                let m_sum: i64 = model.values().map(|v| *v as i64).sum();
                prop_assert_eq!(s_sum, m_sum);
            }
            OpI::CopyEq => {
                let copy = sut.copy();
                prop_assert!(copy == sut);
                prop_assert_eq!(copy.content_hash(), sut.content_hash());
                prop_assert_eq!(copy.is_overflow(), sut.is_overflow());
            }
        }

        // Post-conditions after each op
        // 1) Size and content parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut == model);
        // 2) Representation follows the factory's policy
        match policy {
            Policy::ShrinksBack { limit } => {
                prop_assert_eq!(sut.is_overflow(), model.len() > limit);
            }
            Policy::Ratchet { limit } => {
                spilled |= model.len() > limit;
                prop_assert_eq!(sut.is_overflow(), spilled);
            }
        }
    }
    Ok(())
}

type OpenFactory = FromFn<fn(usize) -> HashMap<Key, i32>>;

fn open_factory() -> OpenFactory {
    crate::from_fn(HashMap::with_capacity as fn(usize) -> HashMap<Key, i32>)
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove/get/replace/merge/put_if_absent return what the model returns.
// - contains_key/contains_value and the set views agree with the model.
// - Copies compare equal, hash equally and keep the representation.
// - Fixed fallback: overflow iff more than five entries.
// - Closure fallback: overflow once more than six entries, until clear.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_fixed((pool, ops) in arb_scenario()) {
        let sut: AdaptiveMap<Key, i32> = AdaptiveMap::new();
        run_ops(sut, &pool, ops, Policy::ShrinksBack { limit: FIXED_SMALL_LIMIT })?;
    }

    #[test]
    fn prop_state_machine_closure_factory((pool, ops) in arb_scenario()) {
        let sut = AdaptiveMap::with_factory(open_factory());
        run_ops(sut, &pool, ops, Policy::Ratchet { limit: MAX_SMALL_ARITY })?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, with every overflow
// key colliding. Inline forms never hash, so only the overflow map is
// stressed; transitions in and out of it must still preserve contents.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: AdaptiveMap<Key, i32, HashFactory<ConstBuildHasher>> =
            AdaptiveMap::with_factory(HashFactory::with_hasher(ConstBuildHasher));
        run_ops(sut, &pool, ops, Policy::ShrinksBack { limit: FIXED_SMALL_LIMIT })?;
    }
}
