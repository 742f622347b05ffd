use adaptive_map::{
    from_fn, AdaptiveMap, FromFn, MapError, FIXED_SMALL_LIMIT, MAX_SMALL_ARITY,
};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

type Open = AdaptiveMap<String, u32, FromFn<fn(usize) -> HashMap<String, u32>>>;

fn open() -> Open {
    AdaptiveMap::with_factory(from_fn(
        HashMap::with_capacity as fn(usize) -> HashMap<String, u32>,
    ))
}

fn hash_of<T: Hash>(t: &T) -> u64 {
    let mut h = DefaultHasher::new();
    t.hash(&mut h);
    h.finish()
}

// Test: putting k1..k7 walks the inline arities one at a time and spills
// exactly when the factory's limit is passed.
#[test]
fn transitions_follow_each_variant_limit() {
    let mut fixed: AdaptiveMap<String, u32> = AdaptiveMap::new();
    let mut custom = open();
    for i in 1..=7u32 {
        let key = format!("k{i}");
        assert_eq!(fixed.insert(key.clone(), i), None);
        assert_eq!(custom.insert(key, i), None);
        assert_eq!(fixed.len(), i as usize);
        assert_eq!(custom.len(), i as usize);
        assert_eq!(fixed.is_overflow(), i as usize > FIXED_SMALL_LIMIT);
        assert_eq!(custom.is_overflow(), i as usize > MAX_SMALL_ARITY);
    }
    for i in 1..=7u32 {
        assert_eq!(fixed.get(format!("k{i}").as_str()), Some(&i));
        assert_eq!(custom.get(format!("k{i}").as_str()), Some(&i));
    }
    assert_eq!(fixed, custom);
}

// Test: the fixed variant moves back inline when removals leave five
// entries; the closure variant stays in overflow.
#[test]
fn shrink_back_only_for_fixed_variant() {
    let mut fixed: AdaptiveMap<String, u32> = AdaptiveMap::new();
    let mut custom = open();
    for i in 0..7u32 {
        fixed.insert(format!("k{i}"), i);
        custom.insert(format!("k{i}"), i);
    }
    fixed.remove("k0");
    assert_eq!(fixed.len(), 6);
    assert!(fixed.is_overflow());
    fixed.remove("k1");
    assert_eq!(fixed.len(), 5);
    assert!(!fixed.is_overflow());

    for i in 0..7u32 {
        custom.remove(format!("k{i}").as_str());
        assert!(custom.is_overflow());
    }
    assert!(custom.is_empty());
    custom.clear();
    assert!(!custom.is_overflow());
}

// Test: removing an absent key and overwriting a present one leave the
// representation untouched.
#[test]
fn noop_mutations_keep_shape() {
    let mut m: AdaptiveMap<&str, i32> = AdaptiveMap::from([("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(m.remove("zz"), None);
    assert_eq!(m.insert("b", 20), Some(2));
    assert_eq!(m.len(), 3);
    let order: Vec<_> = m.keys().copied().collect();
    assert_eq!(order, ["a", "b", "c"]);
    assert_eq!(m.remove("a"), Some(1));
    let order: Vec<_> = m.keys().copied().collect();
    assert_eq!(order, ["b", "c"]);
}

// Test: equality holds across representations, factories and std maps;
// hashing agrees for equal maps.
#[test]
fn equality_and_hash_across_types() {
    let inline: AdaptiveMap<String, u32> = (0..4).map(|i| (format!("k{i}"), i)).collect();
    let mut wide: AdaptiveMap<String, u32> = AdaptiveMap::with_capacity(64);
    for i in (0..4).rev() {
        wide.insert(format!("k{i}"), i);
    }
    assert!(!inline.is_overflow());
    assert!(wide.is_overflow());
    assert_eq!(inline, wide);
    assert_eq!(hash_of(&inline), hash_of(&wide));
    assert_eq!(inline.content_hash(), wide.content_hash());

    let std_map: HashMap<String, u32> = (0..4).map(|i| (format!("k{i}"), i)).collect();
    assert_eq!(inline, std_map);
    assert_eq!(std_map, wide);

    let brown: hashbrown::HashMap<String, u32> = (0..4).map(|i| (format!("k{i}"), i)).collect();
    assert_eq!(inline, brown);

    let mut custom = open();
    custom.put_all(Some(std_map)).unwrap();
    assert_eq!(custom, inline);

    let empty_a: AdaptiveMap<String, u32> = AdaptiveMap::new();
    let empty_b = open();
    assert_eq!(empty_a, empty_b);
    assert_eq!(empty_a.content_hash(), 0);
}

// Test: put_all accepts any source, rejects a missing one, and copy_of
// builds from a missing source as empty.
#[test]
fn bulk_operations() {
    let mut m: AdaptiveMap<u32, u32> = AdaptiveMap::new();
    assert_eq!(
        m.put_all(None::<Vec<(u32, u32)>>),
        Err(MapError::NullArgument { argument: "other" })
    );
    m.put_all(Some((0..10).map(|i| (i, i)))).unwrap();
    assert_eq!(m.len(), 10);
    assert!(m.is_overflow());

    let none: AdaptiveMap<u32, u32> = AdaptiveMap::copy_of(None::<HashMap<u32, u32>>);
    assert!(none.is_empty());
    let small: AdaptiveMap<u32, u32> = AdaptiveMap::copy_of(Some([(1, 1), (2, 2)]));
    assert_eq!(small.len(), 2);
    assert!(!small.is_overflow());
}

// Test: views reflect the map and survive no mutation.
#[test]
fn views_follow_contents() {
    let mut m: AdaptiveMap<String, u32> = AdaptiveMap::new();
    for i in 0..8 {
        m.insert(format!("k{i}"), i % 3);
    }
    assert_eq!(m.key_set().len(), 8);
    assert_eq!(m.values_view().len(), 8);
    assert_eq!(m.entry_set().len(), 8);
    assert!(m.key_set().contains("k7"));
    assert!(m.values_view().contains(&2));
    assert!(!m.values_view().contains(&3));
    assert!(m.entry_set().contains("k4", &1));
    assert!(!m.entry_set().contains("k4", &2));

    for v in m.values_mut() {
        *v += 10;
    }
    assert!(m.values().all(|v| *v >= 10));
    for (_, v) in &mut m {
        *v -= 10;
    }
    let total: u32 = m.values().sum();
    assert_eq!(total, (0..8).map(|i| i % 3).sum::<u32>());

    let owned: HashMap<String, u32> = m.into_iter().collect();
    assert_eq!(owned.len(), 8);
}

// Test: the concrete put/remove walk-through from the documentation.
#[test]
fn concrete_walkthrough() {
    let mut m = AdaptiveMap::new();
    assert_eq!(m.insert("a", 1), None);
    assert_eq!(m.insert("b", 2), None);
    assert_eq!(m.insert("a", 3), Some(1));
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&3));
    assert_eq!(m.remove("b"), Some(2));
    assert_eq!(m.len(), 1);
    assert_eq!(m.remove("z"), None);
    assert_eq!(m.len(), 1);
}

// Test: building from a source with repeated keys lands in the
// representation its distinct key count calls for.
#[test]
fn bulk_build_with_repeated_keys() {
    let source = vec![("x".to_string(), 1u32); 10];
    let m: AdaptiveMap<String, u32> = source.into_iter().collect();
    assert_eq!(m.len(), 1);
    assert!(!m.is_overflow());

    let mut m = m;
    for i in 0..5u32 {
        m.insert(format!("n{i}"), i);
    }
    assert_eq!(m.len(), 6);
    assert!(m.is_overflow());
    m.remove("n0");
    assert!(!m.is_overflow());
}
