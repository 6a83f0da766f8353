use proptest::prelude::*;

use super::OrderedMap;

#[test]
fn from_entries_preserves_order() {
	let map = OrderedMap::from_entries([(1, "hello"), (2, "goodbye")]);
	assert_eq!(map.size(), 2);
	assert_eq!(map.entries(), vec![(1, "hello"), (2, "goodbye")]);
}

#[test]
fn set_overwrites_in_place() {
	let mut map = OrderedMap::new();
	map.set("a", 1);
	map.set("b", 2);
	map.set("a", 3);

	assert_eq!(map.size(), 2);
	assert_eq!(map.get(&"a"), Some(&3));
	assert_eq!(map.keys(), vec!["a", "b"]);
	assert_eq!(map.values(), vec![3, 2]);
}

#[test]
fn get_missing_is_none() {
	let map: OrderedMap<u32, &str> = OrderedMap::new();
	assert_eq!(map.get(&7), None);
	assert!(!map.has(&7));
}

#[test]
fn delete_removes_pair() {
	let mut map = OrderedMap::from_entries([(1, 'a'), (2, 'b'), (3, 'c')]);
	assert_eq!(map.delete(&2), Some('b'));
	assert_eq!(map.entries(), vec![(1, 'a'), (3, 'c')]);
	assert!(!map.has(&2));
}

#[test]
fn delete_absent_is_noop() {
	let mut map = OrderedMap::from_entries([(1, 'a')]);
	assert_eq!(map.delete(&9), None);
	assert_eq!(map.entries(), vec![(1, 'a')]);
}

#[test]
fn clear_empties_both_sides() {
	let mut map = OrderedMap::from_entries([(1, 'a'), (2, 'b')]);
	map.clear();
	assert!(map.is_empty());
	assert!(map.keys().is_empty());
	assert!(map.values().is_empty());
}

#[test]
fn snapshots_do_not_alias() {
	let mut map = OrderedMap::from_entries([(1, String::from("x"))]);
	let mut keys = map.keys();
	keys.push(2);
	map.set(3, String::from("y"));
	assert_eq!(keys, vec![1, 2]);
	assert_eq!(map.keys(), vec![1, 3]);
}

#[test]
fn for_each_visits_in_order_with_self() {
	let map = OrderedMap::from_entries([(1, "one"), (2, "two")]);
	let mut seen = Vec::new();
	map.for_each(|value, key, this| {
		assert_eq!(this.size(), 2);
		seen.push((*key, *value));
	});
	assert_eq!(seen, vec![(1, "one"), (2, "two")]);
}

#[test]
fn get_mut_updates_value() {
	let mut map = OrderedMap::from_entries([("count", 0)]);
	if let Some(count) = map.get_mut(&"count") {
		*count += 5;
	}
	assert_eq!(map.get(&"count"), Some(&5));
}

proptest! {
	/// Distinct-key inserts: size matches and order follows first insertion.
	#[test]
	fn prop_distinct_keys_keep_order(keys in prop::collection::hash_set(any::<u16>(), 0..32)) {
		let keys: Vec<u16> = keys.into_iter().collect();
		let mut map = OrderedMap::new();
		for (i, key) in keys.iter().enumerate() {
			map.set(*key, i);
		}
		prop_assert_eq!(map.size(), keys.len());
		prop_assert_eq!(map.keys(), keys);
	}

	/// Overwriting leaves size and position unchanged.
	#[test]
	fn prop_overwrite_keeps_size(keys in prop::collection::vec(0u8..16, 1..40), replacement in any::<i32>()) {
		let mut map = OrderedMap::new();
		for key in &keys {
			map.set(*key, 0i32);
		}
		let before = map.keys();
		let target = keys[0];
		map.set(target, replacement);
		prop_assert_eq!(map.keys(), before);
		prop_assert_eq!(map.get(&target), Some(&replacement));
	}
}
