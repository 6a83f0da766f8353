use std::borrow::Borrow;


/// A map from each key to an append-ordered list of values.
///
/// Keys keep their first-insertion order. Values under one key keep the
/// order they were [`put`](Self::put) in and may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMultiMap<K, V> {
	keys: Vec<K>,
	lists: Vec<Vec<V>>,
}

impl<K, V> Default for OrderedMultiMap<K, V> {
	fn default() -> Self {
		Self {
			keys: Vec::new(),
			lists: Vec::new(),
		}
	}
}

impl<K: PartialEq, V> OrderedMultiMap<K, V> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a multimap from ordered `(key, values)` pairs.
	///
	/// Values of a repeated key are appended to the existing list.
	pub fn from_entries(entries: impl IntoIterator<Item = (K, Vec<V>)>) -> Self {
		let mut map = Self::new();
		for (key, values) in entries {
			match map.index_of(&key) {
				Some(idx) => map.lists[idx].extend(values),
				None => {
					map.keys.push(key);
					map.lists.push(values);
				}
			}
		}
		map
	}

	/// Number of keys (not values).
	pub fn size(&self) -> usize {
		self.keys.len()
	}

	pub fn len(&self) -> usize {
		self.size()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	fn index_of<Q>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.keys.iter().position(|k| k.borrow() == key)
	}

	/// Appends `value` to the list for `key`, creating the list if needed.
	pub fn put(&mut self, key: K, value: V) {
		match self.index_of(&key) {
			Some(idx) => self.lists[idx].push(value),
			None => {
				self.keys.push(key);
				self.lists.push(vec![value]);
			}
		}
	}

	pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.index_of(key).map(|idx| self.lists[idx].as_slice())
	}

	pub fn has<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.index_of(key).is_some()
	}

	/// Removes `key` together with its whole value list.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		let idx = self.index_of(key)?;
		self.keys.remove(idx);
		Some(self.lists.remove(idx))
	}

	pub fn clear(&mut self) {
		self.keys.clear();
		self.lists.clear();
	}

	/// Visits every key in insertion order as `(values, key, map)`.
	pub fn for_each(&self, mut visit: impl FnMut(&[V], &K, &Self)) {
		for (key, values) in self.keys.iter().zip(&self.lists) {
			visit(values, key, self);
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
		self.keys.iter().zip(self.lists.iter().map(Vec::as_slice))
	}
}

impl<K: PartialEq, V: PartialEq> OrderedMultiMap<K, V> {
	/// Removes the first value equal to `value` from the list for `key`.
	///
	/// The key is kept even when its list becomes empty. Missing keys and
	/// missing values are a no-op.
	pub fn remove_value<Q>(&mut self, key: &Q, value: &V) -> Option<V>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		let idx = self.index_of(key)?;
		let list = &mut self.lists[idx];
		let pos = list.iter().position(|v| v == value)?;
		Some(list.remove(pos))
	}
}

impl<K: PartialEq + Clone, V: Clone> OrderedMultiMap<K, V> {
	/// Snapshot of all `(key, values)` pairs in key insertion order.
	pub fn entries(&self) -> Vec<(K, Vec<V>)> {
		self.keys.iter().cloned().zip(self.lists.iter().cloned()).collect()
	}

	pub fn keys(&self) -> Vec<K> {
		self.keys.clone()
	}
}
