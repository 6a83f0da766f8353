use std::borrow::Borrow;

#[cfg(test)]
mod tests;

/// An associative container that remembers key insertion order.
///
/// Keys and values live in two parallel vectors of equal length. Overwriting
/// an existing key keeps its position; deleting shifts later entries down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<K, V> {
	keys: Vec<K>,
	values: Vec<V>,
}

impl<K, V> Default for OrderedMap<K, V> {
	fn default() -> Self {
		Self {
			keys: Vec::new(),
			values: Vec::new(),
		}
	}
}

impl<K: PartialEq, V> OrderedMap<K, V> {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a map from ordered `(key, value)` pairs.
	///
	/// A repeated key overwrites the earlier value in place, exactly as
	/// successive [`set`](Self::set) calls would.
	pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
		let mut map = Self::new();
		for (key, value) in entries {
			map.set(key, value);
		}
		map
	}

	/// Number of live key/value pairs.
	pub fn size(&self) -> usize {
		self.keys.len()
	}

	/// Alias of [`size`](Self::size).
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

	/// Inserts or overwrites the value for `key`.
	pub fn set(&mut self, key: K, value: V) {
		match self.index_of(&key) {
			Some(idx) => self.values[idx] = value,
			None => {
				self.keys.push(key);
				self.values.push(value);
			}
		}
	}

	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.index_of(key).map(|idx| &self.values[idx])
	}

	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.index_of(key).map(move |idx| &mut self.values[idx])
	}

	pub fn has<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		self.index_of(key).is_some()
	}

	/// Removes `key` and returns its value. Absent keys are a no-op.
	pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: PartialEq + ?Sized,
	{
		let idx = self.index_of(key)?;
		self.keys.remove(idx);
		Some(self.values.remove(idx))
	}

	pub fn clear(&mut self) {
		self.keys.clear();
		self.values.clear();
	}

	/// Visits every entry in insertion order as `(value, key, map)`.
	pub fn for_each(&self, mut visit: impl FnMut(&V, &K, &Self)) {
		for (key, value) in self.keys.iter().zip(&self.values) {
			visit(value, key, self);
		}
	}

	/// Borrowing iterator over `(key, value)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.keys.iter().zip(&self.values)
	}
}

impl<K: PartialEq + Clone, V: Clone> OrderedMap<K, V> {
	/// Snapshot of the keys in insertion order.
	pub fn keys(&self) -> Vec<K> {
		self.keys.clone()
	}

	/// Snapshot of the values in key insertion order.
	pub fn values(&self) -> Vec<V> {
		self.values.clone()
	}

	/// Snapshot of all `(key, value)` pairs in insertion order.
	pub fn entries(&self) -> Vec<(K, V)> {
		self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
	}
}

impl<K: PartialEq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_entries(iter)
	}
}

impl<K: PartialEq, V> Extend<(K, V)> for OrderedMap<K, V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.set(key, value);
		}
	}
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
	type Item = (K, V);
	type IntoIter = std::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

	fn into_iter(self) -> Self::IntoIter {
		self.keys.into_iter().zip(self.values)
	}
}
