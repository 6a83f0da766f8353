//! Per-target record storage.
//!
//! A [`MetadataStore`] holds one category of records (autowired members,
//! autowired parameters, scheduled methods, ...) for every [`Target`]. Each
//! target only ever sees its own records. Reads hand out owned copies so a
//! caller mutating its result cannot leak into another target's storage.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::target::Target;


/// Shared, mutex-guarded map from target to an ordered record list.
///
/// Clones share the same storage.
pub struct MetadataStore<T> {
	label: &'static str,
	slots: Arc<Mutex<FxHashMap<Target, Vec<T>>>>,
}

impl<T> Clone for MetadataStore<T> {
	fn clone(&self) -> Self {
		Self {
			label: self.label,
			slots: Arc::clone(&self.slots),
		}
	}
}

impl<T> std::fmt::Debug for MetadataStore<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MetadataStore")
			.field("label", &self.label)
			.field("targets", &self.slots.lock().len())
			.finish()
	}
}

impl<T: Clone> MetadataStore<T> {
	/// Creates an empty store. `label` names the record category in logs.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			slots: Arc::default(),
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Returns a copy of `target`'s own records, or a fresh empty list.
	pub fn get(&self, target: Target) -> Vec<T> {
		self.slots.lock().get(&target).cloned().unwrap_or_default()
	}

	/// Replaces `target`'s records wholesale.
	pub fn define(&self, target: Target, records: Vec<T>) {
		self.slots.lock().insert(target, records);
	}

	/// Appends one record to `target`'s own list.
	///
	/// The read-append-write runs under a single lock acquisition.
	pub fn add(&self, target: Target, record: T) {
		let mut slots = self.slots.lock();
		slots.entry(target).or_default().push(record);
		tracing::trace!(store = self.label, %target, count = slots[&target].len(), "metadata.add");
	}

	/// Drops `target`'s slot and returns its records.
	pub fn remove(&self, target: Target) -> Vec<T> {
		let removed = self.slots.lock().remove(&target).unwrap_or_default();
		tracing::trace!(store = self.label, %target, count = removed.len(), "metadata.remove");
		removed
	}

	/// Number of records stored for `target`.
	pub fn count(&self, target: Target) -> usize {
		self.slots.lock().get(&target).map_or(0, Vec::len)
	}

	/// Targets that currently hold at least one definition.
	pub fn targets(&self) -> Vec<Target> {
		self.slots.lock().keys().copied().collect()
	}
}
