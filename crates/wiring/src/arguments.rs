use std::any::Any;
use std::fmt;

use crate::error::WireError;
use crate::produced::Value;

/// Positional argument list passed to constructors and wired methods.
///
/// Slots may be empty, which plays the role of an omitted optional
/// argument. Injection overlays values at fixed indices and leaves the
/// remaining slots as the caller supplied them.
#[derive(Default)]
pub struct Arguments {
	slots: Vec<Option<Value>>,
}

impl Arguments {
	/// Highest position a value can be stored at.
	pub const MAX_INDEX: usize = 255;

	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a value.
	pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
		self.slots.push(Some(Box::new(value)));
		self
	}

	/// Appends an empty slot.
	pub fn with_empty(mut self) -> Self {
		self.slots.push(None);
		self
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Stores `value` at `index`, padding with empty slots as needed.
	pub fn set(&mut self, index: usize, value: Value) -> Result<(), WireError> {
		if index > Self::MAX_INDEX {
			return Err(WireError::ArgumentIndex {
				site: String::from("Arguments::set"),
				index,
				max: Self::MAX_INDEX,
			});
		}
		if self.slots.len() <= index {
			self.slots.resize_with(index + 1, || None);
		}
		self.slots[index] = Some(value);
		Ok(())
	}

	pub fn is_present(&self, index: usize) -> bool {
		matches!(self.slots.get(index), Some(Some(_)))
	}

	/// Borrows the value at `index`, if present.
	pub fn get<V: Any>(&self, index: usize) -> Result<Option<&V>, WireError> {
		match self.slots.get(index) {
			Some(Some(value)) => value.downcast_ref::<V>().map(Some).ok_or(WireError::ArgumentType {
				index,
				expected: std::any::type_name::<V>(),
			}),
			_ => Ok(None),
		}
	}

	/// Moves the value at `index` out, leaving the slot empty.
	///
	/// On a type mismatch the value stays in place.
	pub fn take<V: Any>(&mut self, index: usize) -> Result<Option<V>, WireError> {
		let Some(value) = self.slots.get_mut(index).and_then(Option::take) else {
			return Ok(None);
		};
		match value.downcast::<V>() {
			Ok(value) => Ok(Some(*value)),
			Err(value) => {
				self.slots[index] = Some(value);
				Err(WireError::ArgumentType {
					index,
					expected: std::any::type_name::<V>(),
				})
			}
		}
	}
}

impl fmt::Debug for Arguments {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.slots.iter().map(|slot| if slot.is_some() { "<value>" } else { "<empty>" }))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::Arguments;
	use crate::error::WireError;

	#[test]
	fn set_pads_with_empty_slots() {
		let mut args = Arguments::new().with(1u8);
		args.set(3, Box::new(2u8)).unwrap();
		assert_eq!(args.len(), 4);
		assert!(!args.is_present(2));
		assert_eq!(args.get::<u8>(3).unwrap(), Some(&2));
	}

	#[test]
	fn set_rejects_index_past_the_bound() {
		let mut args = Arguments::new();
		let err = args.set(usize::MAX, Box::new(())).unwrap_err();
		assert!(matches!(err, WireError::ArgumentIndex { index: usize::MAX, .. }));
		assert!(args.is_empty());
	}
}
