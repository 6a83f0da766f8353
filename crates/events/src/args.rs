use std::any::Any;
use std::fmt;

/// Positional arguments passed to every handler of a triggered event.
#[derive(Default)]
pub struct EventArgs {
	values: Vec<Box<dyn Any + Send + Sync>>,
}

impl EventArgs {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `value` as the next positional argument.
	pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
		self.values.push(Box::new(value));
		self
	}

	pub fn push<V: Any + Send + Sync>(&mut self, value: V) {
		self.values.push(Box::new(value));
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Argument `index` as a `V`, or `None` if it is missing or of another type.
	pub fn get<V: Any>(&self, index: usize) -> Option<&V> {
		self.values.get(index)?.downcast_ref()
	}
}

impl fmt::Debug for EventArgs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventArgs").field("len", &self.values.len()).finish()
	}
}
