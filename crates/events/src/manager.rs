use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_collections::OrderedMultiMap;

use crate::args::EventArgs;

#[cfg(test)]
mod tests;

type Callback = dyn Fn(&EventArgs) + Send + Sync;

/// A bound event handler.
///
/// Clones compare equal to each other and to nothing else, so the value
/// returned by [`EventManager::on`] is what unbinds it.
#[derive(Clone)]
pub struct Handler(Arc<Callback>);

impl Handler {
	pub fn new(callback: impl Fn(&EventArgs) + Send + Sync + 'static) -> Self {
		Self(Arc::new(callback))
	}

	pub fn call(&self, args: &EventArgs) {
		(self.0)(args)
	}
}

impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Handler").field(&Arc::as_ptr(&self.0).cast::<()>()).finish()
	}
}

/// Event name to handler list, in binding order.
#[derive(Default)]
pub struct EventManager {
	events: Mutex<OrderedMultiMap<String, Handler>>,
}

impl EventManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `callback` to `event` and returns its handle.
	pub fn on(&self, event: impl Into<String>, callback: impl Fn(&EventArgs) + Send + Sync + 'static) -> Handler {
		let handler = Handler::new(callback);
		self.bind(event, handler.clone());
		handler
	}

	/// Binds an existing handle to `event`. A handle may be bound several
	/// times and then fires once per binding.
	pub fn bind(&self, event: impl Into<String>, handler: Handler) {
		let event = event.into();
		tracing::trace!(event = %event, "events.on");
		self.events.lock().put(event, handler);
	}

	/// Removes the first binding of `handler` to `event`. Returns whether one
	/// was found.
	pub fn off(&self, event: &str, handler: &Handler) -> bool {
		let removed = self.events.lock().remove_value(event, handler).is_some();
		tracing::trace!(event, removed, "events.off");
		removed
	}

	/// Removes every handler of `event`.
	pub fn off_event(&self, event: &str) {
		self.events.lock().remove(event);
		tracing::trace!(event, "events.off_event");
	}

	/// Removes every handler of every event.
	pub fn off_all(&self) {
		self.events.lock().clear();
		tracing::trace!("events.off_all");
	}

	pub fn has(&self, event: &str) -> bool {
		self.events.lock().get(event).is_some_and(|handlers| !handlers.is_empty())
	}

	/// Number of handlers bound to `event`.
	pub fn count(&self, event: &str) -> usize {
		self.events.lock().get(event).map_or(0, <[Handler]>::len)
	}

	/// Calls every handler of `event` in binding order. Unknown events are
	/// ignored.
	///
	/// Handlers run outside the lock, on the list as it was when the call
	/// started, so they may bind or unbind handlers themselves.
	pub fn trigger(&self, event: &str, args: &EventArgs) {
		let handlers = match self.events.lock().get(event) {
			Some(handlers) => handlers.to_vec(),
			None => return,
		};
		tracing::trace!(event, handlers = handlers.len(), args = args.len(), "events.trigger");
		for handler in &handlers {
			handler.call(args);
		}
	}
}

impl fmt::Debug for EventManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventManager").field("events", &self.events.lock().keys()).finish()
	}
}
