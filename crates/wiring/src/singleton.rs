//! One lazily created instance per type.

use std::any::Any;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::target::TypeKey;


static INSTANCES: LazyLock<Mutex<FxHashMap<TypeKey, Arc<dyn Any + Send + Sync>>>> = LazyLock::new(Mutex::default);

/// Proof that a construction was requested by [`instance`].
///
/// The field is private, so code outside this module cannot create a token
/// and therefore cannot call [`Singleton::create`] itself:
///
/// ```compile_fail
/// use trellis_wiring::SingletonToken;
///
/// let token = SingletonToken { _private: () };
/// ```
pub struct SingletonToken {
	_private: (),
}

/// A type with exactly one shared instance, obtained through [`instance`].
pub trait Singleton: Any + Send + Sync + Sized {
	fn create(token: SingletonToken) -> Self;
}

/// Returns the shared instance of `T`, creating it on first use.
///
/// `create` runs outside the table lock so it may itself resolve other
/// singletons. If two threads race on first use, the first stored instance
/// wins and the other is dropped.
pub fn instance<T: Singleton>() -> Arc<T> {
	let key = TypeKey::of::<T>();
	let existing = INSTANCES.lock().get(&key).cloned();
	if let Some(found) = existing.and_then(|any| any.downcast::<T>().ok()) {
		return found;
	}

	let created = Arc::new(T::create(SingletonToken { _private: () }));
	let stored = Arc::clone(
		INSTANCES
			.lock()
			.entry(key)
			.or_insert_with(|| Arc::clone(&created) as Arc<dyn Any + Send + Sync>),
	);
	tracing::debug!(singleton = %key, "singleton.create");
	stored.downcast::<T>().unwrap_or(created)
}
