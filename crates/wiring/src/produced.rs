//! Type descriptors for autowired values.
//!
//! A [`ProducedType`] stands in for reflected type metadata: it names a type
//! and carries a monomorphized build function that turns an [`ArgPack`] of
//! constructor arguments into a fresh boxed value.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_collections::OrderedMap;

use crate::error::{BoxError, WireError};
use crate::target::short_type_name;

/// A type-erased, freshly produced value.
pub type Value = Box<dyn Any + Send + Sync>;

/// A type that can be built from a bundle of constructor arguments.
///
/// ```
/// use trellis_wiring::{Autowirable, BoxError};
///
/// struct Client {
/// 	base_url: String,
/// }
///
/// impl Autowirable for Client {
/// 	type Args = &'static str;
///
/// 	fn autowire(base_url: Self::Args) -> Result<Self, BoxError> {
/// 		Ok(Self { base_url: base_url.to_owned() })
/// 	}
/// }
/// ```
pub trait Autowirable: Any + Send + Sync + Sized {
	type Args: Any + Clone + Send + Sync;

	fn autowire(args: Self::Args) -> Result<Self, BoxError>;
}

/// Shared, type-erased constructor arguments.
#[derive(Clone)]
pub struct ArgPack {
	type_id: TypeId,
	type_name: &'static str,
	value: Arc<dyn Any + Send + Sync>,
}

impl ArgPack {
	pub fn new<A: Any + Send + Sync>(args: A) -> Self {
		Self {
			type_id: TypeId::of::<A>(),
			type_name: std::any::type_name::<A>(),
			value: Arc::new(args),
		}
	}

	/// Empty bundle, for types whose `Args` is `()`.
	pub fn empty() -> Self {
		Self::new(())
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn downcast_ref<A: Any>(&self) -> Option<&A> {
		self.value.downcast_ref::<A>()
	}
}

impl fmt::Debug for ArgPack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ArgPack({})", self.type_name)
	}
}

type BuildFn = fn(&ArgPack) -> Option<Result<Value, BoxError>>;

/// Descriptor of a constructable type.
#[derive(Clone, Copy)]
pub struct ProducedType {
	name: &'static str,
	type_id: TypeId,
	args_type: TypeId,
	build: BuildFn,
}

fn build_erased<A: Autowirable>(args: &ArgPack) -> Option<Result<Value, BoxError>> {
	let args = args.downcast_ref::<A::Args>()?.clone();
	Some(A::autowire(args).map(|value| Box::new(value) as Value))
}

impl ProducedType {
	pub fn of<A: Autowirable>() -> Self {
		Self {
			name: std::any::type_name::<A>(),
			type_id: TypeId::of::<A>(),
			args_type: TypeId::of::<A::Args>(),
			build: build_erased::<A>,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn short_name(&self) -> &'static str {
		short_type_name(self.name)
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Whether `args` is the argument bundle this type is built from.
	pub fn accepts(&self, args: &ArgPack) -> bool {
		self.args_type == args.type_id()
	}

	/// Checks `args` against this type, naming `site` in the error.
	pub(crate) fn check(&self, site: impl FnOnce() -> String, args: &ArgPack) -> Result<(), WireError> {
		if self.accepts(args) {
			Ok(())
		} else {
			Err(WireError::ArgumentMismatch {
				site: site(),
				produced: self.name,
				args: args.type_name(),
			})
		}
	}

	/// Builds a fresh value. Constructor failures are passed through as
	/// [`WireError::Construction`] with the producer's own error as source.
	pub fn produce(&self, args: &ArgPack) -> Result<Value, WireError> {
		match (self.build)(args) {
			Some(Ok(value)) => Ok(value),
			Some(Err(source)) => Err(WireError::Construction {
				produced: self.name,
				source,
			}),
			None => Err(WireError::ArgumentMismatch {
				site: self.short_name().to_owned(),
				produced: self.name,
				args: args.type_name(),
			}),
		}
	}
}

impl PartialEq for ProducedType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ProducedType {}

impl fmt::Debug for ProducedType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ProducedType").field(&self.name).finish()
	}
}

/// Name to [`ProducedType`] table for wiring by type name.
///
/// Lookups that miss surface as configuration errors when a type is wired.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
	types: Arc<RwLock<OrderedMap<&'static str, ProducedType>>>,
}

impl TypeCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `A` under its short type name.
	pub fn register<A: Autowirable>(&self) -> &Self {
		let produced = ProducedType::of::<A>();
		self.register_as(produced.short_name(), produced)
	}

	/// Registers `produced` under an explicit name, replacing any previous entry.
	pub fn register_as(&self, name: &'static str, produced: ProducedType) -> &Self {
		tracing::debug!(name, produced = produced.name(), "catalog.register");
		self.types.write().set(name, produced);
		self
	}

	pub fn resolve(&self, name: &str) -> Option<ProducedType> {
		self.types.read().get(name).copied()
	}

	/// Registered names in registration order.
	pub fn names(&self) -> Vec<&'static str> {
		self.types.read().keys()
	}
}
