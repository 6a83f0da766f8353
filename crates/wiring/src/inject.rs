//! Registration-phase builder and activation-phase handle for wired types.
//!
//! # Mental Model
//!
//! 1. **Registration:** [`AutowireRegistry::wire`] hands a [`Wiring`] to
//!    [`Wired::wire`]. The type declares its injected members, its injected
//!    constructor and method parameters, and the method bodies that receive
//!    them. Nothing reaches the registry until the whole declaration checks
//!    out; static members are produced at this point, once.
//! 2. **Activation:** the resulting [`WiredType`] reads the registry on every
//!    [`construct`](WiredType::construct) and [`invoke`](WiredType::invoke),
//!    overlays freshly produced values onto the caller's [`Arguments`] and
//!    fills instance members after the type's own constructor returns.
//!
//! Every activation produces new values; nothing is cached between calls.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_collections::OrderedMap;

use crate::arguments::Arguments;
use crate::error::{BoxError, WireError};
use crate::produced::{ArgPack, Autowirable, ProducedType, Value};
use crate::registry::{AutowireRegistry, CONSTRUCTOR, ParameterRecord};
use crate::target::{Side, Target, TypeKey};


/// A type whose members and parameters are filled by the registry.
pub trait Wired: Any + Send + Sized {
	/// Declares injection sites and wired methods. Runs once per registry.
	fn wire(wiring: &mut Wiring<Self>);

	/// Builds an instance from the (already injected) constructor arguments.
	fn construct(args: Arguments) -> Result<Self, BoxError>;
}

type Assign<T> = Box<dyn Fn(&mut T, Value) -> Result<(), BoxError> + Send + Sync>;
type MethodBody<T> = Box<dyn Fn(&mut T, Arguments) -> Result<(), BoxError> + Send + Sync>;
type StaticBody = Box<dyn Fn(&Statics, Arguments) -> Result<(), BoxError> + Send + Sync>;

/// Overlays a fresh value for every record onto `args` at the record's index.
pub fn autowire_arguments(mut args: Arguments, params: &[ParameterRecord]) -> Result<Arguments, WireError> {
	for param in params {
		args.set(param.index, param.produce()?)?;
	}
	Ok(args)
}

/// Slots on the type object itself.
#[derive(Debug, Default)]
pub struct Statics {
	slots: RwLock<OrderedMap<&'static str, Arc<dyn Any + Send + Sync>>>,
}

impl Statics {
	pub fn get<V: Any + Send + Sync>(&self, name: &str) -> Option<Arc<V>> {
		let slot = self.slots.read().get(name).cloned()?;
		slot.downcast::<V>().ok()
	}

	pub fn set<V: Any + Send + Sync>(&self, name: &'static str, value: V) {
		self.slots.write().set(name, Arc::new(value));
	}

	pub(crate) fn set_value(&self, name: &'static str, value: Value) {
		self.slots.write().set(name, Arc::from(value));
	}

	pub fn has(&self, name: &str) -> bool {
		self.slots.read().has(name)
	}

	pub fn len(&self) -> usize {
		self.slots.read().size()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn names(&self) -> Vec<&'static str> {
		self.slots.read().iter().map(|(name, _)| *name).collect()
	}
}

/// Registration-phase builder passed to [`Wired::wire`].
///
/// Declarations never fail on the spot. The first configuration error is
/// kept and reported by [`AutowireRegistry::wire`], before any record is
/// committed.
pub struct Wiring<T> {
	registry: AutowireRegistry,
	owner: TypeKey,
	members: Vec<(&'static str, ProducedType, ArgPack, Side)>,
	parameters: Vec<(Side, &'static str, usize, ProducedType, ArgPack)>,
	slots: OrderedMap<&'static str, Assign<T>>,
	methods: OrderedMap<&'static str, MethodBody<T>>,
	static_methods: OrderedMap<&'static str, StaticBody>,
	error: Option<WireError>,
}

impl<T: Wired> Wiring<T> {
	pub(crate) fn new(registry: AutowireRegistry, owner: TypeKey) -> Self {
		Self {
			registry,
			owner,
			members: Vec::new(),
			parameters: Vec::new(),
			slots: OrderedMap::new(),
			methods: OrderedMap::new(),
			static_methods: OrderedMap::new(),
			error: None,
		}
	}

	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	fn fail(&mut self, error: WireError) -> &mut Self {
		if self.error.is_none() {
			self.error = Some(error);
		}
		self
	}

	fn resolve(&mut self, site: String, type_name: &str) -> Option<ProducedType> {
		match self.registry.resolve(|| site, type_name) {
			Ok(produced) => Some(produced),
			Err(error) => {
				self.fail(error);
				None
			}
		}
	}

	fn push_member(&mut self, name: &'static str, produced: ProducedType, args: ArgPack, side: Side) -> &mut Self {
		let owner = self.owner;
		if let Err(error) = produced.check(|| format!("{owner}.{name}"), &args) {
			return self.fail(error);
		}
		self.members.push((name, produced, args, side));
		self
	}

	fn push_parameter(
		&mut self,
		side: Side,
		method: &'static str,
		index: usize,
		produced: ProducedType,
		args: ArgPack,
	) -> &mut Self {
		let owner = self.owner;
		if index > Arguments::MAX_INDEX {
			return self.fail(WireError::ArgumentIndex {
				site: format!("{owner}::{method}"),
				index,
				max: Arguments::MAX_INDEX,
			});
		}
		if let Err(error) = produced.check(|| format!("{owner}::{method}#{index}"), &args) {
			return self.fail(error);
		}
		self.parameters.push((side, method, index, produced, args));
		self
	}

	/// Instance member filled with a fresh `A` after every construction.
	pub fn member<A: Autowirable>(
		&mut self,
		name: &'static str,
		args: A::Args,
		assign: impl Fn(&mut T, A) + Send + Sync + 'static,
	) -> &mut Self {
		let owner = self.owner.name();
		let setter: Assign<T> = Box::new(move |this: &mut T, value: Value| {
			let value = value.downcast::<A>().map_err(|_| WireError::MemberType {
				owner,
				member: name,
				expected: std::any::type_name::<A>(),
			})?;
			assign(this, *value);
			Ok(())
		});
		self.slots.set(name, setter);
		self.push_member(name, ProducedType::of::<A>(), ArgPack::new(args), Side::Instance)
	}

	/// Instance member whose type is looked up in the registry's catalog.
	///
	/// An unknown `type_name` is a configuration error.
	pub fn member_named(
		&mut self,
		name: &'static str,
		type_name: &str,
		args: ArgPack,
		assign: impl Fn(&mut T, Value) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		let site = format!("{}.{name}", self.owner);
		let Some(produced) = self.resolve(site, type_name) else {
			return self;
		};
		self.slots.set(name, Box::new(assign));
		self.push_member(name, produced, args, Side::Instance)
	}

	/// Static member produced once, while the type is wired.
	pub fn static_member<A: Autowirable>(&mut self, name: &'static str, args: A::Args) -> &mut Self {
		self.push_member(name, ProducedType::of::<A>(), ArgPack::new(args), Side::Static)
	}

	pub fn static_member_named(&mut self, name: &'static str, type_name: &str, args: ArgPack) -> &mut Self {
		let site = format!("{}.{name}", self.owner);
		let Some(produced) = self.resolve(site, type_name) else {
			return self;
		};
		self.push_member(name, produced, args, Side::Static)
	}

	/// Constructor parameter at `index` filled with a fresh `A`.
	pub fn constructor_param<A: Autowirable>(&mut self, index: usize, args: A::Args) -> &mut Self {
		self.push_parameter(Side::Static, CONSTRUCTOR, index, ProducedType::of::<A>(), ArgPack::new(args))
	}

	pub fn constructor_param_named(&mut self, index: usize, type_name: &str, args: ArgPack) -> &mut Self {
		let site = format!("{}::{CONSTRUCTOR}#{index}", self.owner);
		let Some(produced) = self.resolve(site, type_name) else {
			return self;
		};
		self.push_parameter(Side::Static, CONSTRUCTOR, index, produced, args)
	}

	/// Declares an instance method reachable through [`WiredType::invoke`].
	pub fn method(
		&mut self,
		name: &'static str,
		body: impl Fn(&mut T, Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		if name == CONSTRUCTOR {
			let owner = self.owner.name();
			return self.fail(WireError::ReservedName { owner, name: CONSTRUCTOR });
		}
		self.methods.set(name, Box::new(body));
		self
	}

	/// Parameter at `index` of instance method `method` filled on every call.
	pub fn method_param<A: Autowirable>(&mut self, method: &'static str, index: usize, args: A::Args) -> &mut Self {
		self.push_parameter(Side::Instance, method, index, ProducedType::of::<A>(), ArgPack::new(args))
	}

	/// Declares a static method reachable through [`WiredType::invoke_static`].
	pub fn static_method(
		&mut self,
		name: &'static str,
		body: impl Fn(&Statics, Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		if name == CONSTRUCTOR {
			let owner = self.owner.name();
			return self.fail(WireError::ReservedName { owner, name: CONSTRUCTOR });
		}
		self.static_methods.set(name, Box::new(body));
		self
	}

	pub fn static_method_param<A: Autowirable>(&mut self, method: &'static str, index: usize, args: A::Args) -> &mut Self {
		self.push_parameter(Side::Static, method, index, ProducedType::of::<A>(), ArgPack::new(args))
	}

	fn declares(&self, side: Side, method: &str) -> bool {
		match side {
			Side::Static => method == CONSTRUCTOR || self.static_methods.has(method),
			Side::Instance => self.methods.has(method),
		}
	}

	/// Validates, produces static members, commits records, wraps methods.
	pub(crate) fn commit(mut self) -> Result<WiredType<T>, WireError> {
		if let Some(error) = self.error.take() {
			return Err(error);
		}
		let owner = self.owner;
		for (side, method, ..) in &self.parameters {
			if !self.declares(*side, method) {
				return Err(WireError::UnknownMethod {
					owner: owner.name(),
					method: (*method).to_owned(),
				});
			}
		}

		let statics = Statics::default();
		for (name, produced, args, side) in &self.members {
			if *side == Side::Static {
				statics.set_value(*name, produced.produce(args)?);
			}
		}

		let registry = self.registry;
		for (name, produced, args, side) in self.members {
			registry.register_member(Target::new(owner, side), name, produced, args)?;
		}
		for (side, method, index, produced, args) in self.parameters {
			registry.register_parameter(Target::new(owner, side), method, index, produced, args)?;
		}

		let instance = Target::new(owner, Side::Instance);
		let methods = self
			.methods
			.into_iter()
			.map(|(name, body)| {
				let params = registry.parameters_for(instance, name);
				(name, WiredMethod { name, body, params })
			})
			.collect();
		let static_target = Target::new(owner, Side::Static);
		let static_methods = self
			.static_methods
			.into_iter()
			.map(|(name, body)| {
				let params = registry.parameters_for(static_target, name);
				(name, WiredMethod { name, body, params })
			})
			.collect();

		Ok(WiredType {
			owner,
			registry,
			statics,
			slots: self.slots,
			methods,
			static_methods,
		})
	}
}

/// A method body paired with the parameter records it is wrapped with.
struct WiredMethod<B> {
	name: &'static str,
	body: B,
	params: Vec<ParameterRecord>,
}

/// Activation handle for a wired type.
pub struct WiredType<T> {
	owner: TypeKey,
	registry: AutowireRegistry,
	statics: Statics,
	slots: OrderedMap<&'static str, Assign<T>>,
	methods: OrderedMap<&'static str, WiredMethod<MethodBody<T>>>,
	static_methods: OrderedMap<&'static str, WiredMethod<StaticBody>>,
}

impl<T: Wired> WiredType<T> {
	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	pub fn registry(&self) -> &AutowireRegistry {
		&self.registry
	}

	pub fn statics(&self) -> &Statics {
		&self.statics
	}

	/// Reads a static member.
	pub fn static_member<V: Any + Send + Sync>(&self, name: &str) -> Option<Arc<V>> {
		self.statics.get(name)
	}

	/// Builds an instance: injects constructor parameters, runs
	/// [`Wired::construct`], then fills every instance member.
	pub fn construct(&self, args: Arguments) -> Result<T, WireError> {
		let params = self.registry.constructor_parameters(self.owner);
		let args = autowire_arguments(args, &params)?;
		let mut instance = T::construct(args).map_err(|source| WireError::Invocation {
			owner: self.owner.name(),
			method: CONSTRUCTOR,
			source,
		})?;

		let members = self.registry.members_for(Target::new(self.owner, Side::Instance));
		for member in &members {
			let assign = self.slots.get(member.member).ok_or(WireError::UnknownMember {
				owner: self.owner.name(),
				member: member.member,
			})?;
			let value = member.produce()?;
			assign(&mut instance, value).map_err(|source| WireError::Invocation {
				owner: self.owner.name(),
				method: member.member,
				source,
			})?;
		}

		tracing::trace!(owner = %self.owner, params = params.len(), members = members.len(), "autowire.construct");
		Ok(instance)
	}

	/// [`construct`](Self::construct) with no caller arguments.
	pub fn create(&self) -> Result<T, WireError> {
		self.construct(Arguments::new())
	}

	/// Calls an instance method with its parameters injected.
	pub fn invoke(&self, instance: &mut T, method: &str, args: Arguments) -> Result<(), WireError> {
		let wired = self.methods.get(method).ok_or_else(|| WireError::UnknownMethod {
			owner: self.owner.name(),
			method: method.to_owned(),
		})?;
		let args = autowire_arguments(args, &wired.params)?;
		tracing::trace!(owner = %self.owner, method = wired.name, injected = wired.params.len(), "autowire.invoke");
		(wired.body)(instance, args).map_err(|source| WireError::Invocation {
			owner: self.owner.name(),
			method: wired.name,
			source,
		})
	}

	/// Calls a static method with its parameters injected.
	pub fn invoke_static(&self, method: &str, args: Arguments) -> Result<(), WireError> {
		let wired = self.static_methods.get(method).ok_or_else(|| WireError::UnknownMethod {
			owner: self.owner.name(),
			method: method.to_owned(),
		})?;
		let args = autowire_arguments(args, &wired.params)?;
		tracing::trace!(owner = %self.owner, method = wired.name, injected = wired.params.len(), "autowire.invoke_static");
		(wired.body)(&self.statics, args).map_err(|source| WireError::Invocation {
			owner: self.owner.name(),
			method: wired.name,
			source,
		})
	}

	/// Names of the declared instance methods.
	pub fn methods(&self) -> Vec<&'static str> {
		self.methods.iter().map(|(name, _)| *name).collect()
	}
}
