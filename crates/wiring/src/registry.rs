//! Autowiring records and the registry that stores them.
//!
//! Records are written once, while a type is wired, and read on every
//! construction or method invocation of that type. Members and parameters
//! live in two separate [`MetadataStore`]s keyed by [`Target`].

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::arguments::Arguments;
use crate::error::WireError;
use crate::inject::{Wired, WiredType, Wiring};
use crate::metadata::MetadataStore;
use crate::produced::{ArgPack, ProducedType, TypeCatalog, Value};
use crate::target::{Side, Target, TypeKey};

#[cfg(test)]
mod tests;

/// Method name recorded for constructor parameters.
pub const CONSTRUCTOR: &str = "__constructor__";

/// A member slot filled with a fresh value on activation.
#[derive(Debug, Clone)]
pub struct MemberRecord {
	pub owner: TypeKey,
	pub member: &'static str,
	pub produced: ProducedType,
	pub constructor_args: ArgPack,
	pub side: Side,
}

impl MemberRecord {
	pub fn target(&self) -> Target {
		Target::new(self.owner, self.side)
	}

	pub fn produce(&self) -> Result<Value, WireError> {
		self.produced.produce(&self.constructor_args)
	}
}

/// A positional method or constructor parameter filled on every call.
#[derive(Debug, Clone)]
pub struct ParameterRecord {
	pub owner: TypeKey,
	pub side: Side,
	/// Method name, or [`CONSTRUCTOR`].
	pub method: &'static str,
	pub index: usize,
	pub produced: ProducedType,
	pub constructor_args: ArgPack,
}

impl ParameterRecord {
	pub fn target(&self) -> Target {
		Target::new(self.owner, self.side)
	}

	pub fn produce(&self) -> Result<Value, WireError> {
		self.produced.produce(&self.constructor_args)
	}
}

/// Side table of autowiring records.
///
/// Clones share all storage. Constructor and static-method parameters are
/// stored on the [`Side::Static`] target of their owner, instance-method
/// parameters on the [`Side::Instance`] target.
#[derive(Debug, Clone)]
pub struct AutowireRegistry {
	members: MetadataStore<MemberRecord>,
	parameters: MetadataStore<ParameterRecord>,
	catalog: TypeCatalog,
	wired: Arc<Mutex<FxHashSet<TypeKey>>>,
}

impl Default for AutowireRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl AutowireRegistry {
	pub fn new() -> Self {
		Self {
			members: MetadataStore::new("autowirable-members"),
			parameters: MetadataStore::new("autowirable-parameters"),
			catalog: TypeCatalog::new(),
			wired: Arc::default(),
		}
	}

	/// The process-wide registry.
	pub fn global() -> &'static AutowireRegistry {
		static GLOBAL: OnceLock<AutowireRegistry> = OnceLock::new();
		GLOBAL.get_or_init(AutowireRegistry::new)
	}

	/// Types available to name-based wiring.
	pub fn catalog(&self) -> &TypeCatalog {
		&self.catalog
	}

	/// Resolves `type_name` through the catalog.
	pub fn resolve(&self, site: impl FnOnce() -> String, type_name: &str) -> Result<ProducedType, WireError> {
		self.catalog.resolve(type_name).ok_or_else(|| WireError::UnresolvedType {
			site: site(),
			type_name: type_name.to_owned(),
		})
	}

	/// Appends a member record on `target`.
	pub fn register_member(
		&self,
		target: Target,
		member: &'static str,
		produced: ProducedType,
		constructor_args: ArgPack,
	) -> Result<(), WireError> {
		produced.check(|| format!("{target}.{member}"), &constructor_args)?;
		tracing::debug!(%target, member, produced = produced.short_name(), "autowire.member");
		self.members.add(
			target,
			MemberRecord {
				owner: target.key,
				member,
				produced,
				constructor_args,
				side: target.side,
			},
		);
		Ok(())
	}

	/// Appends a parameter record for `method` on `target`.
	///
	/// [`CONSTRUCTOR`] is only valid on the static side.
	pub fn register_parameter(
		&self,
		target: Target,
		method: &'static str,
		index: usize,
		produced: ProducedType,
		constructor_args: ArgPack,
	) -> Result<(), WireError> {
		if method == CONSTRUCTOR && target.side != Side::Static {
			return Err(WireError::ReservedName {
				owner: target.key.name(),
				name: CONSTRUCTOR,
			});
		}
		if index > Arguments::MAX_INDEX {
			return Err(WireError::ArgumentIndex {
				site: format!("{target}::{method}"),
				index,
				max: Arguments::MAX_INDEX,
			});
		}
		produced.check(|| format!("{target}::{method}#{index}"), &constructor_args)?;
		tracing::debug!(%target, method, index, produced = produced.short_name(), "autowire.parameter");
		self.parameters.add(
			target,
			ParameterRecord {
				owner: target.key,
				side: target.side,
				method,
				index,
				produced,
				constructor_args,
			},
		);
		Ok(())
	}

	/// Appends a constructor parameter record for `owner`.
	pub fn register_constructor_parameter(
		&self,
		owner: TypeKey,
		index: usize,
		produced: ProducedType,
		constructor_args: ArgPack,
	) -> Result<(), WireError> {
		self.register_parameter(Target::new(owner, Side::Static), CONSTRUCTOR, index, produced, constructor_args)
	}

	/// Parameter records of `method` on `target`, in registration order.
	pub fn parameters_for(&self, target: Target, method: &str) -> Vec<ParameterRecord> {
		let mut records = self.parameters.get(target);
		records.retain(|record| record.method == method);
		records
	}

	pub fn constructor_parameters(&self, owner: TypeKey) -> Vec<ParameterRecord> {
		self.parameters_for(Target::new(owner, Side::Static), CONSTRUCTOR)
	}

	/// Member records of `target`, in registration order.
	pub fn members_for(&self, target: Target) -> Vec<MemberRecord> {
		self.members.get(target)
	}

	pub fn is_wired(&self, owner: TypeKey) -> bool {
		self.wired.lock().contains(&owner)
	}

	/// Runs `T`'s registration phase and returns its activation handle.
	///
	/// Records are committed only if the whole registration succeeds, and a
	/// type can be wired at most once per registry: wiring it again would
	/// inject twice on every call.
	pub fn wire<T: Wired>(&self) -> Result<WiredType<T>, WireError> {
		let owner = TypeKey::of::<T>();
		let mut claim = WiringClaim::acquire(&self.wired, owner)?;

		let mut wiring = Wiring::new(self.clone(), owner);
		T::wire(&mut wiring);
		let result = wiring.commit();
		match &result {
			Ok(wired) => {
				claim.keep();
				tracing::debug!(
					%owner,
					members = self.members.count(Target::new(owner, Side::Instance)),
					statics = wired.statics().len(),
					"autowire.wired"
				)
			}
			Err(error) => tracing::debug!(%owner, %error, "autowire.rejected"),
		}
		result
	}
}

/// Marks `owner` as wired for the duration of its registration phase.
///
/// Released on drop unless [`keep`](Self::keep) was called, so a failed or
/// panicking `wire` hook leaves the type free to be wired again.
struct WiringClaim<'a> {
	wired: &'a Mutex<FxHashSet<TypeKey>>,
	owner: TypeKey,
	kept: bool,
}

impl<'a> WiringClaim<'a> {
	fn acquire(wired: &'a Mutex<FxHashSet<TypeKey>>, owner: TypeKey) -> Result<Self, WireError> {
		if !wired.lock().insert(owner) {
			return Err(WireError::AlreadyWired { owner: owner.name() });
		}
		Ok(Self {
			wired,
			owner,
			kept: false,
		})
	}

	fn keep(&mut self) {
		self.kept = true;
	}
}

impl Drop for WiringClaim<'_> {
	fn drop(&mut self) {
		if !self.kept {
			self.wired.lock().remove(&self.owner);
		}
	}
}
