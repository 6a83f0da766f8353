use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable per-run identity of a Rust type.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
	id: TypeId,
	name: &'static str,
}

impl TypeKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	pub const fn id(&self) -> TypeId {
		self.id
	}

	/// Fully qualified type name.
	pub const fn name(&self) -> &'static str {
		self.name
	}

	/// Last path segment of the type name (`a::b::Service` -> `Service`).
	pub fn short_name(&self) -> &'static str {
		short_type_name(self.name)
	}
}

pub(crate) fn short_type_name(name: &'static str) -> &'static str {
	let base = name.split('<').next().unwrap_or(name);
	base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.short_name())
	}
}

/// Which half of a type a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	/// The type object itself: static members, static methods, the constructor.
	Static,
	/// The per-instance template: instance members and instance methods.
	Instance,
}

/// Storage identity for metadata: one side of one type.
///
/// The two sides of a type are separate targets, and no target sees the
/// records of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
	pub key: TypeKey,
	pub side: Side,
}

impl Target {
	pub const fn new(key: TypeKey, side: Side) -> Self {
		Self { key, side }
	}

	pub fn of_type<T: ?Sized + 'static>() -> Self {
		Self::new(TypeKey::of::<T>(), Side::Static)
	}

	pub fn instance<T: ?Sized + 'static>() -> Self {
		Self::new(TypeKey::of::<T>(), Side::Instance)
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.side {
			Side::Static => write!(f, "{}", self.key),
			Side::Instance => write!(f, "{}#instance", self.key),
		}
	}
}
