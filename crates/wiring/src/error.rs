/// Boxed error returned by user-supplied constructors and method bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while registering or activating wired types.
///
/// The first four variants are configuration errors: they are reported by
/// [`AutowireRegistry::wire`](crate::AutowireRegistry::wire) before any
/// record is committed or any instance exists.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
	/// No constructable type is registered under the requested name.
	#[error("{site}: no constructable type registered as {type_name:?}")]
	UnresolvedType { site: String, type_name: String },

	/// The constructor argument bundle does not fit the produced type.
	#[error("{site}: {args} cannot construct {produced}")]
	ArgumentMismatch {
		site: String,
		produced: &'static str,
		args: &'static str,
	},

	/// A method was declared under the reserved constructor name.
	#[error("{owner}: {name:?} is reserved for constructor parameters")]
	ReservedName { owner: &'static str, name: &'static str },

	/// A parameter index past [`Arguments::MAX_INDEX`](crate::Arguments::MAX_INDEX).
	#[error("{site}: parameter index {index} exceeds {max}")]
	ArgumentIndex { site: String, index: usize, max: usize },

	/// A produced type's constructor failed. `source` is passed through as-is.
	#[error("failed to construct {produced}")]
	Construction {
		produced: &'static str,
		#[source]
		source: BoxError,
	},

	/// An argument slot held a value of another type.
	#[error("argument {index} is not a {expected}")]
	ArgumentType { index: usize, expected: &'static str },

	/// A member slot received a value of another type.
	#[error("{owner}.{member} is not a {expected}")]
	MemberType {
		owner: &'static str,
		member: &'static str,
		expected: &'static str,
	},

	#[error("{owner} is already wired in this registry")]
	AlreadyWired { owner: &'static str },

	#[error("{owner} has no wired method {method:?}")]
	UnknownMethod { owner: &'static str, method: String },

	#[error("{owner} has no member slot {member:?}")]
	UnknownMember { owner: &'static str, member: &'static str },

	/// The owner's own constructor, method body, or member setter failed.
	#[error("{owner}::{method} failed")]
	Invocation {
		owner: &'static str,
		method: &'static str,
		#[source]
		source: BoxError,
	},
}
