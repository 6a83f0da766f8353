//! Metadata store and autowiring registry.
//!
//! Types opt into dependency injection by implementing [`Wired`]. Their
//! registration phase declares which members and parameters should receive
//! freshly built [`Autowirable`] values; the [`WiredType`] handle returned by
//! [`AutowireRegistry::wire`] fills them on every construction and call.
//!
//! ```
//! use trellis_wiring::{Arguments, AutowireRegistry, Autowirable, BoxError, Wired, Wiring};
//!
//! struct Greeting {
//! 	text: String,
//! }
//!
//! impl Autowirable for Greeting {
//! 	type Args = &'static str;
//!
//! 	fn autowire(text: Self::Args) -> Result<Self, BoxError> {
//! 		Ok(Self { text: text.to_owned() })
//! 	}
//! }
//!
//! #[derive(Default)]
//! struct Greeter {
//! 	greeting: Option<Greeting>,
//! }
//!
//! impl Wired for Greeter {
//! 	fn wire(wiring: &mut Wiring<Self>) {
//! 		wiring.member::<Greeting>("greeting", "hello", |this, value| this.greeting = Some(value));
//! 	}
//!
//! 	fn construct(_args: Arguments) -> Result<Self, BoxError> {
//! 		Ok(Self::default())
//! 	}
//! }
//!
//! let registry = AutowireRegistry::new();
//! let greeters = registry.wire::<Greeter>()?;
//! let greeter = greeters.create()?;
//! assert_eq!(greeter.greeting.map(|g| g.text).as_deref(), Some("hello"));
//! # Ok::<(), trellis_wiring::WireError>(())
//! ```

/// Positional argument lists.
pub mod arguments;
/// Error types.
pub mod error;
/// Registration builder and activation handle.
pub mod inject;
/// Per-target record storage.
pub mod metadata;
/// Type descriptors and the name catalog.
pub mod produced;
/// Autowiring records and registry.
pub mod registry;
/// One shared instance per type.
pub mod singleton;
/// Type and side identities.
pub mod target;

pub use arguments::Arguments;
pub use error::{BoxError, WireError};
pub use inject::{Statics, Wired, WiredType, Wiring, autowire_arguments};
pub use metadata::MetadataStore;
pub use produced::{ArgPack, Autowirable, ProducedType, TypeCatalog, Value};
pub use registry::{AutowireRegistry, CONSTRUCTOR, MemberRecord, ParameterRecord};
pub use singleton::{Singleton, SingletonToken, instance};
pub use target::{Side, Target, TypeKey};
