use trellis_wiring::BoxError;

/// Errors raised while automating a type or one of its instances.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
	#[error("{owner} is already automated in this registry")]
	AlreadyAutomated { owner: &'static str },

	/// A run-once method failed. `source` is the method's own error.
	#[error("{owner}::{method} failed")]
	Method {
		owner: &'static str,
		method: &'static str,
		#[source]
		source: BoxError,
	},

	/// A poller was requested outside of a tokio runtime.
	#[error("{owner}::{method} is polled but no tokio runtime is running")]
	NoRuntime { owner: &'static str, method: &'static str },

	/// A record names a method the plan never declared.
	#[error("{owner} has no automated method {method:?}")]
	UnknownMethod { owner: &'static str, method: &'static str },
}
