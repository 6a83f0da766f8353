use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use trellis_wiring::{ArgPack, MetadataStore, Side, Target, TypeKey};

use crate::error::AutomationError;
use crate::options::AutomationOptions;
use crate::schedule::{Automated, AutomatedType, Plan};

/// A method run once, with fixed arguments.
#[derive(Debug, Clone)]
pub struct RunRecord {
	pub method: &'static str,
	pub args: ArgPack,
}

/// A method called repeatedly, every `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRecord {
	pub method: &'static str,
	pub interval: Duration,
}

/// Side table of run-once and polled methods, per [`Target`].
#[derive(Debug, Clone)]
pub struct AutomationRegistry {
	runnables: MetadataStore<RunRecord>,
	polled: MetadataStore<PollRecord>,
	automated: Arc<Mutex<FxHashSet<TypeKey>>>,
	options: AutomationOptions,
}

impl Default for AutomationRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl AutomationRegistry {
	pub fn new() -> Self {
		Self::with_options(AutomationOptions::default())
	}

	pub fn with_options(options: AutomationOptions) -> Self {
		Self {
			runnables: MetadataStore::new("runnable"),
			polled: MetadataStore::new("polled"),
			automated: Arc::default(),
			options,
		}
	}

	pub fn options(&self) -> AutomationOptions {
		self.options
	}

	pub fn add_runnable(&self, target: Target, record: RunRecord) {
		tracing::debug!(%target, method = record.method, "automation.run");
		self.runnables.add(target, record);
	}

	pub fn add_polled(&self, target: Target, record: PollRecord) {
		tracing::debug!(%target, method = record.method, interval_ms = record.interval.as_millis() as u64, "automation.poll");
		self.polled.add(target, record);
	}

	/// Run-once records of `target`, in registration order.
	pub fn runnables(&self, target: Target) -> Vec<RunRecord> {
		self.runnables.get(target)
	}

	/// Polled records of `target`, in registration order.
	pub fn polled(&self, target: Target) -> Vec<PollRecord> {
		self.polled.get(target)
	}

	/// Records `T`'s plan, runs its static run-once methods, and starts its
	/// static pollers.
	pub fn automate<T: Automated>(&self) -> Result<AutomatedType<T>, AutomationError> {
		let owner = TypeKey::of::<T>();
		if !self.automated.lock().insert(owner) {
			return Err(AutomationError::AlreadyAutomated { owner: owner.name() });
		}

		let mut rollback = Rollback {
			registry: self,
			owner,
			armed: true,
		};
		let mut plan = Plan::new(owner, self.options);
		T::automate(&mut plan);
		let automated = plan.commit(self.clone());
		match &automated {
			Ok(_) => rollback.armed = false,
			Err(error) => tracing::debug!(%owner, %error, "automation.rollback"),
		}
		automated
	}

	/// Targets holding at least one run-once or polled record.
	pub fn targets(&self) -> Vec<Target> {
		let mut targets = self.runnables.targets();
		for target in self.polled.targets() {
			if !targets.contains(&target) {
				targets.push(target);
			}
		}
		targets
	}

	pub fn is_automated(&self, owner: TypeKey) -> bool {
		self.automated.lock().contains(&owner)
	}

	fn forget(&self, owner: TypeKey) {
		for side in [Side::Static, Side::Instance] {
			let target = Target::new(owner, side);
			self.runnables.remove(target);
			self.polled.remove(target);
		}
		self.automated.lock().remove(&owner);
	}
}

/// Forgets a half-automated type on drop, including when a plan or a static
/// run body panics.
struct Rollback<'a> {
	registry: &'a AutomationRegistry,
	owner: TypeKey,
	armed: bool,
}

impl Drop for Rollback<'_> {
	fn drop(&mut self) {
		if self.armed {
			self.registry.forget(self.owner);
		}
	}
}
