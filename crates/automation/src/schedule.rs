//! Automation plans and the handles that execute them.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use trellis_collections::OrderedMap;
use trellis_wiring::{ArgPack, BoxError, Side, Target, TypeKey};

use crate::error::AutomationError;
use crate::options::AutomationOptions;
use crate::registry::{AutomationRegistry, PollRecord, RunRecord};


/// A type with run-once and polled methods.
pub trait Automated: Any + Send + Sized {
	fn automate(plan: &mut Plan<Self>);
}

type RunBody<T> = Box<dyn Fn(&mut T, &ArgPack) -> Result<(), BoxError> + Send + Sync>;
type PollBody<T> = Arc<dyn Fn(&mut T) -> Result<(), BoxError> + Send + Sync>;
type StaticRunBody = Box<dyn Fn(&ArgPack) -> Result<(), BoxError> + Send + Sync>;
type StaticPollBody = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

fn unpack<A: Any + Clone>(args: &ArgPack) -> Result<A, BoxError> {
	args.downcast_ref::<A>()
		.cloned()
		.ok_or_else(|| format!("expected {} arguments, got {}", std::any::type_name::<A>(), args.type_name()).into())
}

/// Declarations collected from [`Automated::automate`].
pub struct Plan<T> {
	owner: TypeKey,
	options: AutomationOptions,
	runs: Vec<(Side, RunRecord)>,
	polls: Vec<(Side, PollRecord)>,
	run_bodies: OrderedMap<&'static str, RunBody<T>>,
	poll_bodies: OrderedMap<&'static str, PollBody<T>>,
	static_run_bodies: OrderedMap<&'static str, StaticRunBody>,
	static_poll_bodies: OrderedMap<&'static str, StaticPollBody>,
}

impl<T: Automated> Plan<T> {
	pub(crate) fn new(owner: TypeKey, options: AutomationOptions) -> Self {
		Self {
			owner,
			options,
			runs: Vec::new(),
			polls: Vec::new(),
			run_bodies: OrderedMap::new(),
			poll_bodies: OrderedMap::new(),
			static_run_bodies: OrderedMap::new(),
			static_poll_bodies: OrderedMap::new(),
		}
	}

	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	/// Calls `body(instance, args)` once after every instantiation.
	pub fn run<A: Any + Clone + Send + Sync>(
		&mut self,
		name: &'static str,
		args: A,
		body: impl Fn(&mut T, A) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		self.run_bodies
			.set(name, Box::new(move |this: &mut T, pack: &ArgPack| body(this, unpack::<A>(pack)?)));
		self.runs.push((Side::Instance, RunRecord {
			method: name,
			args: ArgPack::new(args),
		}));
		self
	}

	/// Calls `body(instance)` every `interval` for the life of each instance.
	pub fn poll(
		&mut self,
		name: &'static str,
		interval: Duration,
		body: impl Fn(&mut T) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		self.poll_bodies.set(name, Arc::new(body));
		self.polls.push((Side::Instance, PollRecord { method: name, interval }));
		self
	}

	/// [`poll`](Self::poll) at the registry's default interval.
	pub fn poll_default(
		&mut self,
		name: &'static str,
		body: impl Fn(&mut T) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		let interval = self.options.default_poll_interval;
		self.poll(name, interval, body)
	}

	/// Calls `body(args)` once, when the type is automated.
	pub fn static_run<A: Any + Clone + Send + Sync>(
		&mut self,
		name: &'static str,
		args: A,
		body: impl Fn(A) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		self.static_run_bodies
			.set(name, Box::new(move |pack: &ArgPack| body(unpack::<A>(pack)?)));
		self.runs.push((Side::Static, RunRecord {
			method: name,
			args: ArgPack::new(args),
		}));
		self
	}

	/// Calls `body()` every `interval` from the moment the type is automated.
	pub fn static_poll(
		&mut self,
		name: &'static str,
		interval: Duration,
		body: impl Fn() -> Result<(), BoxError> + Send + Sync + 'static,
	) -> &mut Self {
		self.static_poll_bodies.set(name, Arc::new(body));
		self.polls.push((Side::Static, PollRecord { method: name, interval }));
		self
	}

	pub(crate) fn commit(self, registry: AutomationRegistry) -> Result<AutomatedType<T>, AutomationError> {
		let owner = self.owner;
		for (side, record) in self.runs {
			registry.add_runnable(Target::new(owner, side), record);
		}
		for (side, record) in self.polls {
			registry.add_polled(Target::new(owner, side), record);
		}

		let automated = AutomatedType {
			owner,
			registry,
			run_bodies: self.run_bodies,
			poll_bodies: self.poll_bodies,
			static_cancel: CancellationToken::new(),
		};

		let static_target = Target::new(owner, Side::Static);
		for record in automated.registry.runnables(static_target) {
			let body = lookup(&self.static_run_bodies, owner, record.method)?;
			body(&record.args).map_err(|source| AutomationError::Method {
				owner: owner.name(),
				method: record.method,
				source,
			})?;
		}
		for record in automated.registry.polled(static_target) {
			let body = Arc::clone(lookup(&self.static_poll_bodies, owner, record.method)?);
			let handle = runtime(owner, record.method)?;
			spawn_poller(&handle, automated.static_cancel.clone(), owner, record, move || body());
		}
		Ok(automated)
	}
}

fn lookup<'a, B>(bodies: &'a OrderedMap<&'static str, B>, owner: TypeKey, method: &'static str) -> Result<&'a B, AutomationError> {
	bodies.get(method).ok_or(AutomationError::UnknownMethod {
		owner: owner.name(),
		method,
	})
}

fn runtime(owner: TypeKey, method: &'static str) -> Result<Handle, AutomationError> {
	Handle::try_current().map_err(|_| AutomationError::NoRuntime {
		owner: owner.name(),
		method,
	})
}

/// Shortest period a poller runs at. Shorter intervals, zero included, are
/// raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a task calling `tick` every `record.interval` until `cancel` fires.
///
/// The first call happens one period after spawning. Failed ticks are
/// logged and polling continues.
fn spawn_poller(
	handle: &Handle,
	cancel: CancellationToken,
	owner: TypeKey,
	record: PollRecord,
	tick: impl Fn() -> Result<(), BoxError> + Send + 'static,
) {
	let PollRecord { method, interval } = record;
	let period = interval.max(MIN_POLL_INTERVAL);
	tracing::trace!(%owner, method, period_ms = period.as_millis() as u64, "automation.poller.spawn");
	handle.spawn(async move {
		let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		loop {
			tokio::select! {
				_ = cancel.cancelled() => break,
				_ = ticker.tick() => {
					if let Err(error) = tick() {
						tracing::warn!(%owner, method, %error, "Polled method failed");
					}
				}
			}
		}
		tracing::trace!(%owner, method, "automation.poller.stop");
	});
}

/// Handle for creating automated instances of `T`.
///
/// Dropping it stops the type's static pollers.
pub struct AutomatedType<T> {
	owner: TypeKey,
	registry: AutomationRegistry,
	run_bodies: OrderedMap<&'static str, RunBody<T>>,
	poll_bodies: OrderedMap<&'static str, PollBody<T>>,
	static_cancel: CancellationToken,
}

impl<T: Automated> AutomatedType<T> {
	pub fn owner(&self) -> TypeKey {
		self.owner
	}

	pub fn registry(&self) -> &AutomationRegistry {
		&self.registry
	}

	/// Runs `value`'s run-once methods in registration order, then starts its
	/// pollers.
	pub fn instantiate(&self, mut value: T) -> Result<Automaton<T>, AutomationError> {
		let target = Target::new(self.owner, Side::Instance);
		for record in self.registry.runnables(target) {
			let body = lookup(&self.run_bodies, self.owner, record.method)?;
			body(&mut value, &record.args).map_err(|source| AutomationError::Method {
				owner: self.owner.name(),
				method: record.method,
				source,
			})?;
		}

		let automaton = Automaton {
			state: Arc::new(Mutex::new(value)),
			cancel: CancellationToken::new(),
		};
		for record in self.registry.polled(target) {
			let body = Arc::clone(lookup(&self.poll_bodies, self.owner, record.method)?);
			let handle = runtime(self.owner, record.method)?;
			let state = Arc::clone(&automaton.state);
			spawn_poller(&handle, automaton.cancel.clone(), self.owner, record, move || body(&mut *state.lock()));
		}
		Ok(automaton)
	}

	/// Stops the static pollers without dropping the handle.
	pub fn stop(&self) {
		self.static_cancel.cancel();
	}
}

impl<T> Drop for AutomatedType<T> {
	fn drop(&mut self) {
		self.static_cancel.cancel();
	}
}

/// An automated instance shared with its pollers.
///
/// Dropping it (or calling [`stop`](Self::stop)) stops its pollers.
pub struct Automaton<T> {
	state: Arc<Mutex<T>>,
	cancel: CancellationToken,
}

impl<T> Automaton<T> {
	pub fn lock(&self) -> MutexGuard<'_, T> {
		self.state.lock()
	}

	pub fn state(&self) -> &Arc<Mutex<T>> {
		&self.state
	}

	pub fn stop(&self) {
		self.cancel.cancel();
	}

	pub fn is_stopped(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

impl<T> Drop for Automaton<T> {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}
