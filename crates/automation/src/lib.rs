//! Methods that run once after construction or repeatedly on an interval.
//!
//! A type implementing [`Automated`] declares a [`Plan`]: run-once methods
//! with their arguments and polled methods with their intervals, on the
//! static side (the type itself) or the instance side. The plan is recorded
//! into [`MetadataStore`](trellis_wiring::MetadataStore)s by
//! [`AutomationRegistry::automate`], which also runs static methods right
//! away. [`AutomatedType::instantiate`] then runs instance methods and starts
//! pollers for each new instance.
//!
//! Pollers are tokio tasks and need a runtime when they are started.

mod error;
mod options;
mod registry;
mod schedule;

pub use error::AutomationError;
pub use options::AutomationOptions;
pub use registry::{AutomationRegistry, PollRecord, RunRecord};
pub use schedule::{Automated, AutomatedType, Automaton, MIN_POLL_INTERVAL, Plan};
