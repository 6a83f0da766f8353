//! Named events with ordered handler lists.
//!
//! An [`EventManager`] maps event names to the [`Handler`]s bound with
//! [`EventManager::on`]. [`EventManager::trigger`] calls them in binding order
//! with positional, type-erased [`EventArgs`].

mod args;
mod manager;

pub use args::EventArgs;
pub use manager::{EventManager, Handler};
