//! Insertion-ordered associative containers.
//!
//! Both containers keep their keys in a plain vector and look them up with a
//! linear `PartialEq` scan. They are meant for the small tables used by the
//! wiring and event crates (a few dozen entries at most), where preserving
//! registration order matters more than asymptotic lookup cost.

/// Key/value map preserving first-insertion order.
pub mod map;
/// Key to value-list map preserving key insertion and value append order.
pub mod multimap;

pub use map::OrderedMap;
pub use multimap::OrderedMultiMap;
