//! Generic resizable array engine.
//!
//! [`Array<T>`] is a contiguous, exclusively owned, growable array whose every
//! operation is fallible and all-or-nothing: invalid indices, refused growth and
//! malformed arguments are reported through [`strata_common::Result`] and leave the
//! array untouched.
//!
//! The crate is layered leaves-first:
//!
//! - [`class`]: compile-time classification of element types into relocatable and
//!   managed, and the relocation primitives dispatched on it.
//! - [`storage`]: the owned allocation, its capacity/count bookkeeping, growth and
//!   memory budget charging.
//! - [`array`]: the public operation set (append, indexed access, swap/shift remove,
//!   overlap-safe range moves, exchange, insert, find, compare, set difference).
//!
//! On top of those sit the adapters consumed by higher-level containers:
//! [`stack::Stack`], the parallel key/value helpers in [`bulk`], the raw byte view
//! in [`bytes`] and the explicit [`registry::ElementRegistry`].
//!
//! The engine performs no internal synchronization; concurrent use requires an
//! external lock.

pub mod array;
pub mod bulk;
pub mod bytes;
pub mod class;
pub mod options;
pub mod registry;
pub mod stack;
pub mod storage;

#[cfg(test)]
mod tests;

pub use array::Array;
pub use class::{ElementClass, ElementInfo};
pub use options::{ArrayOptions, GrowthPolicy};
pub use stack::Stack;
