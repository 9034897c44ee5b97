//! Test utilities for the strata crates.
//!
//! - [`tracked`]: an instrumented managed element type that counts constructions
//!   and destructions.
//! - [`data_gen`]: seeded random operation scripts with a `Vec` oracle.
//!
//! This crate is only meant to be used from tests.

pub mod data_gen;
pub mod tracked;

pub use tracked::{LifeCounter, Tracked};
