//! World Setup
//!
//! Landmark placement and agent spawning.

pub mod population;

pub use population::*;
