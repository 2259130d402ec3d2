//! ECS Components
//!
//! Agent components and the passive landmarks of the arena.

pub mod agent;
pub mod world;

pub use agent::*;
pub use world::*;
