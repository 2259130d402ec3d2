//! Amoeba Foraging Simulation Library
//!
//! Public API for the simulation engine.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod environment;
pub mod events;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use environment::Environment;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
