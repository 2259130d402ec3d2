//! Trail System
//!
//! Appends each agent's end-of-tick position to its bounded history.

use bevy_ecs::prelude::*;

use crate::components::agent::{Amoeba, Trail};
use crate::components::world::Position;

/// System to record where every agent ended the tick
pub fn record_trail(mut query: Query<(&Position, &mut Trail), With<Amoeba>>) {
    for (position, mut trail) in query.iter_mut() {
        trail.record(*position);
    }
}
