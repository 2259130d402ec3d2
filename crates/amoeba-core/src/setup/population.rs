//! Population Setup
//!
//! Scatters the initial landmarks over the arena and spawns the starting
//! amoebas.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f64::consts::TAU;

use crate::components::agent::{Amoeba, AmoebaBundle};
use crate::components::world::{IdAllocator, Landmark, LandmarkKind, Landscape, Position};
use crate::config::SimConfig;

/// Uniform integer coordinates at least `spawn_margin` away from every edge
fn random_spawn_point(config: &SimConfig, rng: &mut SmallRng) -> Position {
    let margin = i64::from(config.arena.spawn_margin);
    let max_x = (config.arena.width as i64 - margin).max(margin);
    let max_y = (config.arena.height as i64 - margin).max(margin);
    Position::new(
        rng.gen_range(margin..=max_x) as f64,
        rng.gen_range(margin..=max_y) as f64,
    )
}

/// Create the food, obstacles, and toxic zones
pub fn create_landscape(config: &SimConfig, ids: &mut IdAllocator, rng: &mut SmallRng) -> Landscape {
    let population = &config.population;
    let mut landscape = Landscape::new();

    let groups = [
        (LandmarkKind::Food, population.food, population.food_radius),
        (LandmarkKind::Obstacle, population.obstacles, population.obstacle_radius),
        (LandmarkKind::ToxicZone, population.toxic_zones, population.toxic_radius),
    ];
    for (kind, count, radius) in groups {
        for _ in 0..count {
            let position = random_spawn_point(config, rng);
            landscape.insert(Landmark::new(ids.next_landmark(), kind, position, radius));
        }
    }

    landscape
}

/// Where the agent with the given spawn index starts.
/// The first agent starts at the arena centre.
pub fn starting_position(index: usize, config: &SimConfig, rng: &mut SmallRng) -> Position {
    if index == 0 {
        Position::new(
            (config.arena.width / 2.0).floor(),
            (config.arena.height / 2.0).floor(),
        )
    } else {
        random_spawn_point(config, rng)
    }
}

/// Spawn the configured number of starting agents
pub fn spawn_all_agents(world: &mut World, config: &SimConfig, ids: &mut IdAllocator, rng: &mut SmallRng) {
    for index in 0..config.population.agents {
        let position = starting_position(index, config, rng);
        let heading = rng.gen_range(0.0..TAU);
        world.spawn(AmoebaBundle::new(ids.next_agent(), position, heading, &config.agent));
    }
}

/// Counts of everything placed in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSummary {
    pub agents: usize,
    pub food: usize,
    pub obstacles: usize,
    pub toxic_zones: usize,
}

/// Summarize what currently lives in the world
pub fn get_spawn_summary(world: &mut World) -> SpawnSummary {
    let mut query = world.query_filtered::<(), With<Amoeba>>();
    let agents = query.iter(world).count();
    let landscape = world.resource::<Landscape>();
    SpawnSummary {
        agents,
        food: landscape.food.len(),
        obstacles: landscape.obstacles.len(),
        toxic_zones: landscape.toxic_zones.len(),
    }
}
