//! Snapshot Generation
//!
//! Builds read-only world snapshots for renderers and other observers.

use bevy_ecs::prelude::*;
use uuid::Uuid;

use amoeba_events::{generate_snapshot_id, AgentSnapshot, ArenaSnapshot, WorldSnapshot};

use crate::components::agent::{Amoeba, AmoebaId, Lifecycle, Motion, Trail, Vitals};
use crate::components::world::{Landscape, Position, TickClock};
use crate::config::SimConfig;

/// Resource to track snapshot generation
#[derive(Resource)]
pub struct SnapshotGenerator {
    run_id: Uuid,
    next_snapshot_id: u64,
    snapshot_interval: u64,
}

impl SnapshotGenerator {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            next_snapshot_id: 1,
            snapshot_interval,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// True on tick 0 and every `snapshot_interval` ticks. An interval of 0
    /// disables periodic snapshots.
    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        current_tick == 0
            || (self.snapshot_interval > 0 && current_tick % self.snapshot_interval == 0)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Snapshot of a single agent from its components
pub fn agent_snapshot(
    id: &AmoebaId,
    position: &Position,
    motion: &Motion,
    vitals: &Vitals,
    lifecycle: &Lifecycle,
    trail: &Trail,
) -> AgentSnapshot {
    AgentSnapshot {
        agent_id: id.0,
        position: position.to_point(),
        heading: motion.heading,
        speed: motion.speed,
        energy: vitals.energy,
        size: vitals.size,
        age: vitals.age,
        consumed_food: vitals.consumed_food,
        state: lifecycle.to_snapshot(),
        trail: trail.iter().map(|p| p.to_point()).collect(),
    }
}

/// Collect every agent, ordered by id
pub fn collect_agents(world: &mut World) -> Vec<AgentSnapshot> {
    let mut query = world.query_filtered::<
        (&AmoebaId, &Position, &Motion, &Vitals, &Lifecycle, &Trail),
        With<Amoeba>,
    >();
    let mut agents: Vec<AgentSnapshot> = query
        .iter(world)
        .map(|(id, position, motion, vitals, lifecycle, trail)| {
            agent_snapshot(id, position, motion, vitals, lifecycle, trail)
        })
        .collect();
    agents.sort_by_key(|a| a.agent_id);
    agents
}

/// Generate a complete world snapshot
pub fn generate_snapshot(world: &mut World, triggered_by: &str) -> WorldSnapshot {
    let tick = world.resource::<TickClock>().current_tick;

    let (snapshot_id, run_id) = {
        let mut generator = world.resource_mut::<SnapshotGenerator>();
        (generator.next_id(), generator.run_id())
    };

    let mut snapshot = WorldSnapshot::new(snapshot_id, run_id, tick, triggered_by);

    let config = world.resource::<SimConfig>();
    snapshot.arena = ArenaSnapshot {
        width: config.arena.width,
        height: config.arena.height,
    };

    let landscape = world.resource::<Landscape>();
    snapshot.food = landscape.food.iter().map(|l| l.to_snapshot()).collect();
    snapshot.obstacles = landscape.obstacles.iter().map(|l| l.to_snapshot()).collect();
    snapshot.toxic_zones = landscape.toxic_zones.iter().map(|l| l.to_snapshot()).collect();

    snapshot.agents = collect_agents(world);
    snapshot
}
