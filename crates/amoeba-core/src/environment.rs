//! Simulation Environment
//!
//! Owns the ECS world and the per-tick schedule. Everything outside the core
//! (the CLI, renderers, tests) drives the simulation through [`Environment`].

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use amoeba_events::{AgentSnapshot, SimEvent, WorldSnapshot};

use crate::components::agent::{Amoeba, AmoebaBundle, AmoebaId, Lifecycle, Motion, Trail, Vitals};
use crate::components::world::{IdAllocator, Landmark, LandmarkId, LandmarkKind, Landscape, Position, TickClock};
use crate::config::SimConfig;
use crate::events::TickEvents;
use crate::output::{agent_snapshot, generate_snapshot, SnapshotGenerator};
use crate::setup;
use crate::systems::{
    advance_age, choose_actions, execute_actions, manage_energy, manage_health, maybe_reproduce,
    record_trail, update_perception, DecisionPolicy, Policy,
};
use crate::SimRng;

/// Build the chained per-tick schedule
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            advance_age,
            manage_energy,
            manage_health,
            update_perception,
            choose_actions,
            execute_actions,
            maybe_reproduce,
            record_trail,
        )
            .chain(),
    );
    schedule
}

fn validated_or_default(config: SimConfig) -> SimConfig {
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            SimConfig::default()
        }
    }
}

pub struct Environment {
    world: World,
    schedule: Schedule,
}

impl Environment {
    /// Environment with the configured landmarks and starting agents
    pub fn new(config: SimConfig) -> Self {
        let mut env = Self::empty(config);

        let config = env.world.resource::<SimConfig>().clone();
        let mut ids = IdAllocator::new();
        let mut rng = SmallRng::seed_from_u64(config.simulation.seed);

        let landscape = setup::create_landscape(&config, &mut ids, &mut rng);
        env.world.insert_resource(landscape);
        setup::spawn_all_agents(&mut env.world, &config, &mut ids, &mut rng);

        env.world.insert_resource(ids);
        env.world.insert_resource(SimRng(rng));

        let summary = setup::get_spawn_summary(&mut env.world);
        tracing::info!(
            seed = config.simulation.seed,
            agents = summary.agents,
            food = summary.food,
            obstacles = summary.obstacles,
            toxic_zones = summary.toxic_zones,
            policy = env.policy_name(),
            "Environment created"
        );
        env
    }

    /// Environment with no landmarks and no agents.
    ///
    /// A configuration that fails [`SimConfig::validate`] is replaced by the
    /// defaults so no system can panic on an out-of-range value.
    pub fn empty(config: SimConfig) -> Self {
        let config = validated_or_default(config);
        let mut world = World::new();

        world.insert_resource(SimRng(SmallRng::seed_from_u64(config.simulation.seed)));
        world.insert_resource(DecisionPolicy::from_config(&config.decision));
        world.insert_resource(SnapshotGenerator::new(config.simulation.snapshot_interval));
        world.insert_resource(Landscape::new());
        world.insert_resource(IdAllocator::new());
        world.insert_resource(TickClock::new());
        world.insert_resource(TickEvents::new());
        world.insert_resource(config);

        Self {
            world,
            schedule: build_schedule(),
        }
    }

    /// Replace the decision policy
    pub fn with_policy(mut self, policy: impl Policy) -> Self {
        self.world.insert_resource(DecisionPolicy::new(policy));
        self
    }

    pub fn policy_name(&self) -> &'static str {
        self.world.resource::<DecisionPolicy>().name()
    }

    /// Advance exactly one tick
    pub fn update(&mut self) {
        self.world.resource_mut::<TickClock>().advance_tick();
        self.schedule.run(&mut self.world);
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.update();
        }
    }

    pub fn snapshot(&mut self) -> WorldSnapshot {
        self.snapshot_as("requested")
    }

    /// Snapshot tagged with what triggered it
    pub fn snapshot_as(&mut self, triggered_by: &str) -> WorldSnapshot {
        generate_snapshot(&mut self.world, triggered_by)
    }

    /// True when the configured snapshot interval falls on the current tick
    pub fn snapshot_due(&self) -> bool {
        self.world
            .resource::<SnapshotGenerator>()
            .should_snapshot(self.current_tick())
    }

    /// Events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<TickEvents>().drain()
    }

    /// Spawn a fresh agent at the given position
    pub fn spawn_agent(&mut self, x: f64, y: f64) -> AmoebaId {
        let id = self.world.resource_mut::<IdAllocator>().next_agent();
        let heading = self.world.resource_mut::<SimRng>().0.gen_range(0.0..TAU);
        let bundle = {
            let config = self.world.resource::<SimConfig>();
            AmoebaBundle::new(id, Position::new(x, y), heading, &config.agent)
        };
        self.world.spawn(bundle);
        AmoebaId(id)
    }

    /// Place a landmark of the given kind, sized from the population config
    pub fn add_landmark(&mut self, kind: LandmarkKind, x: f64, y: f64) -> LandmarkId {
        let radius = {
            let population = &self.world.resource::<SimConfig>().population;
            match kind {
                LandmarkKind::Food => population.food_radius,
                LandmarkKind::Obstacle => population.obstacle_radius,
                LandmarkKind::ToxicZone => population.toxic_radius,
            }
        };
        let id = self.world.resource_mut::<IdAllocator>().next_landmark();
        self.world
            .resource_mut::<Landscape>()
            .insert(Landmark::new(id, kind, Position::new(x, y), radius));
        id
    }

    pub fn agent_entity(&mut self, id: AmoebaId) -> Option<Entity> {
        let mut query = self.world.query_filtered::<(Entity, &AmoebaId), With<Amoeba>>();
        query
            .iter(&self.world)
            .find(|(_, agent_id)| **agent_id == id)
            .map(|(entity, _)| entity)
    }

    /// Current state of one agent
    pub fn agent(&mut self, id: AmoebaId) -> Option<AgentSnapshot> {
        let mut query = self.world.query_filtered::<
            (&AmoebaId, &Position, &Motion, &Vitals, &Lifecycle, &Trail),
            With<Amoeba>,
        >();
        query
            .iter(&self.world)
            .find(|(agent_id, ..)| **agent_id == id)
            .map(|(agent_id, position, motion, vitals, lifecycle, trail)| {
                agent_snapshot(agent_id, position, motion, vitals, lifecycle, trail)
            })
    }

    pub fn agent_count(&mut self) -> usize {
        let mut query = self.world.query_filtered::<(), With<Amoeba>>();
        query.iter(&self.world).count()
    }

    pub fn food_count(&self) -> usize {
        self.world.resource::<Landscape>().food.len()
    }

    /// Snapshots taken so far
    pub fn snapshot_count(&self) -> u64 {
        self.world.resource::<SnapshotGenerator>().snapshot_count()
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickClock>().current_tick
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
