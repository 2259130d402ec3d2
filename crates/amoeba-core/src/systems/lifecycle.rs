//! Lifecycle System
//!
//! Aging, energy flooring, age-scaled decay, the transition to the terminal
//! inert state, and reproduction.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::f64::consts::TAU;

use amoeba_events::{EventDetail, OffspringPlacement};

use crate::components::agent::{Amoeba, AmoebaBundle, AmoebaId, Lifecycle, Motion, Vitals};
use crate::components::world::{IdAllocator, Landmark, LandmarkKind, Landscape, Position, TickClock};
use crate::config::{OffspringTarget, SimConfig};
use crate::events::TickEvents;
use crate::SimRng;

/// Floor energy at zero and stop the agent once it runs out.
///
/// Returns true only on the tick the agent becomes inert.
pub fn enforce_energy_floor(vitals: &mut Vitals, motion: &mut Motion, lifecycle: &mut Lifecycle) -> bool {
    if vitals.energy > 0.0 {
        return false;
    }
    vitals.energy = 0.0;
    motion.speed = 0.0;
    let newly_inert = !lifecycle.is_inert();
    *lifecycle = Lifecycle::Inert;
    newly_inert
}

/// Starting state of a newly split-off offspring
#[derive(Debug, Clone, PartialEq)]
pub struct Offspring {
    pub position: Position,
    pub energy: f64,
    pub size: f64,
}

impl Offspring {
    /// Half the parent's size and energy, placed within `jitter` on each axis
    pub fn split_from(parent: &Position, vitals: &Vitals, jitter: i32, rng: &mut impl Rng) -> Self {
        let dx = rng.gen_range(-jitter..=jitter);
        let dy = rng.gen_range(-jitter..=jitter);
        Self {
            position: Position::new(parent.x + f64::from(dx), parent.y + f64::from(dy)),
            energy: vitals.energy / 2.0,
            size: vitals.size / 2.0,
        }
    }
}

/// System: every agent grows older by a fixed step
pub fn advance_age(config: Res<SimConfig>, mut query: Query<&mut Vitals, With<Amoeba>>) {
    for mut vitals in query.iter_mut() {
        vitals.age += config.lifecycle.age_increment;
    }
}

fn report_inert(tick_events: &mut TickEvents, tick: u64, id: &AmoebaId, position: &Position, vitals: &Vitals) {
    tracing::info!(tick, agent = id.0, age = vitals.age, "Amoeba became inert");
    tick_events.record(
        tick,
        id.0,
        position.to_point(),
        EventDetail::BecameInert { age: vitals.age },
    );
}

/// System: agents with no energy left become inert
pub fn manage_energy(
    clock: Res<TickClock>,
    mut tick_events: ResMut<TickEvents>,
    mut query: Query<(&AmoebaId, &Position, &mut Vitals, &mut Motion, &mut Lifecycle), With<Amoeba>>,
) {
    for (id, position, mut vitals, mut motion, mut lifecycle) in query.iter_mut() {
        if enforce_energy_floor(&mut vitals, &mut motion, &mut lifecycle) {
            report_inert(&mut tick_events, clock.current_tick, id, position, &vitals);
        }
    }
}

/// System: energy decays in proportion to age, then the floor is enforced
pub fn manage_health(
    config: Res<SimConfig>,
    clock: Res<TickClock>,
    mut tick_events: ResMut<TickEvents>,
    mut query: Query<(&AmoebaId, &Position, &mut Vitals, &mut Motion, &mut Lifecycle), With<Amoeba>>,
) {
    for (id, position, mut vitals, mut motion, mut lifecycle) in query.iter_mut() {
        vitals.energy -= vitals.age * config.lifecycle.health_decay;
        if enforce_energy_floor(&mut vitals, &mut motion, &mut lifecycle) {
            report_inert(&mut tick_events, clock.current_tick, id, position, &vitals);
        }
    }
}

/// System: large agents occasionally split off an offspring.
///
/// The parent keeps its own size and energy. Depending on configuration the
/// offspring joins the population or lands in the food supply.
#[allow(clippy::too_many_arguments)]
pub fn maybe_reproduce(
    mut commands: Commands,
    config: Res<SimConfig>,
    clock: Res<TickClock>,
    mut ids: ResMut<IdAllocator>,
    mut landscape: ResMut<Landscape>,
    mut rng: ResMut<SimRng>,
    mut tick_events: ResMut<TickEvents>,
    query: Query<(&AmoebaId, &Position, &Vitals), With<Amoeba>>,
) {
    let lifecycle = &config.lifecycle;

    for (id, position, vitals) in query.iter() {
        if vitals.size <= lifecycle.reproduction_size {
            continue;
        }
        if !rng.0.gen_bool(lifecycle.reproduction_chance) {
            continue;
        }

        let offspring = Offspring::split_from(position, vitals, lifecycle.offspring_jitter, &mut rng.0);

        let (placement, offspring_id) = match lifecycle.offspring {
            OffspringTarget::Population => {
                let child_id = ids.next_agent();
                let heading = rng.0.gen_range(0.0..TAU);
                commands.spawn(
                    AmoebaBundle::new(child_id, offspring.position, heading, &config.agent)
                        .with_vitals(offspring.energy, offspring.size),
                );
                (OffspringPlacement::Population, child_id)
            }
            OffspringTarget::Food => {
                let landmark_id = ids.next_landmark();
                landscape.insert(Landmark::new(
                    landmark_id,
                    LandmarkKind::Food,
                    offspring.position,
                    offspring.size,
                ));
                (OffspringPlacement::FoodSupply, landmark_id.0)
            }
        };

        tracing::info!(
            tick = clock.current_tick,
            parent = id.0,
            offspring = offspring_id,
            ?placement,
            "Amoeba reproduced"
        );
        tick_events.record(
            clock.current_tick,
            id.0,
            position.to_point(),
            EventDetail::Reproduced {
                placement,
                offspring_id,
                offspring_position: offspring.position.to_point(),
                offspring_size: offspring.size,
                offspring_energy: offspring.energy,
            },
        );
    }
}
