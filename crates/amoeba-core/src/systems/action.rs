//! Action Execution System
//!
//! Resolves each agent's tick into movement, feeding, and avoidance.
//!
//! Priority: approach and eat nearby food, otherwise wander occasionally while
//! food remains elsewhere, and once the food is gone step away from the
//! nearest obstacle and toxic zone. Every tick costs a flat amount of energy.

use bevy_ecs::prelude::*;
use rand::Rng;

use amoeba_events::EventDetail;

use crate::components::agent::{Amoeba, AmoebaId, Lifecycle, Motion, Vitals};
use crate::components::world::{nearest, Landmark, Landscape, Position, TickClock};
use crate::config::SimConfig;
use crate::events::TickEvents;
use crate::systems::decision::{Action, Intent};
use crate::SimRng;

/// Which branch of the priority rules ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Stepped towards food within proximity range
    Approach,
    /// Food exists but none is close; took a random-walk step
    Wander,
    /// Food exists but none is close; stood still this tick
    Idle,
    /// No food left; stepped away from hazards
    Avoid { obstacle: bool, toxic: bool },
}

/// Result of one call to [`act`]
#[derive(Debug, Clone, PartialEq)]
pub struct ActOutcome {
    pub behaviour: Behaviour,
    pub consumed: Option<Landmark>,
}

/// Mutable view of the agent parts the executor touches
pub struct Body<'a> {
    pub position: &'a mut Position,
    pub motion: &'a mut Motion,
    pub vitals: &'a mut Vitals,
}

impl Body<'_> {
    fn step(&mut self, angle: f64, config: &SimConfig) {
        self.position.advance(angle, self.motion.speed);
        if config.arena.clamp_to_bounds {
            self.position.clamp_to(config.arena.width, config.arena.height);
        }
    }

    fn move_towards(&mut self, target: &Position, config: &SimConfig) {
        let angle = self.position.bearing_to(target);
        self.step(angle, config);
    }

    fn move_away_from(&mut self, source: &Position, config: &SimConfig) {
        let angle = self.position.bearing_from(source);
        self.step(angle, config);
    }

    fn random_walk(&mut self, config: &SimConfig, rng: &mut impl Rng) {
        let turn = config.foraging.wander_turn;
        self.motion.heading += rng.gen_range(-turn..=turn);
        let heading = self.motion.heading;
        self.step(heading, config);
    }
}

/// Execute one tick of behaviour for a single agent.
///
/// `_action` is what the policy chose; the priority rules below do not
/// consult it yet. Energy is not floored here.
pub fn act(
    body: &mut Body<'_>,
    _action: &Action,
    landscape: &mut Landscape,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> ActOutcome {
    let foraging = &config.foraging;
    let mut consumed = None;

    let behaviour = match nearest(&landscape.food, body.position) {
        Some((index, distance)) if distance < foraging.proximity_range => {
            let target = landscape.food[index].clone();
            body.move_towards(&target.position, config);

            if body.position.distance_to(&target.position) < foraging.consumption_range {
                consumed = landscape.remove_food(target.id);
                if consumed.is_some() {
                    body.vitals.consumed_food += 1;
                    body.vitals.energy += foraging.food_energy;
                    body.vitals.size += foraging.food_growth;
                }
            }
            Behaviour::Approach
        }
        Some(_) => {
            if rng.gen_bool(foraging.wander_chance) {
                body.random_walk(config, rng);
                Behaviour::Wander
            } else {
                Behaviour::Idle
            }
        }
        None => {
            let closest_obstacle = nearest(&landscape.obstacles, body.position)
                .map(|(index, _)| landscape.obstacles[index].position);
            if let Some(obstacle) = &closest_obstacle {
                body.move_away_from(obstacle, config);
            }

            // Measured after the obstacle step
            let closest_toxic = nearest(&landscape.toxic_zones, body.position)
                .map(|(index, _)| landscape.toxic_zones[index].position);
            if let Some(toxic) = &closest_toxic {
                body.move_away_from(toxic, config);
            }

            Behaviour::Avoid {
                obstacle: closest_obstacle.is_some(),
                toxic: closest_toxic.is_some(),
            }
        }
    };

    body.vitals.energy -= foraging.tick_cost;

    ActOutcome {
        behaviour,
        consumed,
    }
}

/// System to execute every active agent's tick
pub fn execute_actions(
    config: Res<SimConfig>,
    clock: Res<TickClock>,
    mut landscape: ResMut<Landscape>,
    mut rng: ResMut<SimRng>,
    mut tick_events: ResMut<TickEvents>,
    mut query: Query<
        (&AmoebaId, &Lifecycle, &Intent, &mut Position, &mut Motion, &mut Vitals),
        With<Amoeba>,
    >,
) {
    for (id, lifecycle, intent, mut position, mut motion, mut vitals) in query.iter_mut() {
        if lifecycle.is_inert() {
            continue;
        }

        let mut body = Body {
            position: &mut position,
            motion: &mut motion,
            vitals: &mut vitals,
        };
        let outcome = act(&mut body, &intent.0, &mut landscape, &config, &mut rng.0);

        if let Some(food) = outcome.consumed {
            tracing::debug!(
                tick = clock.current_tick,
                agent = id.0,
                food = food.id.0,
                energy = vitals.energy,
                "Food consumed"
            );
            tick_events.record(
                clock.current_tick,
                id.0,
                position.to_point(),
                EventDetail::FoodConsumed {
                    landmark_id: food.id.0,
                    energy_after: vitals.energy,
                    consumed_total: vitals.consumed_food,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::world::{LandmarkId, LandmarkKind};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn landmark(id: u64, kind: LandmarkKind, x: f64, y: f64) -> Landmark {
        Landmark::new(LandmarkId(id), kind, Position::new(x, y), 6.0)
    }

    struct Agent {
        position: Position,
        motion: Motion,
        vitals: Vitals,
    }

    impl Agent {
        fn at(x: f64, y: f64) -> Self {
            Self {
                position: Position::new(x, y),
                motion: Motion {
                    heading: 0.0,
                    speed: 10.0,
                },
                vitals: Vitals::new(1000.0, 30.0),
            }
        }

        fn act(&mut self, landscape: &mut Landscape, config: &SimConfig, rng: &mut SmallRng) -> ActOutcome {
            let mut body = Body {
                position: &mut self.position,
                motion: &mut self.motion,
                vitals: &mut self.vitals,
            };
            act(&mut body, &Action::default(), landscape, config, rng)
        }
    }

    #[test]
    fn test_consumes_food_within_reach() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 405.0, 300.0));

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(outcome.behaviour, Behaviour::Approach);
        assert_eq!(outcome.consumed.map(|f| f.id), Some(LandmarkId(1)));
        assert!(landscape.food.is_empty());
        assert_eq!(agent.vitals.consumed_food, 1);
        assert_eq!(agent.vitals.energy, 1000.0 + 500.0 - 0.5);
        assert_eq!(agent.vitals.size, 31.0);
        // Overshoots the food by one step
        assert!((agent.position.x - 410.0).abs() < 1e-9);
    }

    #[test]
    fn test_approaches_without_eating() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 440.0, 300.0));

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(outcome.behaviour, Behaviour::Approach);
        assert!(outcome.consumed.is_none());
        assert_eq!(landscape.food.len(), 1);
        assert!((agent.position.x - 410.0).abs() < 1e-9);
        assert_eq!(agent.vitals.energy, 999.5);
        assert_eq!(agent.vitals.size, 30.0);
    }

    #[test]
    fn test_targets_nearest_food_only() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 430.0, 300.0));
        landscape.insert(landmark(2, LandmarkKind::Food, 400.0, 292.0));

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(outcome.consumed.map(|f| f.id), Some(LandmarkId(2)));
        assert!(landscape.contains_food(LandmarkId(1)));
        assert_eq!(agent.vitals.consumed_food, 1);
    }

    #[test]
    fn test_distant_food_wanders_or_idles() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(99);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 700.0, 500.0));

        let mut wanders = 0;
        for _ in 0..2000 {
            let mut agent = Agent::at(100.0, 100.0);
            let outcome = agent.act(&mut landscape, &config, &mut rng);
            match outcome.behaviour {
                Behaviour::Wander => {
                    wanders += 1;
                    assert!((agent.position.distance_to(&Position::new(100.0, 100.0)) - 10.0).abs() < 1e-9);
                    assert!(agent.motion.heading.abs() <= 0.5);
                }
                Behaviour::Idle => assert_eq!(agent.position, Position::new(100.0, 100.0)),
                other => panic!("unexpected behaviour {:?}", other),
            }
            assert_eq!(agent.vitals.energy, 999.5);
        }

        // 10% chance: expect about 200 of 2000
        assert!((120..=280).contains(&wanders), "wanders = {}", wanders);
        assert_eq!(landscape.food.len(), 1);
    }

    #[test]
    fn test_avoids_hazards_when_food_gone() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Obstacle, 390.0, 300.0));
        landscape.insert(landmark(2, LandmarkKind::ToxicZone, 420.0, 300.0));

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(
            outcome.behaviour,
            Behaviour::Avoid {
                obstacle: true,
                toxic: true
            }
        );
        // +10 away from the obstacle, then -10 away from the toxic zone
        assert!((agent.position.x - 400.0).abs() < 1e-9);
        assert!((agent.position.y - 300.0).abs() < 1e-9);
        assert_eq!(agent.vitals.energy, 999.5);
    }

    #[test]
    fn test_avoids_obstacle_only() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Obstacle, 400.0, 250.0));

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(
            outcome.behaviour,
            Behaviour::Avoid {
                obstacle: true,
                toxic: false
            }
        );
        assert!((agent.position.y - 310.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_world_only_costs_energy() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();

        let mut agent = Agent::at(400.0, 300.0);
        let outcome = agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(
            outcome.behaviour,
            Behaviour::Avoid {
                obstacle: false,
                toxic: false
            }
        );
        assert_eq!(agent.position, Position::new(400.0, 300.0));
        assert_eq!(agent.vitals.energy, 999.5);
    }

    #[test]
    fn test_zero_speed_never_moves() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 420.0, 300.0));

        let mut agent = Agent::at(400.0, 300.0);
        agent.motion.speed = 0.0;
        agent.act(&mut landscape, &config, &mut rng);

        assert_eq!(agent.position, Position::new(400.0, 300.0));
        assert_eq!(landscape.food.len(), 1);
    }

    #[test]
    fn test_unclamped_agent_leaves_arena() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Obstacle, 10.0, 300.0));

        let mut agent = Agent::at(5.0, 300.0);
        agent.act(&mut landscape, &config, &mut rng);
        assert!((agent.position.x + 5.0).abs() < 1e-9, "x = {}", agent.position.x);
        assert!(!agent.position.is_within(config.arena.width, config.arena.height));
    }

    #[test]
    fn test_clamped_agent_stays_in_arena() {
        let mut config = SimConfig::default();
        config.arena.clamp_to_bounds = true;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Obstacle, 10.0, 300.0));

        let mut agent = Agent::at(5.0, 300.0);
        agent.act(&mut landscape, &config, &mut rng);
        assert_eq!(agent.position.x, 0.0);
        assert!(agent.position.is_within(config.arena.width, config.arena.height));
    }

    #[test]
    fn test_execute_system_skips_inert_and_records_events() {
        let mut world = World::new();
        world.insert_resource(SimConfig::default());
        world.insert_resource(TickClock::new());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(5)));
        world.insert_resource(TickEvents::new());

        let mut landscape = Landscape::new();
        landscape.insert(landmark(1, LandmarkKind::Food, 105.0, 100.0));
        landscape.insert(landmark(2, LandmarkKind::Food, 505.0, 100.0));
        world.insert_resource(landscape);

        let active = world
            .spawn((
                Amoeba,
                AmoebaId(1),
                Lifecycle::Active,
                Intent::default(),
                Position::new(100.0, 100.0),
                Motion { heading: 0.0, speed: 10.0 },
                Vitals::new(1000.0, 30.0),
            ))
            .id();
        let inert = world
            .spawn((
                Amoeba,
                AmoebaId(2),
                Lifecycle::Inert,
                Intent::default(),
                Position::new(500.0, 100.0),
                Motion { heading: 0.0, speed: 0.0 },
                Vitals::new(0.0, 30.0),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(execute_actions);
        schedule.run(&mut world);

        assert_eq!(world.get::<Vitals>(active).unwrap().consumed_food, 1);
        let inert_vitals = world.get::<Vitals>(inert).unwrap();
        assert_eq!(inert_vitals.energy, 0.0);
        assert_eq!(inert_vitals.consumed_food, 0);
        assert_eq!(*world.get::<Position>(inert).unwrap(), Position::new(500.0, 100.0));

        let landscape = world.resource::<Landscape>();
        assert!(landscape.contains_food(LandmarkId(2)));
        assert!(!landscape.contains_food(LandmarkId(1)));

        let events = world.resource::<TickEvents>();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events.events[0].detail,
            EventDetail::FoodConsumed { landmark_id: 1, consumed_total: 1, .. }
        ));
    }
}
