//! Scenario tests
//!
//! Small hand-built arenas driven through `Environment::update`.

use amoeba_core::components::{AmoebaId, LandmarkKind, Vitals};
use amoeba_core::config::OffspringTarget;
use amoeba_core::{Environment, SimConfig};
use amoeba_events::{EventDetail, EventType, LifecycleSnapshot};

fn set_vitals(env: &mut Environment, id: AmoebaId, energy: f64, size: f64) {
    let entity = env.agent_entity(id).unwrap();
    let mut vitals = env.world_mut().get_mut::<Vitals>(entity).unwrap();
    vitals.energy = energy;
    vitals.size = size;
}

#[test]
fn test_adjacent_food_is_eaten() {
    let mut env = Environment::empty(SimConfig::default());
    let id = env.spawn_agent(400.0, 300.0);
    env.add_landmark(LandmarkKind::Food, 405.0, 300.0);

    let before = env.agent(id).unwrap();
    env.update();
    let after = env.agent(id).unwrap();

    assert_eq!(env.food_count(), 0);
    assert_eq!(after.consumed_food, 1);
    assert_eq!(after.size, before.size + 1.0);

    // +500 for the food, -0.5 tick cost, -age * 0.05 health decay
    let expected = before.energy + 500.0 - 0.5 - 0.01 * 0.05;
    assert!((after.energy - expected).abs() < 1e-9);
    assert!((after.position.x - 410.0).abs() < 1e-9);

    let events = env.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), EventType::Consumption);
}

#[test]
fn test_food_is_removed_exactly_once() {
    let mut env = Environment::empty(SimConfig::default());
    let first = env.spawn_agent(400.0, 300.0);
    let second = env.spawn_agent(410.0, 300.0);
    env.add_landmark(LandmarkKind::Food, 405.0, 300.0);

    env.update();

    let total = env.agent(first).unwrap().consumed_food + env.agent(second).unwrap().consumed_food;
    assert_eq!(total, 1);
    assert_eq!(env.food_count(), 0);
}

#[test]
fn test_zero_energy_agent_goes_inert_and_stays_put() {
    let mut env = Environment::empty(SimConfig::default());
    let id = env.spawn_agent(400.0, 300.0);
    env.add_landmark(LandmarkKind::Food, 405.0, 300.0);
    set_vitals(&mut env, id, 0.0, 30.0);

    env.update();

    let agent = env.agent(id).unwrap();
    assert_eq!(agent.state, LifecycleSnapshot::Inert);
    assert_eq!(agent.speed, 0.0);
    assert_eq!(agent.energy, 0.0);
    assert_eq!(agent.position.x, 400.0);
    assert_eq!(agent.position.y, 300.0);
    assert_eq!(env.food_count(), 1);

    let events = env.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].detail, EventDetail::BecameInert { .. }));
}

#[test]
fn test_inert_agent_never_moves() {
    let mut env = Environment::empty(SimConfig::default());
    let id = env.spawn_agent(400.0, 300.0);
    env.add_landmark(LandmarkKind::Obstacle, 390.0, 300.0);
    set_vitals(&mut env, id, 0.4, 30.0);

    // First tick still acts and overdraws, second tick floors it
    env.run(2);
    let frozen = env.agent(id).unwrap();
    assert!(frozen.is_inert());

    env.run(50);
    let later = env.agent(id).unwrap();
    assert_eq!(later.position, frozen.position);
    assert_eq!(later.energy, 0.0);

    let inert_events = env
        .drain_events()
        .into_iter()
        .filter(|e| e.event_type() == EventType::Inert)
        .count();
    assert_eq!(inert_events, 1);
}

#[test]
fn test_trail_holds_latest_hundred_positions() {
    let mut env = Environment::empty(SimConfig::default());
    let id = env.spawn_agent(400.0, 300.0);
    env.add_landmark(LandmarkKind::Obstacle, 390.0, 300.0);

    env.run(150);

    let agent = env.agent(id).unwrap();
    assert_eq!(agent.trail.len(), 100);
    assert!((agent.trail[0].x - 910.0).abs() < 1e-6);
    assert_eq!(agent.trail.last(), Some(&agent.position));
    assert!(agent.trail.windows(2).all(|pair| pair[0].x < pair[1].x));
}

#[test]
fn test_unclamped_agent_leaves_arena() {
    let mut env = Environment::empty(SimConfig::default());
    let id = env.spawn_agent(780.0, 300.0);
    env.add_landmark(LandmarkKind::ToxicZone, 770.0, 300.0);

    env.run(10);

    let agent = env.agent(id).unwrap();
    assert!(agent.position.x > 800.0);
}

#[test]
fn test_clamped_agent_stays_in_arena() {
    let mut config = SimConfig::default();
    config.arena.clamp_to_bounds = true;
    let mut env = Environment::empty(config);
    let id = env.spawn_agent(780.0, 300.0);
    env.add_landmark(LandmarkKind::ToxicZone, 770.0, 300.0);

    for _ in 0..10 {
        env.update();
        let agent = env.agent(id).unwrap();
        assert!(agent.position.x <= 800.0);
        assert!(agent.position.x >= 0.0);
    }
    assert_eq!(env.agent(id).unwrap().position.x, 800.0);
}

#[test]
fn test_small_agents_never_reproduce() {
    let mut config = SimConfig::default();
    config.lifecycle.reproduction_chance = 1.0;
    let mut env = Environment::empty(config);
    let id = env.spawn_agent(400.0, 300.0);
    set_vitals(&mut env, id, 100_000.0, 50.0);

    env.run(100);

    assert_eq!(env.agent_count(), 1);
    assert!(env.drain_events().is_empty());
}

#[test]
fn test_offspring_joins_population_with_half_size_and_energy() {
    let mut config = SimConfig::default();
    config.lifecycle.reproduction_chance = 1.0;
    let mut env = Environment::empty(config);
    let parent = env.spawn_agent(400.0, 300.0);
    set_vitals(&mut env, parent, 2000.0, 60.0);

    env.update();

    assert_eq!(env.agent_count(), 2);
    let parent_state = env.agent(parent).unwrap();
    assert_eq!(parent_state.size, 60.0);

    let events = env.drain_events();
    assert_eq!(events.len(), 1);
    let EventDetail::Reproduced { offspring_id, .. } = events[0].detail else {
        panic!("expected a reproduction event");
    };

    let child = env.agent(AmoebaId(offspring_id)).unwrap();
    assert_eq!(child.size, 30.0);
    assert!((child.energy - parent_state.energy / 2.0).abs() < 1e-9);
    assert!((child.position.x - 400.0).abs() <= 20.0);
    assert!((child.position.y - 300.0).abs() <= 20.0);
}

#[test]
fn test_offspring_as_food() {
    let mut config = SimConfig::default();
    config.lifecycle.reproduction_chance = 1.0;
    config.lifecycle.offspring = OffspringTarget::Food;
    let mut env = Environment::empty(config);
    let parent = env.spawn_agent(400.0, 300.0);
    set_vitals(&mut env, parent, 2000.0, 60.0);

    env.update();

    assert_eq!(env.agent_count(), 1);
    assert_eq!(env.food_count(), 1);
    let snapshot = env.snapshot();
    assert_eq!(snapshot.food[0].radius, 30.0);

    let events = env.drain_events();
    assert_eq!(events[0].created_landmark(), Some(LandmarkKind::Food));
}
