//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // amoeba-events = { path = "../amoeba-events", features = ["test-fixtures"] }
//!
//! use amoeba_events::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! ```

use uuid::Uuid;

use crate::{
    AgentSnapshot, EventDetail, LandmarkKind, LandmarkSnapshot, LifecycleSnapshot, Point,
    SimEvent, WorldSnapshot,
};

fn landmark(landmark_id: u64, kind: LandmarkKind, x: f64, y: f64, radius: f64) -> LandmarkSnapshot {
    LandmarkSnapshot {
        landmark_id,
        kind,
        position: Point::new(x, y),
        radius,
    }
}

/// Returns a small hand-built world snapshot.
///
/// Contains:
/// - 2 food items, 1 obstacle, 1 toxic zone
/// - 1 active agent with a short trail
/// - 1 inert agent
pub fn sample_snapshot() -> WorldSnapshot {
    let mut snapshot = WorldSnapshot::new("snap_000001", Uuid::nil(), 120, "periodic");

    snapshot.food.push(landmark(1, LandmarkKind::Food, 120.0, 80.0, 6.0));
    snapshot.food.push(landmark(2, LandmarkKind::Food, 640.0, 410.0, 6.0));
    snapshot.obstacles.push(landmark(3, LandmarkKind::Obstacle, 300.0, 300.0, 20.0));
    snapshot.toxic_zones.push(landmark(4, LandmarkKind::ToxicZone, 500.0, 200.0, 20.0));

    let mut forager = AgentSnapshot::new(1, Point::new(410.0, 300.0));
    forager.speed = 10.0;
    forager.energy = 1439.5;
    forager.size = 31.0;
    forager.age = 1.2;
    forager.consumed_food = 1;
    forager.trail = vec![Point::new(400.0, 300.0), Point::new(410.0, 300.0)];
    snapshot.agents.push(forager);

    let mut husk = AgentSnapshot::new(2, Point::new(50.0, 50.0));
    husk.size = 26.0;
    husk.age = 40.0;
    husk.state = LifecycleSnapshot::Inert;
    snapshot.agents.push(husk);

    snapshot
}

/// Returns one event of each type.
pub fn sample_events() -> Vec<SimEvent> {
    vec![
        SimEvent {
            event_id: "evt_00000001".to_string(),
            tick: 57,
            agent_id: 1,
            position: Point::new(118.0, 82.0),
            detail: EventDetail::FoodConsumed {
                landmark_id: 5,
                energy_after: 1470.2,
                consumed_total: 1,
            },
        },
        SimEvent {
            event_id: "evt_00000002".to_string(),
            tick: 1301,
            agent_id: 2,
            position: Point::new(50.0, 50.0),
            detail: EventDetail::BecameInert { age: 13.01 },
        },
    ]
}
