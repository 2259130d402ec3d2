//! Perception System
//!
//! Senses food and toxic zones within range and condenses them into an
//! observation vector for the decision policy.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::agent::{Amoeba, Vitals};
use crate::components::world::{Landmark, Landscape, Position};
use crate::config::{PerceptionConfig, SimConfig};

/// Accumulated inverse-distance weighted direction. Not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gradient {
    pub x: f64,
    pub y: f64,
}

impl Gradient {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn accumulate(&mut self, angle: f64, weight: f64) {
        self.x += weight * angle.cos();
        self.y += weight * angle.sin();
    }
}

/// Component: what an agent sensed this tick
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
    /// Points towards food
    pub food: Gradient,
    /// Points away from toxic zones
    pub toxic: Gradient,
    /// Energy divided by the configured scale
    pub energy_level: f64,
}

impl Observation {
    pub const LEN: usize = 5;

    /// Flat feature vector: food x/y, toxic x/y, energy level
    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.food.x,
            self.food.y,
            self.toxic.x,
            self.toxic.y,
            self.energy_level,
        ]
    }

    pub fn from_array(values: [f64; Self::LEN]) -> Self {
        Self {
            food: Gradient::new(values[0], values[1]),
            toxic: Gradient::new(values[2], values[3]),
            energy_level: values[4],
        }
    }
}

/// Weight of an entity at `distance`; finite at zero distance
pub fn inverse_distance_weight(distance: f64, epsilon: f64) -> f64 {
    1.0 / (distance + epsilon)
}

/// Attraction towards every landmark strictly inside `range`
pub fn attraction(from: &Position, landmarks: &[Landmark], range: f64, epsilon: f64) -> Gradient {
    let mut gradient = Gradient::default();
    for landmark in landmarks {
        let distance = from.distance_to(&landmark.position);
        if distance < range {
            gradient.accumulate(
                from.bearing_to(&landmark.position),
                inverse_distance_weight(distance, epsilon),
            );
        }
    }
    gradient
}

/// Repulsion away from every landmark strictly inside `range`
pub fn repulsion(from: &Position, landmarks: &[Landmark], range: f64, epsilon: f64) -> Gradient {
    let mut gradient = Gradient::default();
    for landmark in landmarks {
        let distance = from.distance_to(&landmark.position);
        if distance < range {
            gradient.accumulate(
                from.bearing_from(&landmark.position),
                inverse_distance_weight(distance, epsilon),
            );
        }
    }
    gradient
}

/// Food and toxic gradients at `from`
pub fn sense(
    from: &Position,
    food: &[Landmark],
    toxic_zones: &[Landmark],
    config: &PerceptionConfig,
) -> (Gradient, Gradient) {
    (
        attraction(from, food, config.sensory_range, config.epsilon),
        repulsion(from, toxic_zones, config.sensory_range, config.epsilon),
    )
}

/// Build the full observation for one agent
pub fn observe(
    position: &Position,
    vitals: &Vitals,
    landscape: &Landscape,
    config: &PerceptionConfig,
) -> Observation {
    let (food, toxic) = sense(position, &landscape.food, &landscape.toxic_zones, config);
    Observation {
        food,
        toxic,
        energy_level: vitals.energy / config.energy_scale,
    }
}

/// System to refresh every agent's observation from the landscape
pub fn update_perception(
    config: Res<SimConfig>,
    landscape: Res<Landscape>,
    mut query: Query<(&Position, &Vitals, &mut Observation), With<Amoeba>>,
) {
    for (position, vitals, mut observation) in query.iter_mut() {
        *observation = observe(position, vitals, &landscape, &config.perception);
    }
}
