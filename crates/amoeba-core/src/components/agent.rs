//! Agent Components
//!
//! Components for individual amoebas: motion, vitals, lifecycle, trail.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use amoeba_events::LifecycleSnapshot;

use super::world::Position;
use crate::config::AgentConfig;
use crate::systems::decision::Intent;
use crate::systems::perception::Observation;

/// Marker component identifying an entity as an amoeba
#[derive(Component, Debug, Clone, Default)]
pub struct Amoeba;

/// Unique identifier for an amoeba
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmoebaId(pub u64);

/// Direction of travel and step length
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Radians
    pub heading: f64,
    /// Units per step
    pub speed: f64,
}

/// Energy budget and growth
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub energy: f64,
    pub size: f64,
    pub age: f64,
    pub consumed_food: u32,
}

impl Vitals {
    pub fn new(energy: f64, size: f64) -> Self {
        Self {
            energy,
            size,
            age: 0.0,
            consumed_food: 0,
        }
    }
}

/// Lifecycle state. `Inert` is terminal.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Inert,
}

impl Lifecycle {
    pub fn is_inert(&self) -> bool {
        matches!(self, Lifecycle::Inert)
    }

    pub fn to_snapshot(self) -> LifecycleSnapshot {
        match self {
            Lifecycle::Active => LifecycleSnapshot::Active,
            Lifecycle::Inert => LifecycleSnapshot::Inert,
        }
    }
}

/// Bounded history of past positions, oldest first
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Position>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position, evicting the oldest when full
    pub fn record(&mut self, position: Position) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Position> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.points.iter()
    }
}

/// Everything an amoeba entity is spawned with
#[derive(Bundle)]
pub struct AmoebaBundle {
    pub marker: Amoeba,
    pub id: AmoebaId,
    pub position: Position,
    pub motion: Motion,
    pub vitals: Vitals,
    pub lifecycle: Lifecycle,
    pub trail: Trail,
    pub observation: Observation,
    pub intent: Intent,
}

impl AmoebaBundle {
    /// A fresh amoeba using the configured starting values
    pub fn new(id: u64, position: Position, heading: f64, config: &AgentConfig) -> Self {
        Self {
            marker: Amoeba,
            id: AmoebaId(id),
            position,
            motion: Motion {
                heading,
                speed: config.speed,
            },
            vitals: Vitals::new(config.initial_energy, config.base_size),
            lifecycle: Lifecycle::Active,
            trail: Trail::with_capacity(config.trail_capacity),
            observation: Observation::default(),
            intent: Intent::default(),
        }
    }

    pub fn with_vitals(mut self, energy: f64, size: f64) -> Self {
        self.vitals.energy = energy;
        self.vitals.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::with_capacity(3);
        for i in 0..5 {
            trail.record(Position::new(i as f64, 0.0));
        }

        assert_eq!(trail.len(), 3);
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert_eq!(trail.latest(), Some(&Position::new(4.0, 0.0)));
    }

    #[test]
    fn test_trail_starts_empty() {
        let trail = Trail::with_capacity(100);
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 100);
        assert!(trail.latest().is_none());
    }

    #[test]
    fn test_lifecycle() {
        assert!(!Lifecycle::default().is_inert());
        assert!(Lifecycle::Inert.is_inert());
        assert_eq!(Lifecycle::Inert.to_snapshot(), LifecycleSnapshot::Inert);
    }

    #[test]
    fn test_bundle_uses_config() {
        let config = AgentConfig::default();
        let bundle = AmoebaBundle::new(7, Position::new(400.0, 300.0), 1.0, &config)
            .with_vitals(250.0, 15.0);

        assert_eq!(bundle.id, AmoebaId(7));
        assert_eq!(bundle.motion.speed, 10.0);
        assert_eq!(bundle.vitals.energy, 250.0);
        assert_eq!(bundle.vitals.size, 15.0);
        assert_eq!(bundle.vitals.age, 0.0);
        assert_eq!(bundle.trail.capacity(), 100);
    }
}
