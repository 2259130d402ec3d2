//! World Components
//!
//! Positions, landmarks (food, obstacles, toxic zones), and the tick clock.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

pub use amoeba_events::LandmarkKind;
use amoeba_events::{LandmarkSnapshot, Point};

/// Component: a point in arena coordinates
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector pointing from self towards `target`
    pub fn bearing_to(&self, target: &Position) -> f64 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    /// Angle of the vector pointing from `source` towards self
    pub fn bearing_from(&self, source: &Position) -> f64 {
        (self.y - source.y).atan2(self.x - source.x)
    }

    /// Move `distance` units along `angle`
    pub fn advance(&mut self, angle: f64, distance: f64) {
        self.x += angle.cos() * distance;
        self.y += angle.sin() * distance;
    }

    pub fn clamp_to(&mut self, width: f64, height: f64) {
        self.x = self.x.clamp(0.0, width);
        self.y = self.y.clamp(0.0, height);
    }

    pub fn is_within(&self, width: f64, height: f64) -> bool {
        (0.0..=width).contains(&self.x) && (0.0..=height).contains(&self.y)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Stable identity of a landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LandmarkId(pub u64);

/// A passive, immovable thing in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: LandmarkId,
    pub kind: LandmarkKind,
    pub position: Position,
    pub radius: f64,
}

impl Landmark {
    pub fn new(id: LandmarkId, kind: LandmarkKind, position: Position, radius: f64) -> Self {
        Self {
            id,
            kind,
            position,
            radius,
        }
    }

    pub fn to_snapshot(&self) -> LandmarkSnapshot {
        LandmarkSnapshot {
            landmark_id: self.id.0,
            kind: self.kind,
            position: self.position.to_point(),
            radius: self.radius,
        }
    }
}

/// Index and distance of the landmark nearest to `from`.
/// Ties keep the earliest landmark.
pub fn nearest(landmarks: &[Landmark], from: &Position) -> Option<(usize, f64)> {
    landmarks
        .iter()
        .enumerate()
        .map(|(index, landmark)| (index, from.distance_to(&landmark.position)))
        .fold(None, |best, (index, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((index, distance)),
        })
}

/// Resource: every landmark in the arena
#[derive(Resource, Debug, Clone, Default)]
pub struct Landscape {
    pub food: Vec<Landmark>,
    pub obstacles: Vec<Landmark>,
    pub toxic_zones: Vec<Landmark>,
}

impl Landscape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a landmark to the collection matching its kind
    pub fn insert(&mut self, landmark: Landmark) {
        match landmark.kind {
            LandmarkKind::Food => self.food.push(landmark),
            LandmarkKind::Obstacle => self.obstacles.push(landmark),
            LandmarkKind::ToxicZone => self.toxic_zones.push(landmark),
        }
    }

    /// Remove a food item by identity
    pub fn remove_food(&mut self, id: LandmarkId) -> Option<Landmark> {
        let index = self.food.iter().position(|f| f.id == id)?;
        Some(self.food.remove(index))
    }

    pub fn contains_food(&self, id: LandmarkId) -> bool {
        self.food.iter().any(|f| f.id == id)
    }
}

/// Resource: hands out agent and landmark ids
#[derive(Resource, Debug)]
pub struct IdAllocator {
    next_agent: u64,
    next_landmark: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_agent: 1,
            next_landmark: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_agent(&mut self) -> u64 {
        let id = self.next_agent;
        self.next_agent += 1;
        id
    }

    pub fn next_landmark(&mut self) -> LandmarkId {
        let id = LandmarkId(self.next_landmark);
        self.next_landmark += 1;
        id
    }
}

/// Resource: the current simulation tick
#[derive(Resource, Debug, Clone, Default)]
pub struct TickClock {
    pub current_tick: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }
}
