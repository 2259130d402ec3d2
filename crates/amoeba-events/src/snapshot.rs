//! Snapshot Types
//!
//! Serialization structs for world snapshots handed to renderers.
//!
//! Snapshots capture the complete observable state of the simulation between
//! two ticks: every landmark and every agent, including the agent's trail.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// A point in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind of passive landmark in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    Food,
    Obstacle,
    ToxicZone,
}

/// Lifecycle state of an agent as seen by observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSnapshot {
    #[default]
    Active,
    Inert,
}

/// Arena dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub width: f64,
    pub height: f64,
}

impl Default for ArenaSnapshot {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Food, obstacle or toxic zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSnapshot {
    pub landmark_id: u64,
    pub kind: LandmarkKind,
    pub position: Point,
    pub radius: f64,
}

/// Full agent snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: u64,
    pub position: Point,
    /// Heading in radians
    pub heading: f64,
    pub speed: f64,
    pub energy: f64,
    pub size: f64,
    pub age: f64,
    pub consumed_food: u32,
    #[serde(default)]
    pub state: LifecycleSnapshot,
    /// Past positions, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<Point>,
}

impl AgentSnapshot {
    /// Creates a new AgentSnapshot at a position with zeroed vitals.
    pub fn new(agent_id: u64, position: Point) -> Self {
        Self {
            agent_id,
            position,
            heading: 0.0,
            speed: 0.0,
            energy: 0.0,
            size: 0.0,
            age: 0.0,
            consumed_food: 0,
            state: LifecycleSnapshot::Active,
            trail: Vec::new(),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.state == LifecycleSnapshot::Inert
    }
}

/// Complete world snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub snapshot_id: String,
    /// Identifies the run that produced this snapshot
    pub run_id: Uuid,
    pub tick: u64,
    pub triggered_by: String,
    pub arena: ArenaSnapshot,
    pub food: Vec<LandmarkSnapshot>,
    pub obstacles: Vec<LandmarkSnapshot>,
    pub toxic_zones: Vec<LandmarkSnapshot>,
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    /// Creates an empty WorldSnapshot.
    pub fn new(
        snapshot_id: impl Into<String>,
        run_id: Uuid,
        tick: u64,
        triggered_by: impl Into<String>,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            run_id,
            tick,
            triggered_by: triggered_by.into(),
            arena: ArenaSnapshot::default(),
            food: Vec::new(),
            obstacles: Vec::new(),
            toxic_zones: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Returns the number of agents that can still move.
    pub fn active_agent_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_inert()).count()
    }

    /// Iterates over every landmark regardless of kind.
    pub fn landmarks(&self) -> impl Iterator<Item = &LandmarkSnapshot> {
        self.food
            .iter()
            .chain(self.obstacles.iter())
            .chain(self.toxic_zones.iter())
    }

    /// Serializes the snapshot to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
