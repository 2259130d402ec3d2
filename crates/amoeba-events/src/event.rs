//! Event Types
//!
//! Lifecycle and foraging events emitted by the simulation each tick.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::snapshot::{LandmarkKind, Point};

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Consumption,
    Inert,
    Birth,
}

impl EventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[EventType::Consumption, EventType::Inert, EventType::Birth]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Consumption => "consumption",
            EventType::Inert => "inert",
            EventType::Birth => "birth",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = EventType::all().iter().map(|t| t.as_str()).collect();
                format!("unknown event type '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Where an offspring ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffspringPlacement {
    /// Joined the agent population
    Population,
    /// Added to the food supply as a consumable landmark
    FoodSupply,
}

/// Event-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetail {
    FoodConsumed {
        landmark_id: u64,
        energy_after: f64,
        consumed_total: u32,
    },
    BecameInert {
        age: f64,
    },
    Reproduced {
        placement: OffspringPlacement,
        /// Agent id or landmark id of the offspring, depending on placement
        offspring_id: u64,
        offspring_position: Point,
        offspring_size: f64,
        offspring_energy: f64,
    },
}

impl EventDetail {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetail::FoodConsumed { .. } => EventType::Consumption,
            EventDetail::BecameInert { .. } => EventType::Inert,
            EventDetail::Reproduced { .. } => EventType::Birth,
        }
    }
}

/// A single simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub event_id: String,
    pub tick: u64,
    pub agent_id: u64,
    /// Agent position when the event fired
    pub position: Point,
    pub detail: EventDetail,
}

impl SimEvent {
    pub fn event_type(&self) -> EventType {
        self.detail.event_type()
    }

    /// Serializes to a single JSONL line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses from a single JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Kind of landmark created by this event, if any
    pub fn created_landmark(&self) -> Option<LandmarkKind> {
        match self.detail {
            EventDetail::Reproduced {
                placement: OffspringPlacement::FoodSupply,
                ..
            } => Some(LandmarkKind::Food),
            _ => None,
        }
    }
}
