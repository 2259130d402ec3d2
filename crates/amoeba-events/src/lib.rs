//! Shared snapshot and event types for the amoeba simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Renderers and other observers depend on it instead of the simulation core.

pub mod event;
pub mod snapshot;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export event types
pub use event::*;

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentSnapshot, ArenaSnapshot, LandmarkKind, LandmarkSnapshot,
    LifecycleSnapshot, Point, WorldSnapshot,
};
