//! ECS Systems
//!
//! Lifecycle, perception, decision, action, and trail systems, run once per
//! tick in that order.

pub mod action;
pub mod decision;
pub mod lifecycle;
pub mod perception;
pub mod trail;

// Re-export commonly used systems
pub use perception::{sense, update_perception, Gradient, Observation};
pub use decision::{choose_actions, Action, DecisionPolicy, GradientPolicy, Intent, Policy, RandomPolicy};
pub use action::{act, execute_actions, ActOutcome, Behaviour, Body};
pub use lifecycle::{
    advance_age, enforce_energy_floor, manage_energy, manage_health, maybe_reproduce, Offspring,
};
pub use trail::record_trail;
