//! Decision System
//!
//! Maps each agent's observation to an action through a swappable policy.
//!
//! Policies only read the observation and draw from the simulation RNG, so any
//! implementation of [`Policy`] can be dropped in without touching perception
//! or action code.

use bevy_ecs::prelude::*;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::components::agent::Amoeba;
use crate::config::{DecisionConfig, PolicyKind};
use crate::systems::perception::Observation;
use crate::SimRng;

/// Desired movement, each component within [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    pub x: f64,
    pub y: f64,
}

impl Action {
    /// Build an action, clamping both components into [-1, 1]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Component: the action chosen for this tick
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent(pub Action);

/// Strategy turning an observation into an action
pub trait Policy: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn decide(&self, observation: &Observation, rng: &mut dyn RngCore) -> Action;
}

/// Uniform noise, ignores the observation
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&self, _observation: &Observation, rng: &mut dyn RngCore) -> Action {
        Action::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0))
    }
}

/// Follows the food gradient plus the toxic repulsion, scaled by `gain`
#[derive(Debug, Clone, Copy)]
pub struct GradientPolicy {
    pub gain: f64,
}

impl Default for GradientPolicy {
    fn default() -> Self {
        Self {
            gain: DecisionConfig::default().gradient_gain,
        }
    }
}

impl Policy for GradientPolicy {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn decide(&self, observation: &Observation, _rng: &mut dyn RngCore) -> Action {
        Action::new(
            (observation.food.x + observation.toxic.x) * self.gain,
            (observation.food.y + observation.toxic.y) * self.gain,
        )
    }
}

/// Resource holding the active policy
#[derive(Resource)]
pub struct DecisionPolicy(Box<dyn Policy>);

impl DecisionPolicy {
    pub fn new(policy: impl Policy) -> Self {
        Self(Box::new(policy))
    }

    pub fn from_config(config: &DecisionConfig) -> Self {
        match config.policy {
            PolicyKind::Random => Self::new(RandomPolicy),
            PolicyKind::Gradient => Self::new(GradientPolicy {
                gain: config.gradient_gain,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn decide(&self, observation: &Observation, rng: &mut dyn RngCore) -> Action {
        self.0.decide(observation, rng)
    }
}

/// System to pick an action for every agent
pub fn choose_actions(
    policy: Res<DecisionPolicy>,
    mut rng: ResMut<SimRng>,
    mut query: Query<(&Observation, &mut Intent), With<Amoeba>>,
) {
    for (observation, mut intent) in query.iter_mut() {
        intent.0 = policy.decide(observation, &mut rng.0);
    }
}
