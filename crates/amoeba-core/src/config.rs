//! Configuration System
//!
//! Loads tuning parameters from a TOML file. Every section falls back to its
//! defaults, so a partial file only needs the values it changes.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "amoeba.toml";

/// Top-level configuration structure, also stored as an ECS resource
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub arena: ArenaConfig,
    pub population: PopulationConfig,
    pub agent: AgentConfig,
    pub perception: PerceptionConfig,
    pub decision: DecisionConfig,
    pub foraging: ForagingConfig,
    pub lifecycle: LifecycleConfig,
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub default_ticks: u64,
    /// Target ticks per second when pacing in real time
    pub tick_rate: u32,
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            default_ticks: 3600,
            tick_rate: 60,
            snapshot_interval: 60,
        }
    }
}

/// Arena dimensions and bounds handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Clamp agent positions to the arena after every move
    pub clamp_to_bounds: bool,
    /// Landmarks spawn at least this far from the arena edge
    pub spawn_margin: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            clamp_to_bounds: false,
            spawn_margin: 50,
        }
    }
}

/// Initial population counts and landmark radii
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub food: usize,
    pub obstacles: usize,
    pub toxic_zones: usize,
    pub agents: usize,
    pub food_radius: f64,
    pub obstacle_radius: f64,
    pub toxic_radius: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            food: 10,
            obstacles: 5,
            toxic_zones: 3,
            agents: 1,
            food_radius: 6.0,
            obstacle_radius: 20.0,
            toxic_radius: 20.0,
        }
    }
}

/// Starting state of a freshly spawned agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub initial_energy: f64,
    /// Distance moved per step
    pub speed: f64,
    pub base_size: f64,
    pub trail_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_energy: 1000.0,
            speed: 10.0,
            base_size: 30.0,
            trail_capacity: 100,
        }
    }
}

/// Gradient sensing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub sensory_range: f64,
    /// Added to distances before inverting them
    pub epsilon: f64,
    /// Energy is divided by this before entering the observation
    pub energy_scale: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            sensory_range: 100.0,
            epsilon: 1e-5,
            energy_scale: 1000.0,
        }
    }
}

/// Which decision policy drives the agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Random,
    Gradient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub policy: PolicyKind,
    /// Multiplier applied to gradients by the gradient policy
    pub gradient_gain: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Random,
            gradient_gain: 10.0,
        }
    }
}

/// Action executor thresholds and costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagingConfig {
    /// Food closer than this is approached
    pub proximity_range: f64,
    /// Food closer than this after a step is eaten
    pub consumption_range: f64,
    pub food_energy: f64,
    pub food_growth: f64,
    /// Chance per tick of a random-walk step when no food is near
    pub wander_chance: f64,
    /// Maximum heading change of a random-walk step, in radians
    pub wander_turn: f64,
    /// Energy spent every tick regardless of action
    pub tick_cost: f64,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            proximity_range: 50.0,
            consumption_range: 10.0,
            food_energy: 500.0,
            food_growth: 1.0,
            wander_chance: 0.1,
            wander_turn: 0.5,
            tick_cost: 0.5,
        }
    }
}

/// Where offspring are placed after reproduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffspringTarget {
    /// Offspring become new agents
    #[default]
    Population,
    /// Offspring become edible food landmarks
    Food,
}

/// Aging, decay and reproduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub age_increment: f64,
    /// Energy lost per tick per unit of age
    pub health_decay: f64,
    /// Agents strictly larger than this may reproduce
    pub reproduction_size: f64,
    pub reproduction_chance: f64,
    /// Maximum offspring offset on each axis
    pub offspring_jitter: i32,
    pub offspring: OffspringTarget,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            age_increment: 0.01,
            health_decay: 0.05,
            reproduction_size: 50.0,
            reproduction_chance: 0.01,
            offspring_jitter: 20,
            offspring: OffspringTarget::Population,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "arena must have positive size, got {}x{}",
                self.arena.width, self.arena.height
            )));
        }
        if f64::from(self.arena.spawn_margin) * 2.0 > self.arena.width.min(self.arena.height) {
            return Err(ConfigError::Invalid(format!(
                "spawn margin {} leaves no room in the arena",
                self.arena.spawn_margin
            )));
        }
        if self.agent.trail_capacity == 0 {
            return Err(ConfigError::Invalid("trail capacity must be at least 1".into()));
        }
        if self.simulation.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick rate must be at least 1".into()));
        }
        if self.lifecycle.offspring_jitter < 0 {
            return Err(ConfigError::Invalid("offspring jitter must not be negative".into()));
        }

        let non_negative = [
            ("agent.speed", self.agent.speed),
            ("perception.sensory_range", self.perception.sensory_range),
            ("perception.epsilon", self.perception.epsilon),
            ("foraging.proximity_range", self.foraging.proximity_range),
            ("foraging.consumption_range", self.foraging.consumption_range),
            ("foraging.tick_cost", self.foraging.tick_cost),
            ("foraging.wander_turn", self.foraging.wander_turn),
            ("lifecycle.age_increment", self.lifecycle.age_increment),
            ("lifecycle.health_decay", self.lifecycle.health_decay),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and not negative, got {}",
                    name, value
                )));
            }
        }
        if self.perception.energy_scale <= 0.0 {
            return Err(ConfigError::Invalid("perception.energy_scale must be positive".into()));
        }

        let probabilities = [
            ("foraging.wander_chance", self.foraging.wander_chance),
            ("lifecycle.reproduction_chance", self.lifecycle.reproduction_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.arena.width, 800.0);
        assert_eq!(config.arena.height, 600.0);
        assert_eq!(config.population.food, 10);
        assert_eq!(config.population.obstacles, 5);
        assert_eq!(config.population.toxic_zones, 3);
        assert_eq!(config.population.agents, 1);
        assert_eq!(config.agent.trail_capacity, 100);
        assert!(!config.arena.clamp_to_bounds);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [arena]
            clamp_to_bounds = true

            [lifecycle]
            offspring = "food"
            "#,
        )
        .unwrap();

        assert!(config.arena.clamp_to_bounds);
        assert_eq!(config.arena.width, 800.0);
        assert_eq!(config.lifecycle.offspring, OffspringTarget::Food);
        assert_eq!(config.lifecycle.reproduction_chance, 0.01);
        assert_eq!(config.decision.policy, PolicyKind::Random);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SimConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = SimConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = SimConfig::from_toml("[foraging]\nwander_chance = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_wander_turn() {
        let err = SimConfig::from_toml("[foraging]\nwander_turn = -0.5\nwander_chance = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("wander_turn")));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = SimConfig::default();
        config.foraging.wander_turn = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.foraging.wander_turn = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.lifecycle.reproduction_chance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_arena() {
        let mut config = SimConfig::default();
        config.arena.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_trail() {
        let mut config = SimConfig::default();
        config.agent.trail_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = SimConfig::from_toml("[arena\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::load("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
