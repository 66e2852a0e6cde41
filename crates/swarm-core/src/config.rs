//! Configuration loading for the swarm simulation.
//!
//! All settings are loaded from a TOML configuration file. Every section and
//! field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::GraphKind;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "swarm.toml";

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Grid and roster settings
    #[serde(default)]
    pub world: WorldConfig,
    /// Observation and communication graph settings
    #[serde(default)]
    pub graphs: GraphConfig,
    /// Headless renderer settings
    #[serde(default)]
    pub render: RenderConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects configurations no grid could satisfy.
    ///
    /// Radius and minimum-peer problems are not rejected here; the engine
    /// clamps those at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.size == 0 {
            return Err(ConfigError::Invalid("world.size must be at least 1".into()));
        }
        if self.world.size > i32::MAX as u32 {
            return Err(ConfigError::Invalid(format!(
                "world.size {} exceeds the largest grid coordinate {}",
                self.world.size,
                i32::MAX
            )));
        }
        let cells = self.world.size as u64 * self.world.size as u64;
        let agents = self.world.total_agents() as u64;
        if agents > cells {
            return Err(ConfigError::Invalid(format!(
                "{} agents cannot fit on a {}x{} grid",
                agents, self.world.size, self.world.size
            )));
        }
        Ok(())
    }
}

/// Grid and roster configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub size: u32,
    /// Number of truthful drones
    pub num_good_agents: usize,
    /// Number of adversarial drones
    pub num_adversarial_agents: usize,
    /// Moves per episode before truncation
    pub iterations: u64,
    /// Seed for spawning and the random walk
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 50,
            num_good_agents: 5,
            num_adversarial_agents: 2,
            iterations: 50,
            seed: 42,
        }
    }
}

impl WorldConfig {
    pub fn total_agents(&self) -> usize {
        self.num_good_agents + self.num_adversarial_agents
    }
}

/// Observation and communication graph configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Recompute the observation graph every tick
    pub dynamic_obs: bool,
    /// Observation radius in grid units (strict less-than)
    pub obs_radius: f64,
    /// Recompute the communication graph every tick; otherwise it is complete
    pub dynamic_comms: bool,
    /// Communication radius in grid units (strict less-than)
    pub dynamic_comms_radius: f64,
    /// Minimum communication peers per agent in dynamic mode
    pub dynamic_comms_enforce_minimum: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            dynamic_obs: true,
            obs_radius: 10.0,
            dynamic_comms: true,
            dynamic_comms_radius: 15.0,
            dynamic_comms_enforce_minimum: 1,
        }
    }
}

impl GraphConfig {
    /// Static observation and a complete communication graph.
    pub fn static_graphs() -> Self {
        Self {
            dynamic_obs: false,
            dynamic_comms: false,
            ..Self::default()
        }
    }

    /// Dynamic observation only; communication stays complete.
    pub fn observation_only(obs_radius: f64) -> Self {
        Self {
            dynamic_obs: true,
            obs_radius,
            dynamic_comms: false,
            ..Self::default()
        }
    }

    /// Dynamic communication only; observation stays empty.
    pub fn communication_only(radius: f64, minimum: usize) -> Self {
        Self {
            dynamic_obs: false,
            dynamic_comms: true,
            dynamic_comms_radius: radius,
            dynamic_comms_enforce_minimum: minimum,
            ..Self::default()
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw a frame to stdout after every step
    pub enabled: bool,
    /// Which graph to draw
    pub mode: GraphKind,
    /// List directed edges under the grid
    pub show_edges: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: GraphKind::Observation,
            show_edges: true,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// Structurally impossible configuration
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Drone Swarm Simulation Configuration

[world]
size = 50
num_good_agents = 5
num_adversarial_agents = 2
iterations = 50
seed = 42

[graphs]
dynamic_obs = true
obs_radius = 10.0
dynamic_comms = true
dynamic_comms_radius = 15.0
dynamic_comms_enforce_minimum = 1

[render]
enabled = false
mode = "observation"
show_edges = true
"#
    .to_string()
}
