//! Drone swarm simulation core: relation graphs, grid movement, episodes.
//!
//! The heart of this crate is [`RelationGraphEngine`], which maintains an
//! observation graph and a communication graph over a fixed drone roster and
//! recomputes them from position snapshots once per tick. Everything else
//! (grid, episode, logger, renderer) is a collaborator that feeds it
//! positions or reads its graphs back.
//!
//! # Modules
//!
//! - [`engine`]: The relation graph engine and its per-graph modes
//! - [`graph`]: Directed adjacency lists in roster order
//! - [`config`]: TOML configuration with clamping validation
//! - [`grid`]: Occupancy grid and discrete drone moves
//! - [`episode`]: Reset/step driver tying grid and engine together
//! - [`policy`]: Seeded random-walk action source
//! - [`output`]: JSONL graph snapshot logging
//! - [`render`]: Injectable renderer capability and an ASCII renderer

pub mod config;
pub mod engine;
pub mod episode;
pub mod error;
pub mod graph;
pub mod grid;
pub mod output;
pub mod policy;
pub mod render;

pub use config::{
    default_config_toml, ConfigError, GraphConfig, RenderConfig, SimConfig, WorldConfig,
    DEFAULT_CONFIG_PATH,
};
pub use engine::{CommunicationMode, GraphKind, ObservationMode, RelationGraphEngine};
pub use episode::{arrangement_vector, spawn_roster, AgentInfo, Episode, EpisodeError, StepOutcome};
pub use error::GraphError;
pub use graph::RelationGraph;
pub use grid::{Action, Grid, MoveOutcome};
pub use output::{snapshot_of, GraphLogger};
pub use policy::RandomWalk;
pub use render::{AsciiRenderer, GraphRenderer, RenderError, RenderFrame};
