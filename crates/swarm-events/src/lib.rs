//! Shared agent and graph snapshot types for the drone swarm simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod agent;
pub mod snapshot;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export agent types
pub use agent::{AgentId, AgentKind, AgentState, GridPos, PositionSnapshot};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, AgentPositionSnapshot, GraphSnapshot};
