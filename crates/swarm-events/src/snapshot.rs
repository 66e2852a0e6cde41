//! Snapshot Types
//!
//! Serialization structs for per-tick graph snapshots.
//!
//! A snapshot captures agent positions and both relation graphs at the end
//! of a tick. Snapshots are written one per line (JSONL) for analysis and
//! offline visualization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{AgentKind, AgentState, GridPos};

/// Generates a snapshot ID with the given tick number.
pub fn generate_snapshot_id(tick: u64) -> String {
    format!("snap_{:06}", tick)
}

/// Position and kind of one agent at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPositionSnapshot {
    pub agent_id: String,
    pub kind: AgentKind,
    pub x: i32,
    pub y: i32,
}

impl From<&AgentState> for AgentPositionSnapshot {
    fn from(agent: &AgentState) -> Self {
        Self {
            agent_id: agent.id.to_string(),
            kind: agent.kind,
            x: agent.pos.x,
            y: agent.pos.y,
        }
    }
}

impl AgentPositionSnapshot {
    pub fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// Complete graph snapshot for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    /// Grid dimension, for renderers
    pub grid_size: u32,
    pub agents: Vec<AgentPositionSnapshot>,
    /// Observation adjacency: agent id -> ids it can see
    #[serde(default)]
    pub observation: BTreeMap<String, Vec<String>>,
    /// Communication adjacency: agent id -> ids it can talk to
    #[serde(default)]
    pub communication: BTreeMap<String, Vec<String>>,
    /// Swarm centroid relative to the target
    #[serde(default)]
    pub arrangement_vector: [f64; 2],
}

impl GraphSnapshot {
    /// Creates a snapshot with positions only and empty graphs.
    pub fn new(tick: u64, grid_size: u32, agents: &[AgentState]) -> Self {
        Self {
            snapshot_id: generate_snapshot_id(tick),
            tick,
            grid_size,
            agents: agents.iter().map(AgentPositionSnapshot::from).collect(),
            observation: BTreeMap::new(),
            communication: BTreeMap::new(),
            arrangement_vector: [0.0, 0.0],
        }
    }

    /// Finds an agent by ID.
    pub fn find_agent(&self, agent_id: &str) -> Option<&AgentPositionSnapshot> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Ids observed by the given agent, empty if unknown
    pub fn observed_by(&self, agent_id: &str) -> &[String] {
        self.observation
            .get(agent_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ids the given agent can communicate with, empty if unknown
    pub fn reachable_from(&self, agent_id: &str) -> &[String] {
        self.communication
            .get(agent_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of directed edges in both graphs
    pub fn edge_counts(&self) -> (usize, usize) {
        let obs = self.observation.values().map(Vec::len).sum();
        let comm = self.communication.values().map(Vec::len).sum();
        (obs, comm)
    }

    /// Serializes the snapshot to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
