//! Agent Types
//!
//! Identity, kind and grid position of a single drone.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for an agent, e.g. `truthful_0` or `adversarial_1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether a drone reports honestly. Only renderers look at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    #[default]
    Truthful,
    Adversarial,
}

impl AgentKind {
    /// Prefix used when generating agent ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            AgentKind::Truthful => "truthful",
            AgentKind::Adversarial => "adversarial",
        }
    }
}

/// A cell on the integer lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another cell
    pub fn distance_to(&self, other: &GridPos) -> f64 {
        let dx = (other.x as i64 - self.x as i64) as f64;
        let dy = (other.y as i64 - self.y as i64) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the cell offset by (dx, dy)
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A drone as seen by the graph engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: AgentId,
    #[serde(default)]
    pub kind: AgentKind,
    pub pos: GridPos,
}

impl AgentState {
    pub fn new(id: impl Into<AgentId>, kind: AgentKind, pos: impl Into<GridPos>) -> Self {
        Self {
            id: id.into(),
            kind,
            pos: pos.into(),
        }
    }

    pub fn truthful(id: impl Into<AgentId>, pos: impl Into<GridPos>) -> Self {
        Self::new(id, AgentKind::Truthful, pos)
    }

    pub fn adversarial(id: impl Into<AgentId>, pos: impl Into<GridPos>) -> Self {
        Self::new(id, AgentKind::Adversarial, pos)
    }
}

/// Current position of every agent, keyed by id
pub type PositionSnapshot = HashMap<AgentId, GridPos>;
