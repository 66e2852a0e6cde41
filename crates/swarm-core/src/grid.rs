//! Grid
//!
//! Square occupancy grid with one drone per cell and five discrete moves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use swarm_events::{AgentId, AgentState, GridPos};

/// A single drone move. `Up` decreases y (screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Stay,
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Stay,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
    ];

    /// Cell offset applied by this action
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Stay => (0, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }
}

/// Result of attempting a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Stayed,
    /// Target cell is outside the grid; drone stays put
    HitBoundary,
    /// Target cell holds another drone; drone stays put
    Collided,
}

/// Occupancy grid
#[derive(Debug, Clone, Default)]
pub struct Grid {
    size: u32,
    /// Maps cell -> occupying agent
    occupied: HashMap<GridPos, AgentId>,
}

impl Grid {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            occupied: HashMap::new(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// The shared target every drone heads for
    pub fn target(&self) -> GridPos {
        let centre = (self.size / 2) as i32;
        GridPos::new(centre, centre)
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.size && (pos.y as u32) < self.size
    }

    pub fn occupant(&self, pos: GridPos) -> Option<&AgentId> {
        self.occupied.get(&pos)
    }

    pub fn is_free(&self, pos: GridPos) -> bool {
        self.in_bounds(pos) && !self.occupied.contains_key(&pos)
    }

    /// Places an agent; false if the cell is taken or out of bounds
    pub fn place(&mut self, agent: &AgentState) -> bool {
        if !self.is_free(agent.pos) {
            return false;
        }
        self.occupied.insert(agent.pos, agent.id.clone());
        true
    }

    /// Clears every cell
    pub fn clear(&mut self) {
        self.occupied.clear();
    }

    /// Rebuilds occupancy from a roster.
    ///
    /// Returns the first agent that could not be placed, if any.
    pub fn reset(&mut self, agents: &[AgentState]) -> Option<AgentId> {
        self.clear();
        agents
            .iter()
            .find(|agent| !self.place(agent))
            .map(|agent| agent.id.clone())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Applies one action to a drone, updating both the drone and the grid.
    pub fn move_drone(&mut self, agent: &mut AgentState, action: Action) -> MoveOutcome {
        let (dx, dy) = action.delta();
        if (dx, dy) == (0, 0) {
            return MoveOutcome::Stayed;
        }

        let target = agent.pos.offset(dx, dy);
        if !self.in_bounds(target) {
            return MoveOutcome::HitBoundary;
        }
        if self.occupied.contains_key(&target) {
            tracing::debug!("{} blocked at {} by another drone", agent.id, target);
            return MoveOutcome::Collided;
        }

        self.occupied.remove(&agent.pos);
        self.occupied.insert(target, agent.id.clone());
        agent.pos = target;
        MoveOutcome::Moved
    }
}
