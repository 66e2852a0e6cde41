//! Error types for the relation graph engine.

use swarm_events::AgentId;

/// Errors raised by [`RelationGraphEngine`](crate::RelationGraphEngine).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The position snapshot's key set does not match the roster.
    #[error("invalid input: position snapshot does not match roster (missing: {missing:?}, unexpected: {unexpected:?})")]
    InvalidInput {
        /// Roster agents with no position in the snapshot.
        missing: Vec<AgentId>,
        /// Snapshot agents that are not in the roster.
        unexpected: Vec<AgentId>,
    },

    /// The same agent id appears twice in the roster.
    #[error("duplicate agent id in roster: {0}")]
    DuplicateAgent(AgentId),
}

impl GraphError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GraphError::InvalidInput { .. })
    }
}
