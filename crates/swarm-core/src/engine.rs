//! Relation Graph Engine
//!
//! Maintains the observation and communication graphs over a fixed roster.
//!
//! Each graph has a mode fixed at construction:
//! - static observation: empty forever (there is no complete fallback)
//! - static communication: complete forever, minus self-loops
//! - dynamic: recomputed from scratch on every [`RelationGraphEngine::update`]
//!
//! Dynamic communication additionally tops each agent up to a minimum number
//! of peers by pulling in the nearest out-of-radius agents.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use swarm_events::{AgentId, AgentState, PositionSnapshot};

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::RelationGraph;

/// Which of the two graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    #[default]
    Observation,
    Communication,
}

/// How the observation graph is maintained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservationMode {
    /// Left empty; never touched by updates
    Static,
    /// B is visible to A iff distance(A, B) < radius
    DynamicRadius { radius: f64 },
}

/// How the communication graph is maintained
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommunicationMode {
    /// Complete graph; never touched by updates
    Static,
    /// In-radius peers, topped up to `minimum` with the nearest others
    DynamicRadius { radius: f64, minimum: usize },
}

impl ObservationMode {
    pub fn from_config(config: &GraphConfig) -> Self {
        if config.dynamic_obs {
            ObservationMode::DynamicRadius {
                radius: clamp_radius("obs_radius", config.obs_radius),
            }
        } else {
            ObservationMode::Static
        }
    }

    fn initial_graph(&self, nodes: &[AgentId]) -> RelationGraph {
        RelationGraph::empty(nodes)
    }
}

impl CommunicationMode {
    pub fn from_config(config: &GraphConfig) -> Self {
        if config.dynamic_comms {
            CommunicationMode::DynamicRadius {
                radius: clamp_radius("dynamic_comms_radius", config.dynamic_comms_radius),
                minimum: config.dynamic_comms_enforce_minimum,
            }
        } else {
            CommunicationMode::Static
        }
    }

    fn initial_graph(&self, nodes: &[AgentId]) -> RelationGraph {
        match self {
            CommunicationMode::Static => RelationGraph::complete(nodes),
            CommunicationMode::DynamicRadius { .. } => RelationGraph::empty(nodes),
        }
    }
}

/// Negative or NaN radii become 0.0, which admits no in-radius peers.
fn clamp_radius(name: &str, radius: f64) -> f64 {
    if radius.is_nan() || radius < 0.0 {
        tracing::warn!("{} = {} is not a valid radius, clamping to 0.0", name, radius);
        0.0
    } else {
        radius
    }
}

/// Owns both relation graphs and recomputes them from positions.
#[derive(Debug, Clone)]
pub struct RelationGraphEngine {
    /// Grid dimension, carried for renderers
    dim: u32,
    /// Latest agent states, in roster order
    agents: Vec<AgentState>,
    /// Roster ids, in roster order
    roster: Vec<AgentId>,
    observation_mode: ObservationMode,
    communication_mode: CommunicationMode,
    observation: RelationGraph,
    communication: RelationGraph,
}

impl RelationGraphEngine {
    /// Builds both graphs in their initial shape.
    ///
    /// Fails if two agents share an id.
    pub fn new(dim: u32, agents: Vec<AgentState>, config: &GraphConfig) -> Result<Self, GraphError> {
        let mut seen = HashSet::with_capacity(agents.len());
        for agent in &agents {
            if !seen.insert(&agent.id) {
                return Err(GraphError::DuplicateAgent(agent.id.clone()));
            }
        }

        let roster: Vec<AgentId> = agents.iter().map(|a| a.id.clone()).collect();
        let observation_mode = ObservationMode::from_config(config);
        let communication_mode = CommunicationMode::from_config(config);

        if let CommunicationMode::DynamicRadius { minimum, .. } = communication_mode {
            if minimum >= roster.len() && !roster.is_empty() {
                tracing::warn!(
                    "dynamic_comms_enforce_minimum = {} but only {} other agents exist; every agent will reach all others",
                    minimum,
                    roster.len() - 1
                );
            }
        }

        match communication_mode {
            CommunicationMode::Static => tracing::info!(
                "Static communication graph initialized: all {} agents can communicate with each other",
                roster.len()
            ),
            CommunicationMode::DynamicRadius { radius, minimum } => tracing::info!(
                "Dynamic communication graph initialized: radius {} units, enforced minimum {} agents",
                radius,
                minimum
            ),
        }
        if let ObservationMode::DynamicRadius { radius } = observation_mode {
            tracing::info!("Dynamic observation graph initialized: radius {} units", radius);
        }

        Ok(Self {
            dim,
            observation: observation_mode.initial_graph(&roster),
            communication: communication_mode.initial_graph(&roster),
            agents,
            roster,
            observation_mode,
            communication_mode,
        })
    }

    /// Recomputes the dynamic graphs from a full position snapshot.
    ///
    /// The snapshot must contain exactly the roster's ids. On error nothing
    /// is modified.
    pub fn update(&mut self, positions: &PositionSnapshot) -> Result<(), GraphError> {
        self.check_roster(positions)?;

        for agent in &mut self.agents {
            agent.pos = positions[&agent.id];
        }

        if let ObservationMode::DynamicRadius { radius } = self.observation_mode {
            self.observation = observation_graph(&self.agents, &self.roster, radius);
        }
        if let CommunicationMode::DynamicRadius { radius, minimum } = self.communication_mode {
            self.communication = communication_graph(&self.agents, &self.roster, radius, minimum);
        }

        tracing::debug!(
            "Graphs updated: {} observation edges, {} communication edges",
            self.observation.edge_count(),
            self.communication.edge_count()
        );
        Ok(())
    }

    /// Restores both graphs to their construction-time shape.
    pub fn reset(&mut self) {
        self.observation = self.observation_mode.initial_graph(&self.roster);
        self.communication = self.communication_mode.initial_graph(&self.roster);
    }

    fn check_roster(&self, positions: &PositionSnapshot) -> Result<(), GraphError> {
        let mut missing: Vec<AgentId> = self
            .roster
            .iter()
            .filter(|id| !positions.contains_key(*id))
            .cloned()
            .collect();

        let known: HashSet<&AgentId> = self.roster.iter().collect();
        let mut unexpected: Vec<AgentId> = positions
            .keys()
            .filter(|id| !known.contains(id))
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }
        missing.sort();
        unexpected.sort();
        Err(GraphError::InvalidInput { missing, unexpected })
    }

    pub fn observation(&self) -> &RelationGraph {
        &self.observation
    }

    pub fn communication(&self) -> &RelationGraph {
        &self.communication
    }

    pub fn graph(&self, kind: GraphKind) -> &RelationGraph {
        match kind {
            GraphKind::Observation => &self.observation,
            GraphKind::Communication => &self.communication,
        }
    }

    /// Agent states as of the last update, in roster order
    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn roster(&self) -> &[AgentId] {
        &self.roster
    }

    pub fn dim(&self) -> u32 {
        self.dim
    }

    pub fn observation_mode(&self) -> ObservationMode {
        self.observation_mode
    }

    pub fn communication_mode(&self) -> CommunicationMode {
        self.communication_mode
    }

    /// Current positions keyed by id
    pub fn positions(&self) -> PositionSnapshot {
        self.agents.iter().map(|a| (a.id.clone(), a.pos)).collect()
    }
}

/// B is in A's list iff distance(A, B) < radius.
fn observation_graph(agents: &[AgentState], roster: &[AgentId], radius: f64) -> RelationGraph {
    let mut graph = RelationGraph::empty(roster);
    for (i, agent) in agents.iter().enumerate() {
        let visible = agents
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && agent.pos.distance_to(&other.pos) < radius)
            .map(|(_, other)| other.id.clone())
            .collect();
        graph.set_neighbors(i, visible);
    }
    graph
}

/// In-radius peers in roster order, then the nearest remaining agents until
/// `minimum` is reached.
///
/// The top-up sort is stable, so equal distances resolve to roster order.
fn communication_graph(
    agents: &[AgentState],
    roster: &[AgentId],
    radius: f64,
    minimum: usize,
) -> RelationGraph {
    let mut graph = RelationGraph::empty(roster);
    for (i, agent) in agents.iter().enumerate() {
        let mut peers = Vec::new();
        let mut outside: Vec<(f64, &AgentId)> = Vec::new();

        for (j, other) in agents.iter().enumerate() {
            if j == i {
                continue;
            }
            let distance = agent.pos.distance_to(&other.pos);
            if distance < radius {
                peers.push(other.id.clone());
            } else {
                outside.push((distance, &other.id));
            }
        }

        if peers.len() < minimum {
            outside.sort_by(|a, b| a.0.total_cmp(&b.0));
            let missing = minimum - peers.len();
            peers.extend(outside.into_iter().take(missing).map(|(_, id)| id.clone()));
        }

        graph.set_neighbors(i, peers);
    }
    graph
}
