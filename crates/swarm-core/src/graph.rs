//! Relation Graph
//!
//! Directed adjacency lists keyed by agent id, enumerated in roster order.

use std::collections::{BTreeMap, HashMap};

use swarm_events::AgentId;

/// A directed graph over a fixed roster.
///
/// Every roster agent has an entry, possibly empty. Only the engine mutates
/// the edges; readers get shared references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationGraph {
    /// Agent ids in roster order
    nodes: Vec<AgentId>,
    /// Maps agent id -> position in `nodes`
    index: HashMap<AgentId, usize>,
    /// Outgoing edges per node, parallel to `nodes`
    edges: Vec<Vec<AgentId>>,
}

impl RelationGraph {
    /// A graph with every node and no edges.
    pub fn empty(nodes: &[AgentId]) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Self {
            nodes: nodes.to_vec(),
            index,
            edges: vec![Vec::new(); nodes.len()],
        }
    }

    /// A graph where every node points at every other node.
    pub fn complete(nodes: &[AgentId]) -> Self {
        let mut graph = Self::empty(nodes);
        for (i, from) in nodes.iter().enumerate() {
            graph.edges[i] = nodes.iter().filter(|to| *to != from).cloned().collect();
        }
        graph
    }

    /// Replaces all outgoing edges of the node at `idx`.
    pub(crate) fn set_neighbors(&mut self, idx: usize, neighbors: Vec<AgentId>) {
        self.edges[idx] = neighbors;
    }

    /// Agents related to `id`, in insertion order. Empty for unknown ids.
    pub fn neighbors(&self, id: &AgentId) -> &[AgentId] {
        self.index
            .get(id)
            .map(|&i| self.edges[i].as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_edge(&self, from: &AgentId, to: &AgentId) -> bool {
        self.neighbors(from).contains(to)
    }

    /// Out-degree of `id`
    pub fn degree(&self, id: &AgentId) -> usize {
        self.neighbors(id).len()
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// True when no node has an outgoing edge
    pub fn is_empty(&self) -> bool {
        self.edges.iter().all(Vec::is_empty)
    }

    pub fn nodes(&self) -> &[AgentId] {
        &self.nodes
    }

    /// Iterates `(agent, neighbors)` in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &[AgentId])> {
        self.nodes
            .iter()
            .zip(self.edges.iter())
            .map(|(id, edges)| (id, edges.as_slice()))
    }

    /// Plain string adjacency, for snapshots and JSON output.
    pub fn to_adjacency(&self) -> BTreeMap<String, Vec<String>> {
        self.iter()
            .map(|(id, edges)| {
                (
                    id.to_string(),
                    edges.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }
}
