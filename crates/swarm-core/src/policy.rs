//! Random Walk
//!
//! Seeded action source used to drive positions when no external controller
//! is attached. Drones wander; nothing here plans a path.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use swarm_events::AgentId;

use crate::grid::Action;

/// Picks uniformly random actions from a seeded RNG
pub struct RandomWalk {
    rng: SmallRng,
}

impl RandomWalk {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn choose(&mut self) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }

    /// One action per agent, drawn in the order given
    pub fn actions_for(&mut self, agents: &[AgentId]) -> HashMap<AgentId, Action> {
        agents.iter().map(|id| (id.clone(), self.choose())).collect()
    }
}
