//! Episode
//!
//! Reset/step driver: owns the roster, moves drones on the grid, and feeds
//! each tick's positions to the relation graph engine.
//!
//! Per step:
//! 1. Every agent must have an action
//! 2. Drones move in roster order; collided drones are collected
//! 3. Collided drones retry once, in reverse order
//! 4. Graphs are recomputed from the new positions
//! 5. The injected renderer, if any, draws the frame

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

use swarm_events::{AgentId, AgentKind, AgentState, GraphSnapshot, GridPos, PositionSnapshot};

use crate::config::{ConfigError, SimConfig, WorldConfig};
use crate::engine::RelationGraphEngine;
use crate::error::GraphError;
use crate::grid::{Action, Grid, MoveOutcome};
use crate::output::snapshot_of;
use crate::render::{GraphRenderer, RenderError, RenderFrame};

/// Errors that can occur while driving an episode.
#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// No action was supplied for a roster agent
    #[error("no action supplied for agent {0}")]
    MissingAction(AgentId),
    /// An action was supplied for an agent not in the roster
    #[error("action supplied for unknown agent {0}")]
    UnknownAgent(AgentId),
    /// The agent's spawn cell is taken or off the grid
    #[error("cannot place agent {0} on the grid")]
    Placement(AgentId),
}

/// What one agent can see and reach after a step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentInfo {
    pub obs: Vec<AgentId>,
    pub comm: Vec<AgentId>,
}

/// Result of a single step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Moves made so far in this episode
    pub tick: u64,
    pub positions: PositionSnapshot,
    pub infos: HashMap<AgentId, AgentInfo>,
    /// Final outcome of each agent's move
    pub moves: HashMap<AgentId, MoveOutcome>,
    /// True once the configured number of iterations is reached
    pub truncated: bool,
}

/// Creates `truthful_{i}` then `adversarial_{i}` drones on distinct random cells.
pub fn spawn_roster(world: &WorldConfig, rng: &mut SmallRng) -> Vec<AgentState> {
    let size = world.size as usize;
    let total = world.total_agents().min(size * size);
    let cells = rand::seq::index::sample(rng, size * size, total);

    let kinds = std::iter::repeat(AgentKind::Truthful)
        .take(world.num_good_agents)
        .enumerate()
        .chain(
            std::iter::repeat(AgentKind::Adversarial)
                .take(world.num_adversarial_agents)
                .enumerate(),
        );

    kinds
        .zip(cells.iter())
        .map(|((i, kind), cell)| {
            let pos = GridPos::new((cell % size) as i32, (cell / size) as i32);
            AgentState::new(format!("{}_{}", kind.id_prefix(), i), kind, pos)
        })
        .collect()
}

/// Centroid of all drones minus the target; zero for an empty swarm.
pub fn arrangement_vector(agents: &[AgentState], target: GridPos) -> [f64; 2] {
    if agents.is_empty() {
        return [0.0, 0.0];
    }
    let n = agents.len() as f64;
    let sum_x: f64 = agents.iter().map(|a| a.pos.x as f64).sum();
    let sum_y: f64 = agents.iter().map(|a| a.pos.y as f64).sum();
    [sum_x / n - target.x as f64, sum_y / n - target.y as f64]
}

/// A single simulation run
pub struct Episode {
    config: SimConfig,
    /// Positions restored on reset
    spawn: Vec<AgentState>,
    agents: Vec<AgentState>,
    grid: Grid,
    engine: RelationGraphEngine,
    num_moves: u64,
    renderer: Option<Box<dyn GraphRenderer>>,
}

impl Episode {
    /// Spawns a roster from the configured seed.
    pub fn new(config: SimConfig) -> Result<Self, EpisodeError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(config.world.seed);
        let agents = spawn_roster(&config.world, &mut rng);
        Self::with_agents(config, agents)
    }

    /// Uses a caller-supplied roster instead of spawning one.
    pub fn with_agents(config: SimConfig, agents: Vec<AgentState>) -> Result<Self, EpisodeError> {
        let engine = RelationGraphEngine::new(config.world.size, agents.clone(), &config.graphs)?;
        let mut grid = Grid::new(config.world.size);
        if let Some(id) = grid.reset(&agents) {
            return Err(EpisodeError::Placement(id));
        }

        tracing::info!(
            "Episode created: {} agents on a {}x{} grid",
            agents.len(),
            config.world.size,
            config.world.size
        );

        Ok(Self {
            config,
            spawn: agents.clone(),
            agents,
            grid,
            engine,
            num_moves: 0,
            renderer: None,
        })
    }

    /// Attaches a renderer that draws after every step.
    pub fn set_renderer(&mut self, renderer: Box<dyn GraphRenderer>) {
        self.renderer = Some(renderer);
    }

    /// Restores spawn positions and the initial graph shapes.
    pub fn reset(&mut self) -> PositionSnapshot {
        self.agents = self.spawn.clone();
        // spawn positions were validated at construction
        self.grid.reset(&self.agents);
        self.engine.reset();
        self.num_moves = 0;
        tracing::debug!("Episode reset");
        self.positions()
    }

    /// Moves every drone, then recomputes the graphs.
    pub fn step(&mut self, actions: &HashMap<AgentId, Action>) -> Result<StepOutcome, EpisodeError> {
        self.check_actions(actions)?;

        let mut moves = HashMap::with_capacity(self.agents.len());
        let mut collided = Vec::new();
        for (i, agent) in self.agents.iter_mut().enumerate() {
            let outcome = self.grid.move_drone(agent, actions[&agent.id]);
            if outcome == MoveOutcome::Collided {
                collided.push(i);
            }
            moves.insert(agent.id.clone(), outcome);
        }

        // the blocking drone may have moved away in the first pass
        for &i in collided.iter().rev() {
            let agent = &mut self.agents[i];
            let outcome = self.grid.move_drone(agent, actions[&agent.id]);
            moves.insert(agent.id.clone(), outcome);
        }

        self.num_moves += 1;
        let positions = self.positions();
        self.engine.update(&positions)?;

        if let Some(renderer) = self.renderer.as_mut() {
            let frame = RenderFrame {
                tick: self.num_moves,
                dim: self.engine.dim(),
                agents: self.engine.agents(),
                graph: self.engine.graph(self.config.render.mode),
                kind: self.config.render.mode,
                target: self.grid.target(),
                arrangement: arrangement_vector(&self.agents, self.grid.target()),
            };
            renderer.render(&frame)?;
        }

        let infos = self
            .agents
            .iter()
            .map(|agent| {
                let info = AgentInfo {
                    obs: self.engine.observation().neighbors(&agent.id).to_vec(),
                    comm: self.engine.communication().neighbors(&agent.id).to_vec(),
                };
                (agent.id.clone(), info)
            })
            .collect();

        Ok(StepOutcome {
            tick: self.num_moves,
            positions,
            infos,
            moves,
            truncated: self.num_moves >= self.config.world.iterations,
        })
    }

    fn check_actions(&self, actions: &HashMap<AgentId, Action>) -> Result<(), EpisodeError> {
        if let Some(agent) = self.agents.iter().find(|a| !actions.contains_key(&a.id)) {
            return Err(EpisodeError::MissingAction(agent.id.clone()));
        }
        if actions.len() != self.agents.len() {
            let mut unknown: Vec<&AgentId> = actions
                .keys()
                .filter(|id| !self.agents.iter().any(|a| &a.id == *id))
                .collect();
            unknown.sort();
            if let Some(id) = unknown.first() {
                return Err(EpisodeError::UnknownAgent((*id).clone()));
            }
        }
        Ok(())
    }

    /// Agents visible to `id`
    pub fn observe(&self, id: &AgentId) -> &[AgentId] {
        self.engine.observation().neighbors(id)
    }

    pub fn positions(&self) -> PositionSnapshot {
        self.agents.iter().map(|a| (a.id.clone(), a.pos)).collect()
    }

    pub fn arrangement_vector(&self) -> [f64; 2] {
        arrangement_vector(&self.agents, self.grid.target())
    }

    /// Graph snapshot at the current tick
    pub fn snapshot(&self) -> GraphSnapshot {
        snapshot_of(&self.engine, self.num_moves, self.arrangement_vector())
    }

    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn roster(&self) -> &[AgentId] {
        self.engine.roster()
    }

    pub fn engine(&self) -> &RelationGraphEngine {
        &self.engine
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn num_moves(&self) -> u64 {
        self.num_moves
    }

    pub fn is_truncated(&self) -> bool {
        self.num_moves >= self.config.world.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(name: &str) -> AgentId {
        AgentId::from(name)
    }

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.world.size = 10;
        config.world.num_good_agents = 2;
        config.world.num_adversarial_agents = 1;
        config.world.iterations = 3;
        config
    }

    fn all(actions: &[(&str, Action)]) -> HashMap<AgentId, Action> {
        actions.iter().map(|(n, a)| (id(n), *a)).collect()
    }

    fn line_episode(graphs: GraphConfig) -> Episode {
        let mut config = small_config();
        config.graphs = graphs;
        let agents = vec![
            AgentState::truthful("truthful_0", (1, 1)),
            AgentState::truthful("truthful_1", (2, 1)),
            AgentState::adversarial("adversarial_0", (8, 8)),
        ];
        Episode::with_agents(config, agents).unwrap()
    }

    #[test]
    fn test_spawn_roster_ids_and_cells() {
        let world = WorldConfig {
            size: 5,
            num_good_agents: 3,
            num_adversarial_agents: 2,
            ..WorldConfig::default()
        };
        let agents = spawn_roster(&world, &mut SmallRng::seed_from_u64(9));

        let ids: Vec<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["truthful_0", "truthful_1", "truthful_2", "adversarial_0", "adversarial_1"]
        );
        let mut grid = Grid::new(5);
        assert_eq!(grid.reset(&agents), None, "spawn cells must be distinct and in bounds");
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let world = WorldConfig::default();
        let a = spawn_roster(&world, &mut SmallRng::seed_from_u64(42));
        let b = spawn_roster(&world, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_arrangement_vector() {
        let agents = vec![
            AgentState::truthful("a", (0, 0)),
            AgentState::truthful("b", (4, 2)),
        ];
        assert_eq!(arrangement_vector(&agents, GridPos::new(5, 5)), [-3.0, -4.0]);
        assert_eq!(arrangement_vector(&[], GridPos::new(5, 5)), [0.0, 0.0]);
    }

    #[test]
    fn test_new_episode_from_config() {
        let episode = Episode::new(small_config()).unwrap();

        assert_eq!(episode.agents().len(), 3);
        assert_eq!(episode.grid().occupied_count(), 3);
        assert_eq!(episode.num_moves(), 0);
    }

    #[test]
    fn test_step_moves_and_updates_graphs() {
        let mut episode = line_episode(GraphConfig::observation_only(2.0));
        let outcome = episode
            .step(&all(&[
                ("truthful_0", Action::Up),
                ("truthful_1", Action::Stay),
                ("adversarial_0", Action::Left),
            ]))
            .unwrap();

        assert_eq!(outcome.tick, 1);
        assert_eq!(outcome.positions[&id("truthful_0")], GridPos::new(1, 0));
        assert_eq!(outcome.positions[&id("adversarial_0")], GridPos::new(7, 8));
        assert_eq!(outcome.moves[&id("truthful_1")], MoveOutcome::Stayed);
        // (1,0) to (2,1) is sqrt 2 < 2
        assert_eq!(outcome.infos[&id("truthful_0")].obs, vec![id("truthful_1")]);
        assert_eq!(episode.observe(&id("truthful_1")), [id("truthful_0")]);
        // static comms are complete
        assert_eq!(outcome.infos[&id("adversarial_0")].comm.len(), 2);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_collided_drone_retries_after_blocker_moves() {
        let mut episode = line_episode(GraphConfig::static_graphs());
        // truthful_0 is blocked by truthful_1 in the first pass, then retries
        let outcome = episode
            .step(&all(&[
                ("truthful_0", Action::Right),
                ("truthful_1", Action::Right),
                ("adversarial_0", Action::Stay),
            ]))
            .unwrap();

        assert_eq!(outcome.moves[&id("truthful_0")], MoveOutcome::Moved);
        assert_eq!(outcome.positions[&id("truthful_0")], GridPos::new(2, 1));
        assert_eq!(outcome.positions[&id("truthful_1")], GridPos::new(3, 1));
    }

    #[test]
    fn test_head_on_collision_stays_blocked() {
        let mut episode = line_episode(GraphConfig::static_graphs());
        let outcome = episode
            .step(&all(&[
                ("truthful_0", Action::Right),
                ("truthful_1", Action::Left),
                ("adversarial_0", Action::Stay),
            ]))
            .unwrap();

        assert_eq!(outcome.moves[&id("truthful_0")], MoveOutcome::Collided);
        assert_eq!(outcome.moves[&id("truthful_1")], MoveOutcome::Collided);
        assert_eq!(outcome.positions[&id("truthful_0")], GridPos::new(1, 1));
    }

    #[test]
    fn test_boundary_move_reported() {
        let mut episode = line_episode(GraphConfig::static_graphs());
        let outcome = episode
            .step(&all(&[
                ("truthful_0", Action::Stay),
                ("truthful_1", Action::Stay),
                ("adversarial_0", Action::Stay),
            ]))
            .unwrap();
        assert_eq!(outcome.moves[&id("adversarial_0")], MoveOutcome::Stayed);

        let down = all(&[
            ("truthful_0", Action::Stay),
            ("truthful_1", Action::Stay),
            ("adversarial_0", Action::Down),
        ]);
        let first = episode.step(&down).unwrap();
        assert_eq!(first.moves[&id("adversarial_0")], MoveOutcome::Moved);

        let second = episode.step(&down).unwrap();
        assert_eq!(second.moves[&id("adversarial_0")], MoveOutcome::HitBoundary);
        assert_eq!(episode.agents()[2].pos, GridPos::new(8, 9));
    }

    #[test]
    fn test_truncation_after_iterations() {
        let mut episode = line_episode(GraphConfig::static_graphs());
        let stay = all(&[
            ("truthful_0", Action::Stay),
            ("truthful_1", Action::Stay),
            ("adversarial_0", Action::Stay),
        ]);

        assert!(!episode.step(&stay).unwrap().truncated);
        assert!(!episode.step(&stay).unwrap().truncated);
        assert!(episode.step(&stay).unwrap().truncated);
        assert!(episode.is_truncated());
    }

    #[test]
    fn test_missing_action_rejected() {
        let mut episode = line_episode(GraphConfig::default());
        let err = episode
            .step(&all(&[("truthful_0", Action::Stay), ("truthful_1", Action::Stay)]))
            .unwrap_err();

        assert!(matches!(err, EpisodeError::MissingAction(ref a) if a.as_str() == "adversarial_0"));
        assert_eq!(episode.num_moves(), 0);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut episode = line_episode(GraphConfig::default());
        let err = episode
            .step(&all(&[
                ("truthful_0", Action::Stay),
                ("truthful_1", Action::Stay),
                ("adversarial_0", Action::Stay),
                ("ghost", Action::Up),
            ]))
            .unwrap_err();

        assert!(matches!(err, EpisodeError::UnknownAgent(ref a) if a.as_str() == "ghost"));
    }

    #[test]
    fn test_reset_restores_spawn_and_graphs() {
        let mut episode = line_episode(GraphConfig::default());
        let spawn = episode.positions();
        episode
            .step(&all(&[
                ("truthful_0", Action::Down),
                ("truthful_1", Action::Down),
                ("adversarial_0", Action::Up),
            ]))
            .unwrap();
        assert!(!episode.engine().communication().is_empty());

        let positions = episode.reset();
        assert_eq!(positions, spawn);
        assert_eq!(episode.num_moves(), 0);
        assert!(episode.engine().observation().is_empty());
        assert!(episode.engine().communication().is_empty());
        assert_eq!(episode.grid().occupied_count(), 3);
    }

    #[test]
    fn test_overlapping_roster_rejected() {
        let agents = vec![
            AgentState::truthful("truthful_0", (1, 1)),
            AgentState::truthful("truthful_1", (1, 1)),
        ];
        let err = Episode::with_agents(small_config(), agents).err().unwrap();
        assert!(matches!(err, EpisodeError::Placement(ref a) if a.as_str() == "truthful_1"));
    }

    #[test]
    fn test_snapshot_reflects_step() {
        let mut episode = line_episode(GraphConfig::observation_only(2.0));
        episode
            .step(&all(&[
                ("truthful_0", Action::Stay),
                ("truthful_1", Action::Stay),
                ("adversarial_0", Action::Stay),
            ]))
            .unwrap();

        let snapshot = episode.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.observed_by("truthful_0"), ["truthful_1".to_string()]);
    }

    struct CountingRenderer(Rc<RefCell<Vec<u64>>>);

    impl GraphRenderer for CountingRenderer {
        fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
            self.0.borrow_mut().push(frame.tick);
            Ok(())
        }
    }

    #[test]
    fn test_injected_renderer_sees_every_step() {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let mut episode = line_episode(GraphConfig::default());
        episode.set_renderer(Box::new(CountingRenderer(Rc::clone(&ticks))));
        let stay = all(&[
            ("truthful_0", Action::Stay),
            ("truthful_1", Action::Stay),
            ("adversarial_0", Action::Stay),
        ]);

        episode.step(&stay).unwrap();
        episode.step(&stay).unwrap();

        assert_eq!(*ticks.borrow(), vec![1, 2]);
    }
}
