//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // swarm-events = { path = "../swarm-events", features = ["test-fixtures"] }
//!
//! use swarm_events::fixtures;
//!
//! let roster = fixtures::sample_roster();
//! let snapshot = fixtures::sample_snapshot();
//! ```

use crate::{AgentState, GraphSnapshot, PositionSnapshot};

/// Returns a seven-drone roster on a 50x50 grid.
///
/// Contains:
/// - 5 truthful drones, two tight pairs and one loner near the centre
/// - 2 adversarial drones, one isolated in a corner, one next to the loner
pub fn sample_roster() -> Vec<AgentState> {
    let json = include_str!("../tests/fixtures/sample_roster.json");
    serde_json::from_str(json).expect("Failed to parse sample_roster.json")
}

/// Returns three drones at (0,0), (1,0) and (10,10).
///
/// The third drone is out of range of both others; its nearest is the
/// second drone (sqrt 181 against sqrt 200).
pub fn triangle_roster() -> Vec<AgentState> {
    let json = include_str!("../tests/fixtures/scenario_triangle.json");
    serde_json::from_str(json).expect("Failed to parse scenario_triangle.json")
}

/// Returns a graph snapshot of the triangle roster at tick 3.
pub fn sample_snapshot() -> GraphSnapshot {
    let json = include_str!("../tests/fixtures/sample_snapshot.json");
    serde_json::from_str(json).expect("Failed to parse sample_snapshot.json")
}

/// Builds a position snapshot from a roster.
pub fn positions_of(agents: &[AgentState]) -> PositionSnapshot {
    agents.iter().map(|a| (a.id.clone(), a.pos)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentKind, GridPos};

    #[test]
    fn test_sample_roster_loads() {
        let roster = sample_roster();

        assert_eq!(roster.len(), 7);
        assert_eq!(
            roster.iter().filter(|a| a.kind == AgentKind::Adversarial).count(),
            2
        );
    }

    #[test]
    fn test_triangle_roster_loads() {
        let roster = triangle_roster();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[2].pos, GridPos::new(10, 10));
        assert!(roster[2].pos.distance_to(&roster[1].pos) < roster[2].pos.distance_to(&roster[0].pos));
    }

    #[test]
    fn test_sample_snapshot_matches_triangle() {
        let snapshot = sample_snapshot();
        let roster = triangle_roster();

        assert_eq!(snapshot.agents.len(), roster.len());
        assert_eq!(snapshot.reachable_from("agent2"), ["agent1".to_string()]);
    }

    #[test]
    fn test_positions_of() {
        let roster = triangle_roster();
        let positions = positions_of(&roster);

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[&roster[1].id], GridPos::new(1, 0));
    }
}
